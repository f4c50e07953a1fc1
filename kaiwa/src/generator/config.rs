#[derive(Debug, Clone, Copy)]
pub enum ContextLength {
    // 2559 positions, the capacity the accelerator graphs are exported
    // with
    Default,
    // Custom cache capacity
    Custom(usize),
}

impl Default for ContextLength {
    fn default() -> Self {
        ContextLength::Default
    }
}

impl ContextLength {
    pub fn get_value(&self) -> usize {
        match self {
            ContextLength::Default => 2559,
            ContextLength::Custom(length) => *length,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SamplingSeed {
    // 42 is the default sampling seed
    Default,
    // Custom sampling seed
    Custom(u64),
}

impl Default for SamplingSeed {
    fn default() -> Self {
        SamplingSeed::Default
    }
}

impl SamplingSeed {
    pub fn get_value(&self) -> u64 {
        match self {
            SamplingSeed::Default => 42,
            SamplingSeed::Custom(seed) => *seed,
        }
    }
}

pub struct GeneratorConfig {
    /// Block length the accelerator expects for the first prefill call.
    pub prefill_block_size: usize,
    /// Block length for every subsequent prefill call.
    pub growth_block_size: usize,
    /// KV cache capacity in positions.
    pub context_length: usize,
    pub sampling_seed: u64,
}

impl GeneratorConfig {
    pub fn new(
        prefill_block_size: usize,
        growth_block_size: usize,
        context_length: ContextLength,
        sampling_seed: SamplingSeed,
    ) -> Self {
        Self {
            prefill_block_size,
            growth_block_size,
            context_length: context_length.get_value(),
            sampling_seed: sampling_seed.get_value(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(128, 128, ContextLength::Default, SamplingSeed::Default)
    }
}
