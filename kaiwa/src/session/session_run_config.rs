use super::sampling_config::SamplingConfig;

pub struct SessionRunConfig {
    /// Upper bound on newly generated tokens, end-of-sequence included.
    pub tokens_limit: u64,
    pub sampling_config: Option<SamplingConfig>,
}

impl SessionRunConfig {
    pub fn new(tokens_limit: u64) -> Self {
        Self {
            tokens_limit,
            sampling_config: None,
        }
    }

    pub fn new_with_sampling_config(
        tokens_limit: u64,
        sampling_config: Option<SamplingConfig>,
    ) -> Self {
        Self {
            tokens_limit,
            sampling_config,
        }
    }
}

impl Default for SessionRunConfig {
    fn default() -> Self {
        Self::new(u64::MAX)
    }
}
