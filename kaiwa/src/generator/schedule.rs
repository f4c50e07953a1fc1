/// One fixed-shape prefill call.
///
/// `length` is the shape the accelerator sees (the first-block or
/// growth-block size); `real_length` is how many leading rows carry
/// actual prompt tokens. Rows past `real_length` are padding: masked,
/// never embedded, never written back to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefillBlock {
    pub index: usize,
    pub start: usize,
    pub length: usize,
    pub real_length: usize,
}

impl PrefillBlock {
    pub fn positions(&self) -> Vec<usize> {
        (self.start..self.start + self.length).collect()
    }
}

/// Split a prompt of `prompt_len` positions into fixed-shape blocks:
/// block 0 covers `[0, first_len)`, block `i >= 1` covers
/// `[first_len + (i - 1) * growth_len, first_len + i * growth_len)`.
/// The caller has already checked `prompt_len` against the cache
/// capacity.
pub fn prefill_blocks(
    prompt_len: usize,
    first_len: usize,
    growth_len: usize,
) -> Vec<PrefillBlock> {
    assert!(prompt_len > 0);
    assert!(first_len > 0 && growth_len > 0);

    let overflow = prompt_len.saturating_sub(first_len);
    let growth_count = overflow.div_ceil(growth_len);

    let mut blocks = Vec::with_capacity(1 + growth_count);
    blocks.push(PrefillBlock {
        index: 0,
        start: 0,
        length: first_len,
        real_length: prompt_len.min(first_len),
    });
    for i in 1..=growth_count {
        let start = first_len + (i - 1) * growth_len;
        blocks.push(PrefillBlock {
            index: i,
            start,
            length: growth_len,
            real_length: (prompt_len - start).min(growth_len),
        });
    }
    blocks
}
