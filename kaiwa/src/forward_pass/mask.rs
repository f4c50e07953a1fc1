use ndarray::{Array2, ArrayView2, s};

/// Additive bias for an invisible position. The exported accelerator
/// graphs use this constant rather than `-inf`.
pub const MASKED: f32 = -65536.0;

/// Causal bias for one prefill block.
///
/// Shape `[block_len, prior_len + block_len]`; entry `(i, j)` is visible
/// iff row `block_start + i` is a real prompt position and
/// `j <= prior_len + i`. Rows past the end of the prompt are padding and
/// stay fully masked.
pub fn prefill_block_bias(
    prior_len: usize,
    block_len: usize,
    block_start: usize,
    prompt_len: usize,
) -> Array2<f32> {
    let mut bias =
        Array2::<f32>::from_elem((block_len, prior_len + block_len), MASKED);
    for i in 0..block_len {
        if block_start + i >= prompt_len {
            break;
        }
        bias.slice_mut(s![i, ..=prior_len + i]).fill(0.0);
    }
    bias
}

/// Rolling bias for single-position decode steps.
///
/// Width `capacity + 1`: one column per cache slot plus a trailing column
/// for the token currently being processed. Prompt columns and the
/// trailing column start visible; each decoded position is marked visible
/// exactly once, right after its key/value rows are written, and never
/// reverts.
pub struct DecodeBias {
    bias: Array2<f32>,
    capacity: usize,
}

impl DecodeBias {
    pub fn new(
        capacity: usize,
        prompt_len: usize,
    ) -> Self {
        assert!(prompt_len <= capacity);
        let mut bias = Array2::<f32>::from_elem((1, capacity + 1), MASKED);
        bias.slice_mut(s![0, ..prompt_len]).fill(0.0);
        bias[[0, capacity]] = 0.0;
        Self {
            bias,
            capacity,
        }
    }

    pub fn mark_visible(
        &mut self,
        position: usize,
    ) {
        assert!(position < self.capacity);
        self.bias[[0, position]] = 0.0;
    }

    pub fn is_visible(
        &self,
        position: usize,
    ) -> bool {
        self.bias[[0, position]] == 0.0
    }

    pub fn as_view(&self) -> ArrayView2<'_, f32> {
        self.bias.view()
    }
}
