use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Failure reported by an accelerator call. The engine treats it as fatal
/// to the session: accelerator state may be inconsistent afterwards, so
/// there is no retry path.
#[derive(Debug, thiserror::Error)]
#[error("accelerator call failed: {message}")]
pub struct ForwardPassError {
    pub message: String,
}

impl ForwardPassError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Inputs for one block of positions through one layer.
///
/// `prior_keys`/`prior_values` are `[prior_len, kv_dim]` views into the
/// KV cache. During prefill `prior_len` is exactly the number of written
/// positions; during decode the full-capacity buffers are passed and
/// `attention_bias` hides every unwritten row.
pub struct LayerInput<'a> {
    pub prior_keys: ArrayView2<'a, f32>,
    pub prior_values: ArrayView2<'a, f32>,
    /// Absolute positions covered by this block, one per row of
    /// `embeddings`.
    pub positions: &'a [usize],
    /// `[block_len, hidden_size]` input activations.
    pub embeddings: ArrayView2<'a, f32>,
    /// `[block_len, prior_len + block_len]` additive bias; `0.0` marks a
    /// visible position, `MASKED` an invisible one.
    pub attention_bias: ArrayView2<'a, f32>,
}

/// All `block_len` rows long, padding rows included.
pub struct LayerOutput {
    pub keys: Array2<f32>,
    pub values: Array2<f32>,
    pub hidden_state: Array2<f32>,
}

/// One transformer layer resident on the accelerator.
///
/// Implementations are stateless across calls apart from the cache slices
/// handed to them, and must accept exactly the block shapes the generator
/// asks for: the first-block size, the growth-block size, and single
/// positions during decode.
pub trait DecoderLayer: Send {
    fn forward(
        &self,
        input: LayerInput<'_>,
    ) -> Result<LayerOutput, ForwardPassError>;
}

pub trait OutputHead: Send {
    fn project(
        &self,
        hidden_state: ArrayView1<'_, f32>,
    ) -> Result<Array1<f32>, ForwardPassError>;
}
