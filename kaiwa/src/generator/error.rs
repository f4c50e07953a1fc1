use crate::forward_pass::ForwardPassError;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("prompt length {length} exceeds context capacity {capacity}")]
    PromptTooLong {
        length: usize,
        capacity: usize,
    },
    #[error("sampling temperature must be positive, got {0}")]
    InvalidTemperature(f32),
    #[error("sampling top_k must be at least 1")]
    InvalidTopK,
    #[error("sampling top_p must be in (0, 1], got {0}")]
    InvalidTopP(f32),
    #[error("layer {layer}: {source}")]
    AcceleratorCallFailed {
        layer: usize,
        #[source]
        source: ForwardPassError,
    },
    #[error("output projection: {source}")]
    ProjectionCallFailed {
        #[source]
        source: ForwardPassError,
    },
    #[error(
        "embedding table of shape [{vocab_size}, {hidden_size}] does not \
         match model configuration"
    )]
    EmbeddingShapeMismatch {
        vocab_size: usize,
        hidden_size: usize,
    },
    #[error("expected {expected} decoder layers, got {actual}")]
    LayerCountMismatch {
        expected: usize,
        actual: usize,
    },
    #[error("prefill block sizes must be non-zero")]
    InvalidBlockSize,
    #[error("decode position {position} is outside capacity {capacity}")]
    CapacityExhausted {
        position: usize,
        capacity: usize,
    },
    #[error("generate called before prefill")]
    NotPrefilled,
}
