pub mod kv_cache;
pub mod layer;
pub mod mask;

pub use kv_cache::{KVCache, KVCacheLayer};
pub use layer::{
    DecoderLayer, ForwardPassError, LayerInput, LayerOutput, OutputHead,
};
pub use mask::{DecodeBias, MASKED, prefill_block_bias};
