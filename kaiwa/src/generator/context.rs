use std::sync::Arc;

use super::{config::GeneratorConfig, error::GeneratorError};
use crate::{
    config::ModelConfig,
    embedding::EmbeddingTable,
    forward_pass::{DecoderLayer, KVCache, OutputHead},
};

/// Everything one generation session owns or shares: the read-only
/// embedding table, the per-layer accelerator handles, the output
/// projection, and this session's exclusive KV cache.
pub struct GeneratorContext {
    pub embeddings: Arc<EmbeddingTable>,
    pub layers: Vec<Box<dyn DecoderLayer>>,
    pub output_head: Box<dyn OutputHead>,
    pub kv_cache: KVCache,
    pub model_config: ModelConfig,
}

impl GeneratorContext {
    pub fn new(
        embeddings: Arc<EmbeddingTable>,
        layers: Vec<Box<dyn DecoderLayer>>,
        output_head: Box<dyn OutputHead>,
        model_config: ModelConfig,
        generator_config: &GeneratorConfig,
    ) -> Result<Self, GeneratorError> {
        if embeddings.vocab_size() != model_config.vocab_size
            || embeddings.hidden_size() != model_config.hidden_size
        {
            return Err(GeneratorError::EmbeddingShapeMismatch {
                vocab_size: embeddings.vocab_size(),
                hidden_size: embeddings.hidden_size(),
            });
        }
        if layers.len() != model_config.num_layers {
            return Err(GeneratorError::LayerCountMismatch {
                expected: model_config.num_layers,
                actual: layers.len(),
            });
        }
        if generator_config.prefill_block_size == 0
            || generator_config.growth_block_size == 0
        {
            return Err(GeneratorError::InvalidBlockSize);
        }

        let kv_cache = KVCache::new(
            model_config.num_layers,
            generator_config.context_length,
            model_config.kv_dim,
        );

        Ok(Self {
            embeddings,
            layers,
            output_head,
            kv_cache,
            model_config,
        })
    }
}
