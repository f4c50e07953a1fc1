#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use kaiwa::{
    EmbeddingTable,
    config::ModelConfig,
    forward_pass::{
        DecoderLayer, ForwardPassError, LayerInput, LayerOutput, OutputHead,
    },
    generator::{
        ContextLength, Generator, GeneratorConfig, GeneratorContext,
        SamplingSeed,
    },
    session::{TextTokenizer, TokenizerError},
};
use ndarray::{Array1, Array2, ArrayView1};

pub const HIDDEN_SIZE: usize = 4;
pub const KV_DIM: usize = 4;

/// Arguments of one `DecoderLayer::forward` call, as seen by the layer.
#[derive(Debug, Clone)]
pub struct LayerCall {
    pub prior_len: usize,
    pub block_len: usize,
    pub bias_shape: (usize, usize),
    pub positions: Vec<usize>,
    /// First column of the prior keys view, to check what the cache held
    /// at call time.
    pub prior_keys_col0: Vec<f32>,
}

pub type CallLog = Arc<Mutex<Vec<LayerCall>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Deterministic stand-in for an accelerator-resident layer: passes the
/// hidden state through unchanged and projects each position `p` to key
/// rows filled with `p` and value rows filled with `p + 0.5`, so tests
/// can recognize which position a cache row came from.
pub struct RecordingLayer {
    pub log: CallLog,
}

impl DecoderLayer for RecordingLayer {
    fn forward(
        &self,
        input: LayerInput<'_>,
    ) -> Result<LayerOutput, ForwardPassError> {
        let block_len = input.embeddings.shape()[0];
        let prior_len = input.prior_keys.shape()[0];
        let kv_dim = input.prior_keys.shape()[1];
        assert_eq!(input.positions.len(), block_len);
        assert_eq!(
            input.attention_bias.shape(),
            &[block_len, prior_len + block_len]
        );

        self.log.lock().unwrap().push(LayerCall {
            prior_len,
            block_len,
            bias_shape: (block_len, prior_len + block_len),
            positions: input.positions.to_vec(),
            prior_keys_col0: input.prior_keys.column(0).to_vec(),
        });

        let mut keys = Array2::<f32>::zeros((block_len, kv_dim));
        let mut values = Array2::<f32>::zeros((block_len, kv_dim));
        for (i, &position) in input.positions.iter().enumerate() {
            keys.row_mut(i).fill(position as f32);
            values.row_mut(i).fill(position as f32 + 0.5);
        }

        Ok(LayerOutput {
            keys,
            values,
            hidden_state: input.embeddings.to_owned(),
        })
    }
}

pub struct FailingLayer;

impl DecoderLayer for FailingLayer {
    fn forward(
        &self,
        _input: LayerInput<'_>,
    ) -> Result<LayerOutput, ForwardPassError> {
        Err(ForwardPassError::new("device reset"))
    }
}

/// Projects the embedding of token `t` (all components equal to `t`) to
/// logits favoring token `t + 1 mod vocab_size`, so generation walks the
/// vocabulary deterministically under argmax sampling.
pub struct NextTokenHead {
    pub vocab_size: usize,
}

impl OutputHead for NextTokenHead {
    fn project(
        &self,
        hidden_state: ArrayView1<'_, f32>,
    ) -> Result<Array1<f32>, ForwardPassError> {
        let current = hidden_state[0].round() as usize;
        let next = (current + 1) % self.vocab_size;
        let mut logits = Array1::<f32>::zeros(self.vocab_size);
        logits[next] = 10.0;
        Ok(logits)
    }
}

pub struct FailingHead;

impl OutputHead for FailingHead {
    fn project(
        &self,
        _hidden_state: ArrayView1<'_, f32>,
    ) -> Result<Array1<f32>, ForwardPassError> {
        Err(ForwardPassError::new("projection failed"))
    }
}

/// Embedding table where the vector for token `t` is `[t, t, t, t]`.
pub fn embedding_table(vocab_size: usize) -> Arc<EmbeddingTable> {
    let mut weights = Array2::<f32>::zeros((vocab_size, HIDDEN_SIZE));
    for token_id in 0..vocab_size {
        weights.row_mut(token_id).fill(token_id as f32);
    }
    Arc::new(EmbeddingTable::new(weights))
}

pub fn build_generator_with_layers(
    layers: Vec<Box<dyn DecoderLayer>>,
    vocab_size: usize,
    capacity: usize,
    first_block: usize,
    growth_block: usize,
) -> Generator {
    let model_config = ModelConfig {
        num_layers: layers.len(),
        hidden_size: HIDDEN_SIZE,
        kv_dim: KV_DIM,
        vocab_size,
    };
    let generator_config = GeneratorConfig::new(
        first_block,
        growth_block,
        ContextLength::Custom(capacity),
        SamplingSeed::Default,
    );
    let context = GeneratorContext::new(
        embedding_table(vocab_size),
        layers,
        Box::new(NextTokenHead {
            vocab_size,
        }),
        model_config,
        &generator_config,
    )
    .unwrap();
    Generator::new(context, generator_config)
}

pub fn build_generator(
    log: &CallLog,
    num_layers: usize,
    vocab_size: usize,
    capacity: usize,
    first_block: usize,
    growth_block: usize,
) -> Generator {
    let layers: Vec<Box<dyn DecoderLayer>> = (0..num_layers)
        .map(|_| {
            Box::new(RecordingLayer {
                log: log.clone(),
            }) as Box<dyn DecoderLayer>
        })
        .collect();
    build_generator_with_layers(
        layers,
        vocab_size,
        capacity,
        first_block,
        growth_block,
    )
}

/// Whitespace-separated numeric ids in, one ` t{id}` fragment per
/// non-special token out.
pub struct ToyTokenizer {
    pub eos_token_id: u64,
}

impl TextTokenizer for ToyTokenizer {
    fn encode(
        &self,
        text: &str,
    ) -> Result<Vec<u64>, TokenizerError> {
        text.split_whitespace()
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    TokenizerError::new(format!("unknown token `{}`", part))
                })
            })
            .collect()
    }

    fn decode(
        &self,
        token_ids: &[u64],
    ) -> Result<String, TokenizerError> {
        Ok(token_ids
            .iter()
            .filter(|&&token_id| token_id != self.eos_token_id)
            .map(|token_id| format!(" t{}", token_id))
            .collect())
    }

    fn eos_token_id(&self) -> u64 {
        self.eos_token_id
    }
}
