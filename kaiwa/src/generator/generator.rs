use std::time::Instant;

use ndarray::{Array2, s};

use super::{
    config::GeneratorConfig,
    context::GeneratorContext,
    error::GeneratorError,
    result::{GenerateResult, PrefillResult},
    sampler::Sampler,
    schedule::{PrefillBlock, prefill_blocks},
};
use crate::{
    forward_pass::{DecodeBias, LayerInput, prefill_block_bias},
    session::sampling_config::SamplingConfig,
};

/// Block-wise prefill seeding the KV cache, then single-position decode
/// steps. Calls are blocking and must not interleave with another session
/// on the same accelerator.
pub struct Generator {
    pub config: GeneratorConfig,
    pub tokens: Vec<u64>,

    context: GeneratorContext,
    prompt_length: usize,
    decode_bias: Option<DecodeBias>,
    sampler: Sampler,
}

impl Generator {
    pub fn new(
        context: GeneratorContext,
        config: GeneratorConfig,
    ) -> Self {
        let sampler = Sampler::new(config.sampling_seed);
        Self {
            config,
            tokens: Vec::new(),
            context,
            prompt_length: 0,
            decode_bias: None,
            sampler,
        }
    }

    pub fn capacity(&self) -> usize {
        self.context.kv_cache.capacity()
    }

    pub fn prompt_length(&self) -> usize {
        self.prompt_length
    }

    pub fn generated_tokens(&self) -> &[u64] {
        &self.tokens[self.prompt_length..]
    }

    /// Position the next decode step would write, which is also the
    /// index of the token it consumes.
    pub fn position(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    pub fn is_at_capacity(&self) -> bool {
        self.position() >= self.capacity()
    }

    /// Feed the whole prompt through every layer, block by block, then
    /// sample the first token. `progress` is called after each block with
    /// `(blocks_done, block_count)`; returning `false` cancels at that
    /// block boundary and yields a result without a first token.
    pub fn prefill(
        &mut self,
        tokens: Vec<u64>,
        sampling_config: SamplingConfig,
        mut progress: Option<&mut dyn FnMut(usize, usize) -> bool>,
    ) -> Result<PrefillResult, GeneratorError> {
        if tokens.is_empty() {
            return Err(GeneratorError::EmptyPrompt);
        }
        Sampler::validate(&sampling_config)?;

        let capacity = self.capacity();
        let prompt_length = tokens.len();
        if prompt_length > capacity {
            return Err(GeneratorError::PromptTooLong {
                length: prompt_length,
                capacity,
            });
        }

        self.context.kv_cache.reset();
        self.tokens = tokens;
        self.prompt_length = prompt_length;
        self.decode_bias = None;

        let blocks = prefill_blocks(
            prompt_length,
            self.config.prefill_block_size,
            self.config.growth_block_size,
        );
        let mut durations: Vec<f64> = Vec::with_capacity(blocks.len());
        let mut last_hidden: Option<Array2<f32>> = None;

        for block in &blocks {
            let block_start = Instant::now();
            let hidden = self.run_block(block)?;
            durations.push(block_start.elapsed().as_secs_f64());
            last_hidden = Some(hidden);

            if let Some(callback) = progress.as_mut() {
                if !callback(block.index + 1, blocks.len()) {
                    return Ok(PrefillResult {
                        first_token: None,
                        forwardpass_durations: durations,
                    });
                }
            }
        }

        let last_block = blocks[blocks.len() - 1];
        let hidden = last_hidden.expect("prompt produces at least one block");
        let last_real_row = prompt_length - 1 - last_block.start;
        let logits = self
            .context
            .output_head
            .project(hidden.row(last_real_row))
            .map_err(|source| GeneratorError::ProjectionCallFailed {
                source,
            })?;
        let first_token =
            self.sampler.sample(logits.view(), &sampling_config);

        self.tokens.push(first_token);
        self.decode_bias = Some(DecodeBias::new(capacity, prompt_length));

        Ok(PrefillResult {
            first_token: Some(first_token),
            forwardpass_durations: durations,
        })
    }

    /// One decode step: advance every layer's cache by one position and
    /// append the sampled token.
    pub fn generate(
        &mut self,
        sampling_config: SamplingConfig,
    ) -> Result<GenerateResult, GeneratorError> {
        Sampler::validate(&sampling_config)?;
        if self.decode_bias.is_none() {
            return Err(GeneratorError::NotPrefilled);
        }

        let position = self.tokens.len() - 1;
        let capacity = self.capacity();
        if position >= capacity {
            return Err(GeneratorError::CapacityExhausted {
                position,
                capacity,
            });
        }

        let run_start = Instant::now();
        let positions = [position];
        let mut x = self.context.embeddings.lookup(&[self.tokens[position]]);

        for layer_index in 0..self.context.layers.len() {
            let output = {
                let (prior_keys, prior_values) =
                    self.context.kv_cache.full(layer_index);
                let bias = self
                    .decode_bias
                    .as_ref()
                    .expect("checked above")
                    .as_view();
                self.context.layers[layer_index]
                    .forward(LayerInput {
                        prior_keys,
                        prior_values,
                        positions: &positions,
                        embeddings: x.view(),
                        attention_bias: bias,
                    })
                    .map_err(|source| {
                        GeneratorError::AcceleratorCallFailed {
                            layer: layer_index,
                            source,
                        }
                    })?
            };
            self.context.kv_cache.write_block(
                layer_index,
                position,
                output.keys.view(),
                output.values.view(),
            );
            x = output.hidden_state;
        }
        self.context.kv_cache.advance(1);
        if let Some(bias) = self.decode_bias.as_mut() {
            bias.mark_visible(position);
        }

        let logits = self
            .context
            .output_head
            .project(x.row(0))
            .map_err(|source| GeneratorError::ProjectionCallFailed {
                source,
            })?;
        let token = self.sampler.sample(logits.view(), &sampling_config);
        self.tokens.push(token);

        Ok(GenerateResult {
            token,
            forwardpass_duration: run_start.elapsed().as_secs_f64(),
        })
    }

    /// Required before the context can be reused for another request.
    pub fn clear_cache(&mut self) {
        self.context.kv_cache.reset();
        self.tokens.clear();
        self.prompt_length = 0;
        self.decode_bias = None;
    }

    fn run_block(
        &mut self,
        block: &PrefillBlock,
    ) -> Result<Array2<f32>, GeneratorError> {
        let hidden_size = self.context.model_config.hidden_size;

        // Padding rows stay zero; the bias keeps them invisible.
        let mut x = Array2::<f32>::zeros((block.length, hidden_size));
        for i in 0..block.real_length {
            x.row_mut(i)
                .assign(&self.context.embeddings.row(self.tokens[block.start + i]));
        }

        let positions = block.positions();
        let bias = prefill_block_bias(
            block.start,
            block.length,
            block.start,
            self.prompt_length,
        );

        for layer_index in 0..self.context.layers.len() {
            let output = {
                let (prior_keys, prior_values) =
                    self.context.kv_cache.written(layer_index);
                self.context.layers[layer_index]
                    .forward(LayerInput {
                        prior_keys,
                        prior_values,
                        positions: &positions,
                        embeddings: x.view(),
                        attention_bias: bias.view(),
                    })
                    .map_err(|source| {
                        GeneratorError::AcceleratorCallFailed {
                            layer: layer_index,
                            source,
                        }
                    })?
            };
            self.context.kv_cache.write_block(
                layer_index,
                block.start,
                output.keys.slice(s![..block.real_length, ..]),
                output.values.slice(s![..block.real_length, ..]),
            );
            x = output.hidden_state;
        }
        self.context.kv_cache.advance(block.real_length);

        Ok(x)
    }
}
