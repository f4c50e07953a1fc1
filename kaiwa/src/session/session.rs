use std::time::Instant;

use super::{
    session_error::SessionError,
    session_input::{
        SessionInput, SessionInputProcessor, SessionInputProcessorDefault,
    },
    session_output::{
        SessionOutput, SessionOutputFinishReason, SessionOutputRunStats,
        SessionOutputStats, SessionOutputStepStats, SessionOutputTotalStats,
    },
    session_run_config::SessionRunConfig,
    tokenizer::TextTokenizer,
};
use crate::generator::Generator;

/// One user request end to end: prompt encoding, prefill, the decode
/// loop, and incremental detokenization of every new token.
pub struct Session {
    tokenizer: Box<dyn TextTokenizer>,
    input_processor: Box<dyn SessionInputProcessor>,
    generator: Generator,
}

impl Session {
    pub fn new(
        tokenizer: Box<dyn TextTokenizer>,
        generator: Generator,
    ) -> Self {
        Self {
            tokenizer,
            input_processor: Box::new(SessionInputProcessorDefault),
            generator,
        }
    }

    pub fn new_with_input_processor(
        tokenizer: Box<dyn TextTokenizer>,
        input_processor: Box<dyn SessionInputProcessor>,
        generator: Generator,
    ) -> Self {
        Self {
            tokenizer,
            input_processor,
            generator,
        }
    }

    /// `progress` receives a `SessionOutput` after every produced token
    /// (and between prefill blocks, with empty text); returning `false`
    /// cancels at that boundary, retaining the partial output.
    pub fn run<F>(
        &mut self,
        input: SessionInput,
        config: SessionRunConfig,
        progress: Option<F>,
    ) -> Result<SessionOutput, SessionError>
    where
        F: Fn(SessionOutput) -> bool,
    {
        let run_start = Instant::now();
        let text = self.input_processor.process(&input);
        let prompt_tokens = self
            .tokenizer
            .encode(&text)
            .map_err(SessionError::UnableToEncodeInput)?;
        let tokens_count_input = prompt_tokens.len() as u64;
        let sampling_config = config.sampling_config.unwrap_or_default();
        let eos_token_id = self.tokenizer.eos_token_id();

        let prefill_start = Instant::now();
        let prefill_result = {
            let mut block_hook = |blocks_done: usize,
                                  block_count: usize|
             -> bool {
                if blocks_done == block_count {
                    return true;
                }
                match &progress {
                    Some(callback) => callback(Self::prefill_progress_output()),
                    None => true,
                }
            };
            self.generator.prefill(
                prompt_tokens,
                sampling_config,
                Some(&mut block_hook),
            )?
        };
        let prefill_duration = prefill_start.elapsed().as_secs_f64();

        let first_token = match prefill_result.first_token {
            Some(token) => token,
            None => {
                // Cancelled between prefill blocks; nothing was generated
                // and the partial cache is discarded with the session.
                let output = SessionOutput {
                    text: String::new(),
                    delta: String::new(),
                    stats: Self::build_stats(
                        &prefill_result.forwardpass_durations,
                        prefill_duration,
                        0,
                        &[],
                        run_start.elapsed().as_secs_f64(),
                        tokens_count_input,
                        0,
                    ),
                    finish_reason: Some(SessionOutputFinishReason::Cancelled),
                };
                return Ok(output);
            },
        };

        let mut generate_durations: Vec<f64> = Vec::new();
        let mut previous_text = String::new();

        let first_output = self.step_output(
            first_token,
            &mut previous_text,
            &prefill_result.forwardpass_durations,
            prefill_duration,
            &generate_durations,
            run_start,
            tokens_count_input,
            eos_token_id,
            config.tokens_limit,
        )?;
        let should_continue = match &progress {
            Some(callback) => callback(first_output.clone()),
            None => true,
        };
        if !should_continue {
            return Ok(Self::finalize(
                first_output.clone_with_finish_reason(Some(
                    SessionOutputFinishReason::Cancelled,
                )),
                run_start,
            ));
        }
        if first_output.finish_reason.is_some() {
            return Ok(Self::finalize(first_output, run_start));
        }

        let final_output = loop {
            let generate_start = Instant::now();
            let generate_result = self.generator.generate(sampling_config)?;
            generate_durations.push(generate_start.elapsed().as_secs_f64());

            let output = self.step_output(
                generate_result.token,
                &mut previous_text,
                &prefill_result.forwardpass_durations,
                prefill_duration,
                &generate_durations,
                run_start,
                tokens_count_input,
                eos_token_id,
                config.tokens_limit,
            )?;
            let should_continue = match &progress {
                Some(callback) => callback(output.clone()),
                None => true,
            };
            if !should_continue {
                break output.clone_with_finish_reason(Some(
                    SessionOutputFinishReason::Cancelled,
                ));
            }
            if output.finish_reason.is_some() {
                break output;
            }
        };

        Ok(Self::finalize(final_output, run_start))
    }

    #[allow(clippy::too_many_arguments)]
    fn step_output(
        &self,
        new_token: u64,
        previous_text: &mut String,
        prefill_durations: &[f64],
        prefill_duration: f64,
        generate_durations: &[f64],
        run_start: Instant,
        tokens_count_input: u64,
        eos_token_id: u64,
        tokens_limit: u64,
    ) -> Result<SessionOutput, SessionError> {
        let generated_text = self
            .tokenizer
            .decode(self.generator.generated_tokens())
            .map_err(SessionError::UnableToDecodeOutput)?;
        let delta = match generated_text.strip_prefix(previous_text.as_str()) {
            Some(suffix) => suffix.to_string(),
            None => generated_text.clone(),
        };
        *previous_text = generated_text.clone();

        let generated_count = self.generator.generated_tokens().len() as u64;
        let finish_reason = if new_token == eos_token_id {
            Some(SessionOutputFinishReason::Stop)
        } else if generated_count >= tokens_limit {
            Some(SessionOutputFinishReason::Length)
        } else if self.generator.is_at_capacity() {
            Some(SessionOutputFinishReason::HardLimit)
        } else {
            None
        };

        Ok(SessionOutput {
            text: generated_text,
            delta,
            stats: Self::build_stats(
                prefill_durations,
                prefill_duration,
                1,
                generate_durations,
                run_start.elapsed().as_secs_f64(),
                tokens_count_input,
                generated_count,
            ),
            finish_reason,
        })
    }

    fn finalize(
        mut output: SessionOutput,
        run_start: Instant,
    ) -> SessionOutput {
        output.text = output.text.trim().to_string();
        output.stats.total_stats.duration = run_start.elapsed().as_secs_f64();
        output
    }

    fn prefill_progress_output() -> SessionOutput {
        SessionOutput {
            text: String::new(),
            delta: String::new(),
            stats: Self::build_stats(&[], 0.0, 0, &[], 0.0, 0, 0),
            finish_reason: None,
        }
    }

    fn build_stats(
        prefill_durations: &[f64],
        prefill_duration: f64,
        prefill_tokens_count: u64,
        generate_durations: &[f64],
        total_duration: f64,
        tokens_count_input: u64,
        tokens_count_output: u64,
    ) -> SessionOutputStats {
        let prefill_stats = SessionOutputStepStats {
            duration: prefill_duration,
            tokens_count: prefill_tokens_count,
            tokens_per_second: Self::rate(
                prefill_tokens_count,
                prefill_duration,
            ),
            model_run: Self::run_stats(prefill_durations),
        };

        let generate_stats = if generate_durations.is_empty() {
            None
        } else {
            let duration: f64 = generate_durations.iter().sum();
            let tokens_count = generate_durations.len() as u64;
            Some(SessionOutputStepStats {
                duration,
                tokens_count,
                tokens_per_second: Self::rate(tokens_count, duration),
                model_run: Self::run_stats(generate_durations),
            })
        };

        SessionOutputStats {
            prefill_stats,
            generate_stats,
            total_stats: SessionOutputTotalStats {
                duration: total_duration,
                tokens_count_input,
                tokens_count_output,
            },
        }
    }

    fn run_stats(durations: &[f64]) -> SessionOutputRunStats {
        let count = durations.len() as u64;
        let average_duration = if count == 0 {
            0.0
        } else {
            durations.iter().sum::<f64>() / count as f64
        };
        SessionOutputRunStats {
            count,
            average_duration,
        }
    }

    fn rate(
        tokens_count: u64,
        duration: f64,
    ) -> f64 {
        if duration > 0.0 {
            tokens_count as f64 / duration
        } else {
            0.0
        }
    }
}
