use std::cmp::Ordering;

use ndarray::ArrayView1;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::error::GeneratorError;
use crate::session::sampling_config::SamplingConfig;

/// Turns a logits vector into a concrete token id: top-k selection,
/// temperature scaling, softmax, nucleus truncation, then one categorical
/// draw from a session-owned seeded rng.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn validate(config: &SamplingConfig) -> Result<(), GeneratorError> {
        if config.temperature <= 0.0 {
            return Err(GeneratorError::InvalidTemperature(config.temperature));
        }
        if config.top_k == 0 {
            return Err(GeneratorError::InvalidTopK);
        }
        if !(config.top_p > 0.0 && config.top_p <= 1.0) {
            return Err(GeneratorError::InvalidTopP(config.top_p));
        }
        Ok(())
    }

    pub fn sample(
        &mut self,
        logits: ArrayView1<'_, f32>,
        config: &SamplingConfig,
    ) -> u64 {
        assert!(logits.len() > 0);

        // Candidates: the top_k largest logits, ties broken by ascending
        // vocabulary id.
        let mut candidates: Vec<(usize, f32)> =
            logits.iter().copied().enumerate().collect();
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        candidates.truncate(config.top_k.min(logits.len()));

        if candidates.len() == 1 {
            return candidates[0].0 as u64;
        }

        // Temperature + softmax over the candidates. Logits are sorted
        // descending, so the probabilities come out descending too.
        let scale = 1.0 / config.temperature;
        let max_logit = candidates[0].1 * scale;
        let mut probabilities: Vec<f32> = candidates
            .iter()
            .map(|&(_, logit)| (logit * scale - max_logit).exp())
            .collect();
        let total: f32 = probabilities.iter().sum();
        for probability in probabilities.iter_mut() {
            *probability /= total;
        }

        // Nucleus truncation: keep the shortest prefix whose cumulative
        // mass reaches top_p; the entry that crosses the threshold is
        // kept.
        let mut kept = probabilities.len();
        let mut cumulative = 0.0f32;
        for (i, &probability) in probabilities.iter().enumerate() {
            cumulative += probability;
            if cumulative >= config.top_p {
                kept = i + 1;
                break;
            }
        }

        let kept_mass: f32 = probabilities[..kept].iter().sum();
        if !(kept_mass > 0.0) || !kept_mass.is_finite() {
            // Degenerate renormalization: fall back to the single
            // highest-probability candidate.
            return candidates[0].0 as u64;
        }

        let mut threshold = self.rng.gen_range(0.0..1.0f32) * kept_mass;
        for (i, &probability) in probabilities[..kept].iter().enumerate() {
            threshold -= probability;
            if threshold <= 0.0 {
                return candidates[i].0 as u64;
            }
        }
        candidates[kept - 1].0 as u64
    }
}
