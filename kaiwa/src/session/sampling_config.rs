use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub top_k: usize,
    pub top_p: f32,
    pub temperature: f32,
}

impl SamplingConfig {
    pub fn new(
        top_k: usize,
        top_p: f32,
        temperature: f32,
    ) -> Self {
        Self {
            top_k,
            top_p,
            temperature,
        }
    }

    pub fn argmax() -> Self {
        Self {
            top_k: 1,
            top_p: 1.0,
            temperature: 1.0,
        }
    }
}

impl Default for SamplingConfig {
    // keep top_k at 1 unless diversity is explicitly wanted
    fn default() -> Self {
        Self {
            top_k: 1,
            top_p: 0.9,
            temperature: 0.6,
        }
    }
}
