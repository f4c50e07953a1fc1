use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Static shape of the transformer driven through the accelerator.
///
/// `kv_dim` is the per-position width of one layer's key (or value)
/// projection, `hidden_size / num_attention_heads * num_key_value_heads`
/// in the exported model.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct ModelConfig {
    pub num_layers: usize,
    pub hidden_size: usize,
    pub kv_dim: usize,
    pub vocab_size: usize,
}

impl ModelConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_layers == 0 {
            return Err(ConfigError::ZeroDimension("num_layers"));
        }
        if self.hidden_size == 0 {
            return Err(ConfigError::ZeroDimension("hidden_size"));
        }
        if self.kv_dim == 0 {
            return Err(ConfigError::ZeroDimension("kv_dim"));
        }
        if self.vocab_size == 0 {
            return Err(ConfigError::ZeroDimension("vocab_size"));
        }
        Ok(())
    }
}
