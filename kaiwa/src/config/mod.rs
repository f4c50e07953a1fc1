mod error;
mod model;

pub use error::ConfigError;
pub use model::ModelConfig;
