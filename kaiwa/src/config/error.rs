#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read model configuration: {0}")]
    UnableToReadFile(#[from] std::io::Error),
    #[error("unable to parse model configuration: {0}")]
    UnableToParse(#[from] serde_json::Error),
    #[error("model configuration field `{0}` must be non-zero")]
    ZeroDimension(&'static str),
}
