use super::tokenizer::TokenizerError;
use crate::generator::error::GeneratorError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unable to encode session input: {0}")]
    UnableToEncodeInput(#[source] TokenizerError),
    #[error("unable to decode generated tokens: {0}")]
    UnableToDecodeOutput(#[source] TokenizerError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}
