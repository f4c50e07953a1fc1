use std::path::Path;

#[derive(Debug, thiserror::Error)]
#[error("tokenizer error: {message}")]
pub struct TokenizerError {
    pub message: String,
}

impl TokenizerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `decode` is expected to drop special tokens, so the end-of-sequence
/// token itself never surfaces in generated text.
pub trait TextTokenizer: Send {
    fn encode(
        &self,
        text: &str,
    ) -> Result<Vec<u64>, TokenizerError>;

    fn decode(
        &self,
        token_ids: &[u64],
    ) -> Result<String, TokenizerError>;

    fn eos_token_id(&self) -> u64;
}

pub struct HuggingFaceTokenizer {
    inner: tokenizers::Tokenizer,
    eos_token_id: u64,
}

impl HuggingFaceTokenizer {
    pub fn from_file(
        path: &Path,
        eos_token: &str,
    ) -> Result<Self, TokenizerError> {
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|error| TokenizerError::new(error.to_string()))?;
        let eos_token_id = inner.token_to_id(eos_token).ok_or_else(|| {
            TokenizerError::new(format!(
                "token `{}` not present in vocabulary",
                eos_token
            ))
        })? as u64;
        Ok(Self {
            inner,
            eos_token_id,
        })
    }
}

impl TextTokenizer for HuggingFaceTokenizer {
    fn encode(
        &self,
        text: &str,
    ) -> Result<Vec<u64>, TokenizerError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|error| TokenizerError::new(error.to_string()))?;
        Ok(encoding.get_ids().iter().map(|&id| id as u64).collect())
    }

    fn decode(
        &self,
        token_ids: &[u64],
    ) -> Result<String, TokenizerError> {
        let ids: Vec<u32> = token_ids.iter().map(|&id| id as u32).collect();
        self.inner
            .decode(&ids, true)
            .map_err(|error| TokenizerError::new(error.to_string()))
    }

    fn eos_token_id(&self) -> u64 {
        self.eos_token_id
    }
}
