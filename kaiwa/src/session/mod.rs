pub mod sampling_config;
#[allow(clippy::module_inception)]
pub mod session;
pub mod session_error;
pub mod session_input;
pub mod session_output;
pub mod session_run_config;
pub mod tokenizer;

pub use sampling_config::SamplingConfig;
pub use session::Session;
pub use session_error::SessionError;
pub use session_input::{
    SessionInput, SessionInputProcessor, SessionInputProcessorDefault,
    SessionMessage, SessionMessageRole,
};
pub use session_output::{
    SessionOutput, SessionOutputFinishReason, SessionOutputRunStats,
    SessionOutputStats, SessionOutputStepStats, SessionOutputTotalStats,
};
pub use session_run_config::SessionRunConfig;
pub use tokenizer::{HuggingFaceTokenizer, TextTokenizer, TokenizerError};
