pub mod config;
pub mod context;
pub mod error;
#[allow(clippy::module_inception)]
pub mod generator;
pub mod result;
pub mod sampler;
pub mod schedule;

pub use config::{ContextLength, GeneratorConfig, SamplingSeed};
pub use context::GeneratorContext;
pub use error::GeneratorError;
pub use generator::Generator;
pub use result::{GenerateResult, PrefillResult};
pub use sampler::Sampler;
pub use schedule::{PrefillBlock, prefill_blocks};
