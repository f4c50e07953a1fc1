pub mod config;

pub mod embedding;
pub use embedding::EmbeddingTable;

pub mod forward_pass;
pub mod generator;
pub mod session;
