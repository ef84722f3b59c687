pub mod error;
pub mod api;
pub mod analyzer;
pub mod assistant;
pub mod prompts;
pub mod config;
pub mod renderer;
pub mod cli;
pub mod handlers;

// Re-export commonly used types
pub use assistant::{CodeSage, AnalysisRecord, InsightsRecord, HistoryEntry, Issue};
pub use config::{Config, CredentialStore, MemoryStore};
pub use api::{GeminiClient, GenerativeTransport};
pub use error::SageError;
pub use cli::Cli;
