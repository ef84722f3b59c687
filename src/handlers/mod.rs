pub mod analysis;
pub mod completion;
pub mod config;

pub use analysis::{
    handle_analyze, handle_explain, handle_suggest, handle_fix, handle_insights, handle_mentor,
};
pub use completion::install_completions;
pub use config::handle_config;
