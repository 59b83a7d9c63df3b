pub mod fallback;
pub mod history;
pub mod log_store;
pub mod providers;

pub use history::{CompletionHistory, CompletionRecord};
pub use log_store::LogStore;
