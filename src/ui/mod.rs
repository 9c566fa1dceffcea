//! Terminal presentation
//!
//! Detects interactive terminals and draws download progress there,
//! falling back to plain log lines on CI runners.

mod context;
mod progress;

pub use context::UiContext;
pub use progress::{DownloadProgress, ProgressReader};
