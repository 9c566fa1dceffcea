//! CLI command implementations

pub mod at_least;
pub mod config;
pub mod install;
pub mod resolve;

pub use at_least::execute as at_least;
pub use config::execute as config;
pub use install::execute as install;
pub use resolve::execute as resolve;
