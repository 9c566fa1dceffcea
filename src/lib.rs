//! gradle-provision - Gradle provisioning for CI jobs
//!
//! Resolves a Gradle version specifier against the Gradle version
//! registry, reuses an existing installation when possible and otherwise
//! downloads the distribution (cache first) and installs it.

pub mod archive;
pub mod cache;
pub mod cli;
pub mod config;
pub mod download;
pub mod environment;
pub mod error;
pub mod install;
pub mod probe;
pub mod provision;
pub mod registry;
pub mod resolve;
pub mod ui;


pub use error::{CacheError, ProvisionError, ProvisionResult};
pub use provision::{Provisioner, Services};
pub use registry::VersionDescriptor;
