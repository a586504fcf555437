//! Jenkins job source for Jobdash
//!
//! Reads a Jenkins installation's job inventory through the JSON tree API
//! and flattens its folder hierarchy into a single list of leaf jobs.
//!
//! # Architecture
//!
//! - `source` - `JobSource` implementation and HTTP client construction
//! - `client` - Jenkins API calls and error mapping
//! - `walker` - bounded depth-first folder traversal
//! - `config` - connection settings and path helpers
//!
//! # Example Usage
//!
//! ```no_run
//! use jobdash_source_api::JobSource;
//! use jobdash_source_jenkins::{JenkinsSettings, JenkinsSource};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = JenkinsSettings::new("https://jenkins.example.com", "admin", "api-token");
//! let source = JenkinsSource::new(settings)?;
//! let jobs = source.fetch_jobs().await?;
//! println!("{} jobs", jobs.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod source;
mod walker;

pub use config::JenkinsSettings;
pub use source::JenkinsSource;
