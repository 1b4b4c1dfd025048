//! Retry policy and configuration for StoryCraft.
//!
//! Every external call (generation capabilities and asset storage) runs
//! through a [`RetryPolicy`]: bounded exponential backoff with jitter, where
//! only transient failures are retried. [`StorycraftConfig`] loads the layered
//! TOML configuration that parameterizes the policy and the pipeline.
//!
//! ```no_run
//! use storycraft_retry::{RetryPolicy, StorycraftConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorycraftConfig::load()?;
//! let policy = RetryPolicy::from(config.retry());
//! assert!(*policy.max_retries() <= 10);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod policy;

pub use config::{
    PipelineConfig, PipelineOverrides, RetryConfig, StitchConfig, StorageConfig,
    StorycraftConfig, VideoConfig,
};
pub use policy::RetryPolicy;
