//! # Campus Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`provisioning`]: Username length bound and retry budget
//! - [`database`]: PostgreSQL connection settings
//!
//! # Example
//!
//! ```ignore
//! use campus_config::{DatabaseConfig, ProvisioningConfig};
//!
//! let provisioning = ProvisioningConfig::from_env();
//! let database = DatabaseConfig::from_env()?;
//! ```

pub mod database;
pub mod provisioning;

// Re-export commonly used types at crate root
pub use database::DatabaseConfig;
pub use provisioning::ProvisioningConfig;
