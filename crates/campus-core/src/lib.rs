//! # Campus Core
//!
//! Core error types and text utilities shared by the campus crates.
//!
//! - [`errors`]: Provisioning and storage error taxonomy
//! - [`text`]: Name normalization used to derive usernames
//!
//! # Example
//!
//! ```ignore
//! use campus_core::text::{AsciiNormalizer, TextSanitizer};
//! use campus_core::errors::ProvisioningError;
//!
//! let token = AsciiNormalizer.normalize("Raül Cañas");
//! assert_eq!(token, "raulcanas");
//! ```

pub mod errors;
pub mod text;

// Re-export commonly used types at crate root
pub use errors::{ProvisioningError, StoreError};
pub use text::{AsciiNormalizer, TextSanitizer, normalize};
