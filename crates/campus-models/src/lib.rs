//! # Campus Models
//!
//! Domain models and DTOs for identity provisioning.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity identifiers
//! - [`value_types`]: Validated primitives (email, gender)
//! - [`users`]: User entity, national ID claim and creation DTOs
//!
//! # Example
//!
//! ```ignore
//! use campus_models::{CreateUserDto, NationalIdInfo};
//!
//! let claim = NationalIdInfo::new("12345678-5", "Chile").canonical();
//! assert_eq!(claim.country, "chile");
//! ```

pub mod ids;
pub mod users;
pub mod value_types;

pub use ids::UserId;
pub use users::{CreateUserDto, NationalIdInfo, NewUser, User};
pub use value_types::{Email, Gender, ValueTypeError};
