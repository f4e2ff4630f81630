pub mod service;
pub mod store;
pub mod username;

pub use service::{NameParts, UserService};
pub use store::{IdentityStore, PgIdentityStore};
pub use username::{UsernameError, UsernameGenerator};
