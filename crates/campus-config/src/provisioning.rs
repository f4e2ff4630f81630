//! Identity provisioning configuration.
//!
//! # Environment Variables
//!
//! - `USERNAME_MAX_LENGTH`: Length at which the name-derived part of a
//!   username is truncated before any numeric suffix (default: 20,
//!   at most [`USERNAME_MAX_LENGTH_CEILING`])
//! - `PROVISIONING_MAX_RETRIES`: Insert attempts before giving up on
//!   username conflicts (default: 3, minimum: 1)

/// Default length bound for the name-derived part of a username.
pub const USERNAME_MAX_LENGTH: usize = 20;

/// Largest accepted `USERNAME_MAX_LENGTH`. The `username` column holds 32
/// characters, which leaves room for an eight-digit suffix.
pub const USERNAME_MAX_LENGTH_CEILING: usize = 24;

/// Default number of insert attempts per provisioning call.
pub const MAX_RETRIES: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvisioningConfig {
    /// Candidates longer than this are truncated before the disambiguator
    /// is appended.
    pub username_max_length: usize,

    /// Total insert attempts, the first one included.
    pub max_retries: u32,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            username_max_length: USERNAME_MAX_LENGTH,
            max_retries: MAX_RETRIES,
        }
    }
}

impl ProvisioningConfig {
    /// Creates a new `ProvisioningConfig` from environment variables.
    ///
    /// Falls back to default values if variables are not set or cannot be
    /// parsed.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            username_max_length: lookup("USERNAME_MAX_LENGTH")
                .and_then(|v| v.parse().ok())
                .filter(|&len: &usize| len > 0)
                .map(|len| len.min(USERNAME_MAX_LENGTH_CEILING))
                .unwrap_or(defaults.username_max_length),
            max_retries: lookup("PROVISIONING_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .map(|retries: u32| retries.max(1))
                .unwrap_or(defaults.max_retries),
        }
    }
}
