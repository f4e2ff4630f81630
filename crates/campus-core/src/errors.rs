//! Error types for identity provisioning.
//!
//! Two layers are kept apart:
//!
//! - [`StoreError`] is what an identity store reports. Its
//!   [`StoreError::UsernameConflict`] variant is the only retryable failure:
//!   another writer took the username between the snapshot and the insert.
//! - [`ProvisioningError`] is what callers of the provisioning service see.
//!   Username conflicts never reach callers directly; they either heal on
//!   retry or surface as [`ProvisioningError::ProvisioningFailed`].

/// Error type for identity store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The username is already persisted. Retryable with a fresh candidate.
    #[error("Username '{username}' is already taken")]
    UsernameConflict { username: String },

    /// An identity for this national ID and country was persisted concurrently.
    #[error("National ID '{national_id}' ({country}) is already registered")]
    NationalIdConflict {
        national_id: String,
        country: String,
    },

    /// Any other storage failure.
    #[error("Storage error: {0}")]
    Backend(#[source] anyhow::Error),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Backend(err.into())
    }

    /// Whether the provisioning loop may retry after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UsernameConflict { .. })
    }
}

/// Error type surfaced by the provisioning service.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid national ID '{national_id}' for country '{country}'")]
    InvalidNationalId {
        national_id: String,
        country: String,
    },

    #[error("User already exists for national ID '{national_id}' ({country})")]
    DuplicateIdentity {
        national_id: String,
        country: String,
    },

    /// Every attempt lost the race for its username.
    #[error("Failed to create user after {attempts} attempts (last username tried: '{username}')")]
    ProvisioningFailed {
        attempts: u32,
        username: String,
        #[source]
        source: StoreError,
    },

    #[error("User not found with {0}")]
    UserNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProvisioningError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::UserNotFound(what.into())
    }

    /// Short machine-readable label, used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidNationalId { .. } => "invalid_national_id",
            Self::DuplicateIdentity { .. } => "duplicate_identity",
            Self::ProvisioningFailed { .. } => "provisioning_failed",
            Self::UserNotFound(_) => "user_not_found",
            Self::Store(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_only_username_conflict_is_retryable() {
        let conflict = StoreError::UsernameConflict {
            username: "jdoe".into(),
        };
        let duplicate = StoreError::NationalIdConflict {
            national_id: "12345678-5".into(),
            country: "chile".into(),
        };
        let backend = StoreError::backend(anyhow::anyhow!("connection reset"));

        assert!(conflict.is_retryable());
        assert!(!duplicate.is_retryable());
        assert!(!backend.is_retryable());
    }

    #[test]
    fn test_provisioning_failed_keeps_cause() {
        let err = ProvisioningError::ProvisioningFailed {
            attempts: 3,
            username: "jdoe".into(),
            source: StoreError::UsernameConflict {
                username: "jdoe".into(),
            },
        };

        assert_eq!(
            err.to_string(),
            "Failed to create user after 3 attempts (last username tried: 'jdoe')"
        );
        let source = err.source().expect("cause should be attached");
        assert_eq!(source.to_string(), "Username 'jdoe' is already taken");
        assert_eq!(err.kind(), "provisioning_failed");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: ProvisioningError = StoreError::backend(anyhow::anyhow!("disk full")).into();
        assert_eq!(err.to_string(), "Storage error: disk full");
        assert_eq!(err.kind(), "storage");
    }
}
