//! User provisioning service.
//!
//! [`UserService::create_user`] runs the provisioning pipeline:
//!
//! ```text
//! Validating -> CheckingDuplicate -> GeneratingUsername -> Persisting
//!                                          ^                  |
//!                                          +-- ConflictRetry <+--> Success
//!                                                             +--> ExhaustedRetries
//! ```
//!
//! The username snapshot is read without locking. A concurrent writer can
//! take the chosen username before the insert lands; the store reports that
//! as a conflict and the service derives a fresh candidate from a fresh
//! snapshot, up to `max_retries` inserts in total.

use std::collections::HashSet;
use std::sync::Arc;

use campus_config::ProvisioningConfig;
use campus_config::provisioning::USERNAME_MAX_LENGTH_CEILING;
use campus_core::{AsciiNormalizer, ProvisioningError, StoreError, TextSanitizer};
use campus_models::{CreateUserDto, NewUser, User, UserId};
use campus_observability::{
    track_provisioning_failure, track_user_created, track_username_conflict,
};
use tracing::{error, info, instrument, warn};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::store::IdentityStore;
use super::username::{UsernameError, UsernameGenerator};
use crate::validation::NationalIdValidator;

/// Normalized name parts a username is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub name: String,
    pub first_surname: String,
    pub second_surname: String,
}

pub struct UserService<S> {
    store: S,
    validators: Arc<NationalIdValidator>,
    sanitizer: Arc<dyn TextSanitizer>,
    generator: UsernameGenerator,
    config: ProvisioningConfig,
}

impl<S: std::fmt::Debug> std::fmt::Debug for UserService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("store", &self.store)
            .field("validators", &self.validators)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: IdentityStore> UserService<S> {
    pub fn new(store: S, validators: Arc<NationalIdValidator>, config: ProvisioningConfig) -> Self {
        Self {
            store,
            validators,
            sanitizer: Arc::new(AsciiNormalizer),
            generator: UsernameGenerator::new(
                config.username_max_length.min(USERNAME_MAX_LENGTH_CEILING),
            ),
            config,
        }
    }

    /// Replaces the default [`AsciiNormalizer`].
    pub fn with_sanitizer<T>(mut self, sanitizer: T) -> Self
    where
        T: TextSanitizer + 'static,
    {
        self.sanitizer = Arc::new(sanitizer);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }

    /// Provisions a new user on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// - [`ProvisioningError::InvalidRequest`]: field validation failed, or a
    ///   required name part is empty after normalization
    /// - [`ProvisioningError::InvalidNationalId`]: the document fails its
    ///   country's rule
    /// - [`ProvisioningError::DuplicateIdentity`]: the national ID is already
    ///   registered for that country
    /// - [`ProvisioningError::ProvisioningFailed`]: every insert attempt hit a
    ///   username conflict
    /// - [`ProvisioningError::Store`]: any other storage failure, unchanged
    #[instrument(skip(self, dto), fields(country = %dto.national_id_info.country))]
    pub async fn create_user(
        &self,
        requester: &str,
        dto: CreateUserDto,
    ) -> Result<User, ProvisioningError> {
        let parts = self.validate_request(&dto).inspect_err(|err| {
            if matches!(err, ProvisioningError::InvalidNationalId { .. }) {
                track_provisioning_failure(err.kind());
            }
        })?;
        let claim = dto.national_id_info.canonical();

        if self
            .store
            .find_by_national_id(&claim.national_id, &claim.country)
            .await?
            .is_some()
        {
            error!(country = %claim.country, "Attempted to create user that already exists");
            track_provisioning_failure("duplicate_identity");
            return Err(ProvisioningError::DuplicateIdentity {
                national_id: claim.national_id,
                country: claim.country,
            });
        }

        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;

            let existing = self.store.list_usernames().await?;
            let username = self.next_username(&parts, &existing)?;
            let new_user = NewUser::from_dto(&dto, username.clone(), requester);

            match self.store.insert(new_user).await {
                Ok(user) => {
                    info!(
                        username = %user.username,
                        user_id = %user.id,
                        requester = %requester,
                        attempt,
                        "User created"
                    );
                    track_user_created(&claim.country);
                    return Ok(user);
                }
                Err(err) if err.is_retryable() => {
                    track_username_conflict(attempt);
                    if attempt >= max_attempts {
                        error!(
                            username = %username,
                            attempts = attempt,
                            error = %err,
                            "Giving up on username conflicts"
                        );
                        track_provisioning_failure("retries_exhausted");
                        return Err(ProvisioningError::ProvisioningFailed {
                            attempts: attempt,
                            username,
                            source: err,
                        });
                    }
                    warn!(
                        username = %username,
                        attempt,
                        error = %err,
                        "Username taken by a concurrent writer, regenerating"
                    );
                }
                Err(StoreError::NationalIdConflict {
                    national_id,
                    country,
                }) => {
                    error!(country = %country, "User with this national ID was created concurrently");
                    track_provisioning_failure("duplicate_identity");
                    return Err(ProvisioningError::DuplicateIdentity {
                        national_id,
                        country,
                    });
                }
                Err(err) => {
                    track_provisioning_failure("storage");
                    return Err(err.into());
                }
            }
        }
    }

    /// The username `create_user` would try first, given the current
    /// snapshot. Nothing is persisted.
    pub async fn preview_username(&self, dto: &CreateUserDto) -> Result<String, ProvisioningError> {
        let parts = self.validate_request(dto)?;
        let existing = self.store.list_usernames().await?;
        self.next_username(&parts, &existing)
    }

    /// Checks a national ID claim against the country registry.
    pub fn validate_national_id(&self, national_id: &str, country: &str) -> bool {
        self.validators.validate(national_id.trim(), country)
    }

    /// Normalizes the name parts used for username generation.
    pub fn name_parts(&self, dto: &CreateUserDto) -> Result<NameParts, ProvisioningError> {
        let parts = NameParts {
            name: self.sanitizer.normalize(&dto.name),
            first_surname: self.sanitizer.normalize(&dto.first_surname),
            second_surname: dto
                .second_surname
                .as_deref()
                .map(|s| self.sanitizer.normalize(s))
                .unwrap_or_default(),
        };

        for (field, value) in [("name", &parts.name), ("first_surname", &parts.first_surname)] {
            if value.is_empty() {
                return Err(UsernameError::EmptyNamePart(field).into());
            }
        }
        Ok(parts)
    }

    #[instrument(skip(self))]
    pub async fn find_user_by_id(&self, id: UserId) -> Result<User, ProvisioningError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProvisioningError::not_found(format!("id: {id}")))
    }

    #[instrument(skip(self))]
    pub async fn find_user_by_username(&self, username: &str) -> Result<User, ProvisioningError> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or_else(|| ProvisioningError::not_found(format!("username: {username}")))
    }

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, ProvisioningError> {
        Ok(self.store.list(limit.clamp(1, 100), offset.max(0)).await?)
    }

    pub async fn activate_user(&self, requester: &str, id: UserId) -> Result<User, ProvisioningError> {
        self.set_active(requester, id, true).await
    }

    pub async fn deactivate_user(
        &self,
        requester: &str,
        id: UserId,
    ) -> Result<User, ProvisioningError> {
        self.set_active(requester, id, false).await
    }

    async fn set_active(
        &self,
        requester: &str,
        id: UserId,
        is_active: bool,
    ) -> Result<User, ProvisioningError> {
        let user = self
            .store
            .set_active(id, is_active, requester)
            .await?
            .ok_or_else(|| ProvisioningError::not_found(format!("id: {id}")))?;

        info!(user_id = %id, is_active, requester = %requester, "User active flag updated");
        Ok(user)
    }

    /// Field validation, national ID check, and name normalization. No side
    /// effects, metrics included.
    fn validate_request(&self, dto: &CreateUserDto) -> Result<NameParts, ProvisioningError> {
        dto.validate()
            .map_err(|errors| ProvisioningError::InvalidRequest(format_errors(&errors)))?;

        let claim = dto.national_id_info.canonical();
        for (field, value) in [("national_id", &claim.national_id), ("country", &claim.country)] {
            if value.is_empty() {
                return Err(ProvisioningError::InvalidRequest(format!(
                    "{field} must not be blank"
                )));
            }
        }

        if !self.validators.validate(&claim.national_id, &claim.country) {
            warn!(country = %claim.country, "Rejected national ID");
            return Err(ProvisioningError::InvalidNationalId {
                national_id: claim.national_id,
                country: claim.country,
            });
        }

        self.name_parts(dto)
    }

    fn next_username(
        &self,
        parts: &NameParts,
        existing: &HashSet<String>,
    ) -> Result<String, ProvisioningError> {
        Ok(self.generator.generate(
            &parts.name,
            &parts.first_surname,
            &parts.second_surname,
            existing,
        )?)
    }
}

impl From<UsernameError> for ProvisioningError {
    fn from(err: UsernameError) -> Self {
        ProvisioningError::InvalidRequest(err.to_string())
    }
}

/// Flattens validator errors, nested structs included, into one message.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_messages(inner, out);
                }
            }
        }
    }
}
