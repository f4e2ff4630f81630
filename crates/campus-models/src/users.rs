//! User domain models and DTOs.
//!
//! A user is created once through identity provisioning: the caller supplies
//! a [`CreateUserDto`], the provisioning service validates the
//! [`NationalIdInfo`] claim, derives a username and persists a [`NewUser`].

use crate::ids::UserId;
use crate::value_types::{EMAIL_MAX_LENGTH, Email, Gender};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A national identity document claim: the document string and the country
/// that issued it.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, Hash, Validate)]
pub struct NationalIdInfo {
    #[validate(length(min = 1, max = 32, message = "national_id must be between 1 and 32 characters"))]
    pub national_id: String,
    #[validate(length(min = 1, max = 50, message = "country must be between 1 and 50 characters"))]
    pub country: String,
}

impl NationalIdInfo {
    pub fn new(national_id: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            national_id: national_id.into(),
            country: country.into(),
        }
    }

    /// Trims both fields and lower-cases the country, the form used for
    /// storage, duplicate lookups and validator selection.
    pub fn canonical(&self) -> Self {
        Self {
            national_id: self.national_id.trim().to_string(),
            country: self.country.trim().to_lowercase(),
        }
    }
}

/// A persisted user.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub first_surname: String,
    pub second_surname: Option<String>,
    pub email: Email,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub national_id_info: NationalIdInfo,
    pub username: String,
    pub gender: Option<Gender>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for provisioning a new user.
///
/// The username is never supplied by the caller; it is derived from
/// `name`, `first_surname` and `second_surname`.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "first_surname must be between 1 and 50 characters"
    ))]
    pub first_surname: String,
    #[validate(length(max = 50, message = "second_surname must be at most 50 characters"))]
    #[serde(default)]
    pub second_surname: Option<String>,
    #[validate(custom(function = "validate_email_length"))]
    pub email: Email,
    #[validate(nested)]
    pub national_id_info: NationalIdInfo,
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// `Email::new` enforces the column width, but `Email::new_unchecked` does not.
fn validate_email_length(email: &Email) -> Result<(), ValidationError> {
    if email.as_str().chars().count() > EMAIL_MAX_LENGTH {
        let mut error = ValidationError::new("length");
        error.message = Some("email must be at most 50 characters".into());
        return Err(error);
    }
    Ok(())
}

/// Insert payload handed to an identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub first_surname: String,
    pub second_surname: Option<String>,
    pub email: Email,
    pub national_id_info: NationalIdInfo,
    pub username: String,
    pub gender: Option<Gender>,
    /// Username of the principal performing the creation.
    pub created_by: String,
}

impl NewUser {
    /// Builds the insert payload for `dto` under a candidate username.
    pub fn from_dto(dto: &CreateUserDto, username: String, created_by: &str) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            first_surname: dto.first_surname.trim().to_string(),
            second_surname: dto
                .second_surname
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            email: dto.email.clone(),
            national_id_info: dto.national_id_info.canonical(),
            username,
            gender: dto.gender,
            created_by: created_by.to_string(),
        }
    }
}
