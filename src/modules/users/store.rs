//! Identity storage.
//!
//! [`IdentityStore`] is the seam between the provisioning service and
//! persistence. Stores must reject a duplicate username atomically and
//! report it as [`StoreError::UsernameConflict`]; that is the only signal
//! the service retries on.

use async_trait::async_trait;
use campus_core::StoreError;
use campus_models::{NewUser, User, UserId};
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Looks up a user by canonical national ID and country.
    async fn find_by_national_id(
        &self,
        national_id: &str,
        country: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Every persisted username. Not transactional; may be stale by the
    /// time it is used.
    async fn list_usernames(&self) -> Result<HashSet<String>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Users ordered by creation time.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError>;

    /// Updates the active flag, returning `None` if the user does not exist.
    async fn set_active(
        &self,
        id: UserId,
        is_active: bool,
        updated_by: &str,
    ) -> Result<Option<User>, StoreError>;
}

#[async_trait]
impl<T> IdentityStore for Arc<T>
where
    T: IdentityStore + ?Sized,
{
    async fn find_by_national_id(
        &self,
        national_id: &str,
        country: &str,
    ) -> Result<Option<User>, StoreError> {
        (**self).find_by_national_id(national_id, country).await
    }

    async fn list_usernames(&self) -> Result<HashSet<String>, StoreError> {
        (**self).list_usernames().await
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        (**self).insert(user).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        (**self).find_by_username(username).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError> {
        (**self).list(limit, offset).await
    }

    async fn set_active(
        &self,
        id: UserId,
        is_active: bool,
        updated_by: &str,
    ) -> Result<Option<User>, StoreError> {
        (**self).set_active(id, is_active, updated_by).await
    }
}

// ============================================================================
// PostgreSQL
// ============================================================================

pub const USERNAME_CONSTRAINT: &str = "users_username_key";
pub const NATIONAL_ID_CONSTRAINT: &str = "users_national_id_country_key";

const USER_COLUMNS: &str = "id, name, first_surname, second_surname, email, national_id, \
     country, username, gender, is_active, created_by, updated_by, created_at, updated_at";

/// [`IdentityStore`] backed by the `users` table.
#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Maps unique violations on the known constraints to their tagged variants.
fn classify_insert_error(err: sqlx::Error, user: &NewUser) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some(USERNAME_CONSTRAINT) => {
                return StoreError::UsernameConflict {
                    username: user.username.clone(),
                };
            }
            Some(NATIONAL_ID_CONSTRAINT) => {
                return StoreError::NationalIdConflict {
                    national_id: user.national_id_info.national_id.clone(),
                    country: user.national_id_info.country.clone(),
                };
            }
            _ => {}
        }
    }
    StoreError::backend(err)
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    #[instrument(skip(self, national_id))]
    async fn find_by_national_id(
        &self,
        national_id: &str,
        country: &str,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE national_id = $1 AND country = $2"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(national_id)
            .bind(country)
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::backend)
    }

    #[instrument(skip(self))]
    async fn list_usernames(&self) -> Result<HashSet<String>, StoreError> {
        let usernames = sqlx::query_scalar::<_, String>("SELECT username FROM users")
            .fetch_all(&self.db)
            .await
            .map_err(StoreError::backend)?;

        Ok(usernames.into_iter().collect())
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            r#"INSERT INTO users
                   (name, first_surname, second_surname, email, national_id, country,
                    username, gender, created_by, updated_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
               RETURNING {USER_COLUMNS}"#
        );

        let result = sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.first_surname)
            .bind(&user.second_surname)
            .bind(&user.email)
            .bind(&user.national_id_info.national_id)
            .bind(&user.national_id_info.country)
            .bind(&user.username)
            .bind(user.gender)
            .bind(&user.created_by)
            .fetch_one(&self.db)
            .await;

        result.map_err(|e| classify_insert_error(e, &user))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::backend)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::backend)
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, username LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(StoreError::backend)
    }

    #[instrument(skip(self))]
    async fn set_active(
        &self,
        id: UserId,
        is_active: bool,
        updated_by: &str,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            r#"UPDATE users
               SET is_active = $2, updated_by = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(is_active)
            .bind(updated_by)
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::backend)
    }
}
