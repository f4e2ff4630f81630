#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campus::campus_config::ProvisioningConfig;
use campus::campus_core::StoreError;
use campus::campus_models::{CreateUserDto, Email, NationalIdInfo, NewUser, User, UserId};
use campus::modules::users::{IdentityStore, UserService};
use campus::validation::{NationalIdValidator, chile, spain};
use chrono::Utc;
use tokio::sync::Barrier;

/// Identity store kept in memory. Enforces the same uniqueness rules as the
/// `users` table.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    users: Mutex<Vec<User>>,
    inserts: AtomicU32,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert calls seen so far, successful or not.
    pub fn insert_attempts(&self) -> u32 {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn usernames(&self) -> Vec<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.username.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn insert_sync(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::UsernameConflict {
                username: new_user.username,
            });
        }
        if users
            .iter()
            .any(|u| u.national_id_info == new_user.national_id_info)
        {
            return Err(StoreError::NationalIdConflict {
                national_id: new_user.national_id_info.national_id,
                country: new_user.national_id_info.country,
            });
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: new_user.name,
            first_surname: new_user.first_surname,
            second_surname: new_user.second_surname,
            email: new_user.email,
            national_id_info: new_user.national_id_info,
            username: new_user.username,
            gender: new_user.gender,
            is_active: true,
            created_by: Some(new_user.created_by.clone()),
            updated_by: Some(new_user.created_by),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    fn find<F>(&self, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| predicate(u))
            .cloned()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_national_id(
        &self,
        national_id: &str,
        country: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| {
            u.national_id_info.national_id == national_id && u.national_id_info.country == country
        }))
    }

    async fn list_usernames(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self.usernames().into_iter().collect())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.insert_sync(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find(|u| u.username == username))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn set_active(
        &self,
        id: UserId,
        is_active: bool,
        updated_by: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.is_active = is_active;
            u.updated_by = Some(updated_by.to_string());
            u.updated_at = Utc::now();
            u.clone()
        }))
    }
}

/// Serves an empty username snapshot for the first `stale_reads` calls,
/// as if every existing user had been written after the snapshot was taken.
#[derive(Debug)]
pub struct StaleSnapshotStore {
    pub inner: InMemoryIdentityStore,
    stale_reads: AtomicUsize,
}

impl StaleSnapshotStore {
    pub fn new(inner: InMemoryIdentityStore, stale_reads: usize) -> Self {
        Self {
            inner,
            stale_reads: AtomicUsize::new(stale_reads),
        }
    }

    /// Makes the next `reads` snapshots stale.
    pub fn serve_stale(&self, reads: usize) {
        self.stale_reads.store(reads, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityStore for StaleSnapshotStore {
    async fn find_by_national_id(
        &self,
        national_id: &str,
        country: &str,
    ) -> Result<Option<User>, StoreError> {
        self.inner.find_by_national_id(national_id, country).await
    }

    async fn list_usernames(&self) -> Result<HashSet<String>, StoreError> {
        let stale = self
            .stale_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(HashSet::new());
        }
        self.inner.list_usernames().await
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_by_username(username).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError> {
        self.inner.list(limit, offset).await
    }

    async fn set_active(
        &self,
        id: UserId,
        is_active: bool,
        updated_by: &str,
    ) -> Result<Option<User>, StoreError> {
        self.inner.set_active(id, is_active, updated_by).await
    }
}

/// Holds the first `parties` snapshot readers at a barrier after they have
/// read, so every one of them sees the same usernames.
#[derive(Debug)]
pub struct RacingSnapshotStore {
    pub inner: InMemoryIdentityStore,
    barrier: Barrier,
    parties: usize,
    reads: AtomicUsize,
}

impl RacingSnapshotStore {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: InMemoryIdentityStore::new(),
            barrier: Barrier::new(parties),
            parties,
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityStore for RacingSnapshotStore {
    async fn find_by_national_id(
        &self,
        national_id: &str,
        country: &str,
    ) -> Result<Option<User>, StoreError> {
        self.inner.find_by_national_id(national_id, country).await
    }

    async fn list_usernames(&self) -> Result<HashSet<String>, StoreError> {
        let snapshot = self.inner.list_usernames().await?;
        if self.reads.fetch_add(1, Ordering::SeqCst) < self.parties {
            self.barrier.wait().await;
        }
        Ok(snapshot)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_by_username(username).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, StoreError> {
        self.inner.list(limit, offset).await
    }

    async fn set_active(
        &self,
        id: UserId,
        is_active: bool,
        updated_by: &str,
    ) -> Result<Option<User>, StoreError> {
        self.inner.set_active(id, is_active, updated_by).await
    }
}

/// Rejects every insert, either as a username conflict or a backend failure.
#[derive(Debug)]
pub struct RejectingStore {
    conflict: bool,
    inserts: AtomicU32,
    snapshot_reads: AtomicU32,
}

impl RejectingStore {
    pub fn always_conflict() -> Self {
        Self {
            conflict: true,
            inserts: AtomicU32::new(0),
            snapshot_reads: AtomicU32::new(0),
        }
    }

    pub fn backend_failure() -> Self {
        Self {
            conflict: false,
            ..Self::always_conflict()
        }
    }

    pub fn insert_attempts(&self) -> u32 {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn snapshot_reads(&self) -> u32 {
        self.snapshot_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityStore for RejectingStore {
    async fn find_by_national_id(
        &self,
        _national_id: &str,
        _country: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn list_usernames(&self) -> Result<HashSet<String>, StoreError> {
        self.snapshot_reads.fetch_add(1, Ordering::SeqCst);
        Ok(HashSet::new())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.conflict {
            Err(StoreError::UsernameConflict {
                username: user.username,
            })
        } else {
            Err(StoreError::backend(anyhow::anyhow!("connection reset by peer")))
        }
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn list(&self, _limit: i64, _offset: i64) -> Result<Vec<User>, StoreError> {
        Ok(Vec::new())
    }

    async fn set_active(
        &self,
        _id: UserId,
        _is_active: bool,
        _updated_by: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(None)
    }
}

pub fn service<S: IdentityStore>(store: S) -> UserService<S> {
    UserService::new(
        store,
        Arc::new(NationalIdValidator::default()),
        ProvisioningConfig::default(),
    )
}

pub fn person(
    name: &str,
    first_surname: &str,
    second_surname: Option<&str>,
    national_id: &str,
    country: &str,
) -> CreateUserDto {
    CreateUserDto {
        name: name.to_string(),
        first_surname: first_surname.to_string(),
        second_surname: second_surname.map(str::to_string),
        email: Email::new_unchecked(format!("{}.{}@example.com", name, first_surname).to_lowercase()),
        national_id_info: NationalIdInfo::new(national_id, country),
        gender: None,
    }
}

/// A valid Chilean RUN for `body`.
pub fn chile_id(body: u32) -> String {
    format!("{body}-{}", chile::check_character(body))
}

/// A valid Spanish DNI for `number`.
pub fn spain_id(number: u32) -> String {
    format!("{number:08}-{}", spain::control_letter(number))
}
