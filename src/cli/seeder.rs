//! Fake identity seeding.
//!
//! People are generated in parallel with `rayon`, then provisioned through
//! [`UserService::create_user`] with several requests in flight at once, so
//! seeding also exercises the username conflict retry path.

use std::sync::Arc;
use std::time::Instant;

use campus_core::ProvisioningError;
use campus_models::{CreateUserDto, Email, Gender, NationalIdInfo};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::modules::users::{IdentityStore, UserService};
use crate::validation::{chile, spain};

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub count: usize,
    /// Provisioning calls in flight at once.
    pub concurrency: usize,
    pub requester: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            count: 50,
            concurrency: 4,
            requester: "seeder".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Generates `count` valid creation requests, cycling through Chilean,
/// Spanish and unregistered-country documents.
pub fn generate_people(count: usize) -> Vec<CreateUserDto> {
    (0..count).into_par_iter().map(generate_person).collect()
}

fn generate_person(index: usize) -> CreateUserDto {
    let second_surname = if index % 4 == 0 {
        None
    } else {
        Some(LastName().fake::<String>())
    };

    let national_id_info = match index % 3 {
        0 => {
            let body: u32 = (5_000_000..25_000_000).fake();
            NationalIdInfo::new(format!("{body}-{}", chile::check_character(body)), "Chile")
        }
        1 => {
            let number: u32 = (10_000_000..99_999_999).fake();
            NationalIdInfo::new(format!("{number}-{}", spain::control_letter(number)), "Spain")
        }
        _ => {
            let number: u32 = (100_000..999_999).fake();
            NationalIdInfo::new(format!("PT-{number}"), "Portugal")
        }
    };

    let gender = match index % 3 {
        0 => Gender::Female,
        1 => Gender::Male,
        _ => Gender::Other,
    };

    CreateUserDto {
        name: FirstName().fake(),
        first_surname: LastName().fake(),
        second_surname,
        email: Email::new_unchecked(SafeEmail().fake::<String>()),
        national_id_info,
        gender: Some(gender),
    }
}

/// Provisions generated people through `service`.
pub async fn seed_users<S>(service: Arc<UserService<S>>, config: SeedConfig) -> SeedReport
where
    S: IdentityStore + 'static,
{
    let start = Instant::now();
    let people = generate_people(config.count);
    let concurrency = config.concurrency.max(1);
    let mut report = SeedReport::default();

    for chunk in people.chunks(concurrency) {
        let mut tasks = JoinSet::new();
        for dto in chunk.iter().cloned() {
            let service = Arc::clone(&service);
            let requester = config.requester.clone();
            tasks.spawn(async move { service.create_user(&requester, dto).await });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(_)) => report.created += 1,
                Ok(Err(ProvisioningError::DuplicateIdentity { .. })) => report.duplicates += 1,
                Ok(Err(e)) => {
                    warn!(error = %e, kind = e.kind(), "Failed to seed user");
                    report.failed += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Seeding task panicked");
                    report.failed += 1;
                }
            }
        }
    }

    info!(
        created = report.created,
        duplicates = report.duplicates,
        failed = report.failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Seeding finished"
    );
    report
}
