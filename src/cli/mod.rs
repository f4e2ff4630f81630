//! Command handlers for `campus-cli`.
//!
//! Each handler takes already-parsed arguments, talks to the provisioning
//! service and prints a human-readable result.

pub mod seeder;

use campus_core::ProvisioningError;
use campus_models::{CreateUserDto, User};

use crate::modules::users::{IdentityStore, UserService};
use crate::validation::NationalIdValidator;

/// Prints a national ID verdict and returns whether it was valid.
pub fn validate_national_id(validator: &NationalIdValidator, national_id: &str, country: &str) -> bool {
    let valid = validator.validate(national_id.trim(), country);
    let rule = if validator.has_country(country) {
        country.trim().to_lowercase()
    } else {
        "generic".to_string()
    };

    if valid {
        println!("✅ '{}' is a valid national ID ({} rule)", national_id, rule);
    } else {
        println!("❌ '{}' is not a valid national ID ({} rule)", national_id, rule);
    }
    valid
}

/// Provisions a user, or only reports the username it would get when
/// `dry_run` is set.
pub async fn provision_user<S>(
    service: &UserService<S>,
    requester: &str,
    dto: CreateUserDto,
    dry_run: bool,
) -> Result<Option<User>, ProvisioningError>
where
    S: IdentityStore,
{
    if dry_run {
        let username = service.preview_username(&dto).await?;
        println!("🔎 Username would be: {}", username);
        return Ok(None);
    }

    let user = service.create_user(requester, dto).await?;
    println!("✅ User created successfully!");
    print_user(&user);
    Ok(Some(user))
}

pub fn print_user(user: &User) {
    println!("   ID:       {}", user.id);
    println!("   Username: {}", user.username);
    println!("   Name:     {}", full_name(user));
    println!("   Email:    {}", user.email);
    println!(
        "   National ID: {} ({})",
        user.national_id_info.national_id, user.national_id_info.country
    );
    println!("   Active:   {}", user.is_active);
}

pub fn print_user_table(users: &[User]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }
    println!("{:<22} {:<32} {:<8}", "USERNAME", "NAME", "ACTIVE");
    for user in users {
        println!("{:<22} {:<32} {:<8}", user.username, full_name(user), user.is_active);
    }
}

fn full_name(user: &User) -> String {
    match &user.second_surname {
        Some(second) => format!("{} {} {}", user.name, user.first_surname, second),
        None => format!("{} {}", user.name, user.first_surname),
    }
}
