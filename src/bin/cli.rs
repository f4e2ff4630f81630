use std::sync::Arc;

use anyhow::Context;
use campus::cli::seeder::{SeedConfig, seed_users};
use campus::cli::{print_user, print_user_table, provision_user, validate_national_id};
use campus::state::{AppState, init_app_state};
use campus::validation::NationalIdValidator;
use campus_models::{CreateUserDto, Email, Gender, NationalIdInfo, UserId};
use clap::{Parser, Subcommand};
use dialoguer::Input;
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "campus-cli")]
#[command(about = "Campus CLI - Identity provisioning tools", long_about = None)]
struct Cli {
    /// Username recorded as the creator/updater of changed records
    #[arg(long, global = true, default_value = "cli")]
    requester: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a new user (prompts for any missing field)
    Provision {
        /// Given name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// First surname
        #[arg(short = 'f', long)]
        first_surname: Option<String>,

        /// Second surname (optional)
        #[arg(short = 's', long)]
        second_surname: Option<String>,

        /// Contact email
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// National ID document
        #[arg(short = 'i', long)]
        national_id: Option<String>,

        /// Issuing country of the national ID
        #[arg(short = 'c', long)]
        country: Option<String>,

        /// Gender (male, female, other)
        #[arg(short = 'g', long)]
        gender: Option<Gender>,

        /// Only print the username that would be assigned
        #[arg(long)]
        dry_run: bool,
    },
    /// Check a national ID against its country's rule (no database needed)
    ValidateId {
        national_id: String,
        country: String,
    },
    /// List users
    ListUsers {
        #[arg(short = 'l', long, default_value = "20")]
        limit: i64,

        #[arg(short = 'o', long, default_value = "0")]
        offset: i64,
    },
    /// Show a user by username
    ShowUser { username: String },
    /// Mark a user as active
    Activate { id: UserId },
    /// Mark a user as inactive
    Deactivate { id: UserId },
    /// Apply database migrations
    Migrate,
    /// Provision fake users
    Seed {
        /// Number of users to create
        #[arg(short = 'u', long, default_value = "50")]
        users: usize,

        /// Provisioning calls in flight at once
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _log_guard = campus_observability::init_tracing();

    let cli = Cli::parse();
    let requester = cli.requester.as_str();

    match cli.command {
        Commands::ValidateId {
            national_id,
            country,
        } => {
            if !validate_national_id(&NationalIdValidator::default(), &national_id, &country) {
                std::process::exit(1);
            }
        }
        Commands::Provision {
            name,
            first_surname,
            second_surname,
            email,
            national_id,
            country,
            gender,
            dry_run,
        } => {
            let dto = CreateUserDto {
                name: prompt_if_missing(name, "Name")?,
                first_surname: prompt_if_missing(first_surname, "First surname")?,
                second_surname: second_surname.filter(|s| !s.trim().is_empty()),
                email: prompt_if_missing(email, "Email address")?
                    .parse::<Email>()
                    .context("Invalid email")?,
                national_id_info: NationalIdInfo::new(
                    prompt_if_missing(national_id, "National ID")?,
                    prompt_if_missing(country, "Country")?,
                ),
                gender,
            };

            let service = connect().await?.user_service();
            if let Err(e) = provision_user(&service, requester, dto, dry_run).await {
                eprintln!("\n❌ Error provisioning user: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ListUsers { limit, offset } => {
            let users = connect().await?.user_service().list_users(limit, offset).await?;
            print_user_table(&users);
        }
        Commands::ShowUser { username } => {
            let service = connect().await?.user_service();
            let user = service.find_user_by_username(&username).await?;
            print_user(&user);
        }
        Commands::Activate { id } => {
            let service = connect().await?.user_service();
            let user = service.activate_user(requester, id).await?;
            println!("✅ User '{}' activated", user.username);
        }
        Commands::Deactivate { id } => {
            let service = connect().await?.user_service();
            let user = service.deactivate_user(requester, id).await?;
            println!("✅ User '{}' deactivated", user.username);
        }
        Commands::Migrate => {
            campus_db::run_migrations(&connect().await?.db).await?;
            println!("✅ Migrations applied");
        }
        Commands::Seed { users, concurrency } => {
            let service = connect().await?.user_service();
            let config = SeedConfig {
                count: users,
                concurrency,
                requester: requester.to_string(),
            };
            let report = seed_users(Arc::new(service), config).await;
            println!(
                "✅ Seeded {} users ({} duplicates skipped, {} failed)",
                report.created, report.duplicates, report.failed
            );
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<AppState> {
    init_app_state()
        .await
        .context("Failed to initialize application state")
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}
