use std::sync::Arc;

use campus_config::{DatabaseConfig, ProvisioningConfig};
use campus_db::init_db_pool;
use sqlx::PgPool;

use crate::modules::users::{PgIdentityStore, UserService};
use crate::validation::NationalIdValidator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub provisioning_config: ProvisioningConfig,
    /// Built once at startup and shared by every service instance.
    pub validators: Arc<NationalIdValidator>,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env()?;

    Ok(AppState {
        db: init_db_pool(&database_config).await?,
        provisioning_config: ProvisioningConfig::from_env(),
        validators: Arc::new(NationalIdValidator::default()),
    })
}

impl AppState {
    pub fn user_service(&self) -> UserService<PgIdentityStore> {
        UserService::new(
            PgIdentityStore::new(self.db.clone()),
            Arc::clone(&self.validators),
            self.provisioning_config.clone(),
        )
    }
}
