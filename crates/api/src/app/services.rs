//! Service wiring: pick the user store, build the token keys, seed admins.

use std::sync::Arc;

use rolegate_auth::{Hs256SessionTokens, PasswordError, PasswordHasher};
use rolegate_infra::{
    seed_admins, AccountService, AppConfig, InMemoryUserStore, PostgresUserStore, UserStore,
    UserStoreError, BUILTIN_ADMINS,
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceSetupError {
    #[error(transparent)]
    Store(#[from] UserStoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

pub struct AppServices {
    pub accounts: AccountService,
    pub tokens: Arc<Hs256SessionTokens>,
}

impl AppServices {
    pub fn new(accounts: AccountService, tokens: Hs256SessionTokens) -> Self {
        Self {
            accounts,
            tokens: Arc::new(tokens),
        }
    }
}

/// Wire services from configuration.
///
/// With `DATABASE_URL` the Postgres store is used (pool connects lazily; a
/// schema failure is logged, not fatal). Without it, an in-memory store.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServiceSetupError> {
    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresUserStore::connect_lazy(url)?;
            match store.ensure_schema().await {
                Ok(()) => tracing::info!("connected to postgres user store"),
                Err(e) => tracing::error!(error = %e, "postgres user store not ready"),
            }
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let costs = config.password_costs;
    let hasher = PasswordHasher::with_params(costs.m_cost, costs.t_cost, costs.p_cost)?;

    Ok(AppServices::new(
        AccountService::new(store, hasher),
        Hs256SessionTokens::from_secret(config.jwt_secret.as_bytes()),
    ))
}

/// Seed the built-in administrators, logging the outcome. Never fails.
pub async fn seed(services: &AppServices) {
    match seed_admins(&services.accounts, &BUILTIN_ADMINS).await {
        Ok(report) => tracing::info!(
            created = ?report.created,
            existing = ?report.existing,
            "admin seeding finished"
        ),
        Err(e) => tracing::error!(error = %e, "error seeding admin users"),
    }
}
