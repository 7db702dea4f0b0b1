//! Infrastructure layer: user storage, account workflows, configuration.

pub mod accounts;
pub mod bootstrap;
pub mod config;
pub mod users;

pub use accounts::{AccountError, AccountService, Signup};
pub use bootstrap::{seed_admins, AdminSeed, SeedReport, BUILTIN_ADMINS};
pub use config::{AppConfig, ConfigError, PasswordCosts};
pub use users::{InMemoryUserStore, PostgresUserStore, UserStore, UserStoreError};
