//! Startup seeding of the built-in administrator accounts.

use tracing::instrument;

use rolegate_auth::Role;

use crate::accounts::{AccountError, AccountService, Signup};

/// A built-in administrator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub const BUILTIN_ADMINS: [AdminSeed; 2] = [
    AdminSeed {
        username: "Admin1",
        email: "admin1@example.com",
        password: "Admin1234",
    },
    AdminSeed {
        username: "Admin2",
        email: "admin2@example.com",
        password: "Admin5678",
    },
];

/// Outcome of one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

/// Ensure every account in `admins` exists with role `{admin}`.
///
/// Idempotent. Existing emails are left untouched, including when another
/// process wins the insert race (the store's `DuplicateKey` counts as
/// "existing"). The first store or hashing failure ends the run; the caller
/// logs it and carries on starting up.
#[instrument(skip_all, fields(admins = admins.len()), err)]
pub async fn seed_admins(accounts: &AccountService, admins: &[AdminSeed]) -> Result<SeedReport, AccountError> {
    let mut report = SeedReport::default();

    for admin in admins {
        if accounts.store().find_by_email(admin.email).await?.is_some() {
            tracing::debug!(email = admin.email, "admin user already present");
            report.existing.push(admin.email.to_string());
            continue;
        }

        let signup = Signup {
            username: admin.username.to_string(),
            email: admin.email.to_string(),
            password: admin.password.to_string(),
            roles: vec![Role::Admin],
        };

        match accounts.signup(signup).await {
            Ok(_) => {
                tracing::info!(email = admin.email, "admin user created");
                report.created.push(admin.email.to_string());
            }
            Err(AccountError::DuplicateEmail) => {
                tracing::debug!(email = admin.email, "admin user created concurrently");
                report.existing.push(admin.email.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
