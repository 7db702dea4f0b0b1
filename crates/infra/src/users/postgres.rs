//! Postgres-backed user store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | UserStoreError | Scenario |
//! |------------|----------------------|----------------|----------|
//! | Database (unique violation) | `23505` | `DuplicateKey` | Email already taken (unique index on `email`) |
//! | Database (other) | Any other | `Unavailable` | Constraint/permission/statement errors |
//! | PoolTimedOut / PoolClosed / Io | N/A | `Unavailable` | Database unreachable |
//! | Row decode | N/A | `Corrupt` | Unknown role name or bad column type |

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use rolegate_auth::{NewUser, Role, UserRecord};
use rolegate_core::UserId;

use super::{UserStore, UserStoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    username      TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    roles         TEXT[] NOT NULL CHECK (cardinality(roles) > 0),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT users_email_key UNIQUE (email)
)
"#;

/// Postgres-backed user store.
///
/// Uses an SQLx connection pool (thread-safe, cheap to clone behind `Arc`).
/// Email uniqueness is enforced by the `users_email_key` constraint; a
/// conflicting insert surfaces as `DuplicateKey`.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: Arc<PgPool>,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Build a store whose pool connects on first use.
    ///
    /// Only a malformed URL fails here; an unreachable server shows up later
    /// as `Unavailable` from the first query.
    pub fn connect_lazy(database_url: &str) -> Result<Self, UserStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `users` table and its unique constraint if missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), UserStoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, roles
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email", e))?;

        row.map(|r| decode_user(&r)).transpose()
    }

    #[instrument(skip(self, user), fields(email = %user.email), err)]
    async fn create(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
        let roles: Vec<String> = user.roles.iter().map(|r| r.as_str().to_string()).collect();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&roles)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UserStoreError::DuplicateKey {
                    email: user.email.clone(),
                }
            } else {
                map_sqlx_error("create", e)
            }
        })?;

        Ok(user.into_record())
    }
}

fn decode_user(row: &PgRow) -> Result<UserRecord, UserStoreError> {
    let corrupt = |e: sqlx::Error| UserStoreError::Corrupt(e.to_string());

    let id: uuid::Uuid = row.try_get("id").map_err(corrupt)?;
    let roles: Vec<String> = row.try_get("roles").map_err(corrupt)?;
    let roles = roles
        .iter()
        .map(|r| Role::from_str(r).map_err(|e| UserStoreError::Corrupt(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UserRecord {
        id: UserId::from_uuid(id),
        username: row.try_get("username").map_err(corrupt)?,
        email: row.try_get("email").map_err(corrupt)?,
        password_hash: row.try_get("password_hash").map_err(corrupt)?,
        roles,
    })
}

/// Map SQLx errors to UserStoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> UserStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            UserStoreError::Unavailable(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            UserStoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            UserStoreError::Unavailable(format!("timed out acquiring a connection in {}", operation))
        }
        _ => UserStoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
