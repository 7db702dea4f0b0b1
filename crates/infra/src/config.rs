//! Process configuration, loaded once at startup.
//!
//! Everything comes from environment variables. `from_lookup` takes the lookup
//! as a closure so tests never touch the real process environment.

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Argon2id cost parameters (memory in KiB, iterations, lanes).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PasswordCosts {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for PasswordCosts {
    /// The argon2 crate's recommended defaults.
    fn default() -> Self {
        Self {
            m_cost: 19 * 1024,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PORT`
    pub port: u16,
    /// `DATABASE_URL`; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// `JWT_SECRET`
    pub jwt_secret: String,
    /// `CORS_ORIGIN`: the single origin allowed to make credentialed requests.
    pub cors_origin: String,
    /// `ARGON2_M_COST` / `ARGON2_T_COST` / `ARGON2_P_COST`
    pub password_costs: PasswordCosts,
    /// `SEED_ADMINS`
    pub seed_admins: bool,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret", &"<redacted>")
            .field("cors_origin", &self.cors_origin)
            .field("password_costs", &self.password_costs)
            .field("seed_admins", &self.seed_admins)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => parse_num::<u16>("PORT", &v)?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let defaults = PasswordCosts::default();
        let password_costs = PasswordCosts {
            m_cost: get("ARGON2_M_COST")
                .map(|v| parse_num("ARGON2_M_COST", &v))
                .transpose()?
                .unwrap_or(defaults.m_cost),
            t_cost: get("ARGON2_T_COST")
                .map(|v| parse_num("ARGON2_T_COST", &v))
                .transpose()?
                .unwrap_or(defaults.t_cost),
            p_cost: get("ARGON2_P_COST")
                .map(|v| parse_num("ARGON2_P_COST", &v))
                .transpose()?
                .unwrap_or(defaults.p_cost),
        };

        let seed_admins = match get("SEED_ADMINS") {
            Some(v) => parse_bool("SEED_ADMINS", &v)?,
            None => true,
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            password_costs,
            seed_admins,
        })
    }
}

fn parse_num<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected true/false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.cors_origin, "http://localhost:3000");
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.password_costs, PasswordCosts::default());
        assert!(cfg.seed_admins);
    }

    #[test]
    fn explicit_values_win() {
        let cfg = load(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "postgres://localhost/rolegate"),
            ("JWT_SECRET", "s3cret"),
            ("CORS_ORIGIN", "https://app.example.com"),
            ("ARGON2_M_COST", "8192"),
            ("SEED_ADMINS", "false"),
        ])
        .unwrap();

        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/rolegate"));
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.cors_origin, "https://app.example.com");
        assert_eq!(cfg.password_costs.m_cost, 8192);
        assert_eq!(cfg.password_costs.t_cost, PasswordCosts::default().t_cost);
        assert!(!cfg.seed_admins);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = load(&[("DATABASE_URL", ""), ("JWT_SECRET", "  ")]).unwrap();
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = load(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn bad_bool_is_an_error() {
        assert!(load(&[("SEED_ADMINS", "maybe")]).is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = load(&[("JWT_SECRET", "s3cret"), ("DATABASE_URL", "postgres://u:pw@h/db")]).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("s3cret"));
        assert!(!dbg.contains("pw@h"));
    }
}
