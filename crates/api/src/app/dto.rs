use serde::{Deserialize, Serialize};

use rolegate_auth::{Role, UserRecord};
use rolegate_core::UserId;
use rolegate_infra::Signup;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<Role>,
}

impl From<SignupRequest> for Signup {
    fn from(req: SignupRequest) -> Self {
        Signup {
            username: req.username,
            email: req.email,
            password: req.password,
            roles: req.roles,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

/// The stored record minus its credential.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<&UserRecord> for CreatedUserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            roles: record.roles.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserProfile,
}

impl From<&UserRecord> for LoginResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            user: UserProfile {
                username: record.username.clone(),
                email: record.email.clone(),
                roles: record.roles.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub role: Vec<Role>,
}
