//! HTTP API: signup, login, and the role-gated dashboard.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
