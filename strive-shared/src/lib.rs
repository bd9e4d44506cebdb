//! # Strive Shared Library
//!
//! Domain types and business logic used by the Strive API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `db`: Connection pool and migrations
//! - `auth`: Token validation, identity loading and role-based access control
//! - `onboarding`: Signup sessions, payment confirmation and organization provisioning
//! - `bulk`: Tenant-scoped bulk mutations for tasks and leads
//! - `audit`: Activity log sink

pub mod audit;
pub mod auth;
pub mod bulk;
pub mod db;
pub mod models;
pub mod onboarding;

/// Current version of the Strive shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
