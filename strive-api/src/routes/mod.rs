/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `webhooks`: Payment provider callbacks
/// - `onboarding`: Signup sessions and organization provisioning
/// - `tasks`, `leads`: Bulk mutations
/// - `loops`: Transaction loop CRUD behind role checks
/// - `members`: Organization membership management
/// - `admin`: Platform maintenance

pub mod admin;
pub mod health;
pub mod leads;
pub mod loops;
pub mod members;
pub mod onboarding;
pub mod tasks;
pub mod webhooks;
