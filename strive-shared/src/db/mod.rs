/// Database layer
///
/// - `pool`: connection pool with health check
/// - `migrations`: embedded migration runner
///
/// Models live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
