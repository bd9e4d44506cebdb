/// Activity audit trail
///
/// Mutations that touch tenant records append an entry through an
/// [`AuditSink`]. Recording is best effort: callers log a failed write and
/// carry on, so an audit outage never fails the mutation it describes.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::models::activity_log::{ActivityLog, CreateActivityLog};

/// Error type for audit writes
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Audit write failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for activity entries
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one entry
    async fn record(&self, entry: CreateActivityLog) -> Result<(), AuditError>;
}

/// Writes entries to the `activity_logs` table
#[derive(Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, entry: CreateActivityLog) -> Result<(), AuditError> {
        ActivityLog::create(&self.pool, entry).await?;
        Ok(())
    }
}

/// Keeps entries in memory, for tests and local tooling
#[derive(Clone, Default)]
pub struct MemoryAuditSink {
    entries: Arc<Mutex<Vec<CreateActivityLog>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub async fn entries(&self) -> Vec<CreateActivityLog> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: CreateActivityLog) -> Result<(), AuditError> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}
