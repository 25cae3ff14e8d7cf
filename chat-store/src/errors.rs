use thiserror::Error;

/// Errors surfaced by the chat store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("[Chat Store] invalid configuration: {0}")]
    Config(String),

    #[error("[Chat Store] database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("[Chat Store] migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be decoded back into a record.
    #[error("[Chat Store] corrupt row {id}: {reason}")]
    Corrupt { id: String, reason: String },
}
