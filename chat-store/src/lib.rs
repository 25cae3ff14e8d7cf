//! Append-only store for chat interactions.
//!
//! [`ChatStore`] is object-safe so the pipeline and HTTP layer can hold an
//! `Arc<dyn ChatStore>`; [`SqliteChatStore`] is the production backend.

pub mod config;
pub mod errors;
pub mod record;
mod sqlite;

use std::{future::Future, pin::Pin};

use uuid::Uuid;

pub use config::StoreConfig;
pub use errors::StoreError;
pub use record::{Interaction, NewInteraction, Rating, RatingOutcome, Role, StoredMessage};
pub use sqlite::SqliteChatStore;

/// Boxed future returned by every store operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Persistence interface for chat turns.
///
/// Interactions are immutable once appended, except for a single rating.
pub trait ChatStore: Send + Sync {
    /// Store one turn and return the document as written (with its new id).
    fn append<'a>(&'a self, new: NewInteraction) -> StoreFuture<'a, Interaction>;

    /// The `limit` most recent interactions of `session_id`, oldest first.
    fn session_interactions<'a>(
        &'a self,
        session_id: &'a str,
        limit: usize,
    ) -> StoreFuture<'a, Vec<Interaction>>;

    /// At most `limit` messages from the newest interactions, in chronological order.
    /// `None` reads across all sessions.
    fn recent_messages<'a>(
        &'a self,
        session_id: Option<&'a str>,
        limit: usize,
    ) -> StoreFuture<'a, Vec<StoredMessage>>;

    /// Set the rating of an interaction. A rating is never overwritten.
    fn rate<'a>(&'a self, id: Uuid, rating: Rating) -> StoreFuture<'a, RatingOutcome>;

    /// Liveness probe.
    fn ping<'a>(&'a self) -> StoreFuture<'a, ()>;
}
