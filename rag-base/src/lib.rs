//! Read-only access to the course-material index.
//!
//! Public API:
//! - [`CourseIndex::open`]: acquire a [`NamespaceHandle`] bound to the configured collection/namespace.
//! - [`NamespaceHandle::query`]: top-K similarity search returning [`CourseSnippet`]s with payload metadata.

pub mod errors;
pub mod structs;
mod vector_db;

use std::sync::Arc;
use std::time::Instant;

use qdrant_client::Qdrant;
use tracing::{debug, info};

pub use errors::rag_base_error::RagBaseError;
pub use structs::course_snippet::CourseSnippet;
pub use structs::rag_base_config::RagConfig;

/// Entry point to the hosted vector index.
#[derive(Debug, Clone)]
pub struct CourseIndex {
    cfg: Arc<RagConfig>,
}

impl CourseIndex {
    /// Wrap a validated configuration.
    pub fn new(cfg: RagConfig) -> Result<Self, RagBaseError> {
        cfg.validate()?;
        Ok(Self { cfg: Arc::new(cfg) })
    }

    /// Build from `QDRANT_*` / `RAG_*` environment variables.
    pub fn from_env() -> Result<Self, RagBaseError> {
        Self::new(RagConfig::from_env()?)
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    /// Acquire a handle scoped to the configured namespace.
    pub async fn open(&self) -> Result<NamespaceHandle, RagBaseError> {
        let client = vector_db::connect(&self.cfg)?;
        debug!(
            target: "rag_base::search",
            collection = %self.cfg.qdrant.collection,
            namespace = %self.cfg.qdrant.namespace,
            "namespace handle opened"
        );
        Ok(NamespaceHandle {
            client,
            cfg: Arc::clone(&self.cfg),
        })
    }
}

/// A client bound to one collection + namespace.
pub struct NamespaceHandle {
    client: Qdrant,
    cfg: Arc<RagConfig>,
}

impl NamespaceHandle {
    pub fn namespace(&self) -> &str {
        &self.cfg.qdrant.namespace
    }

    /// Top-K search for `vector` inside the namespace.
    ///
    /// # Errors
    /// - `InvalidConfig` if `vector` length differs from `EMBEDDING_DIM` (checked before any network call)
    ///   or `top_k` is zero.
    /// - `Qdrant` on transport/server errors.
    pub async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<CourseSnippet>, RagBaseError> {
        if let Some(dim) = self.cfg.search.embedding_dim {
            if vector.len() != dim {
                return Err(RagBaseError::InvalidConfig(format!(
                    "query vector length {} != EMBEDDING_DIM {}",
                    vector.len(),
                    dim
                )));
            }
        }
        if top_k == 0 {
            return Err(RagBaseError::InvalidConfig("top_k must be > 0".into()));
        }

        let started = Instant::now();
        let snippets = vector_db::search_namespace(&self.client, &self.cfg, vector, top_k).await?;

        info!(
            target: "rag_base::search",
            namespace = %self.cfg.qdrant.namespace,
            top_k,
            hits = snippets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "namespace query finished"
        );

        Ok(snippets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with_dim(dim: usize) -> CourseIndex {
        let mut cfg = RagConfig::default();
        cfg.search.embedding_dim = Some(dim);
        CourseIndex::new(cfg).unwrap()
    }

    #[tokio::test]
    async fn wrong_dimension_is_rejected_before_search() {
        let handle = index_with_dim(4).open().await.unwrap();
        let err = handle.query(vec![0.1, 0.2], 5).await.unwrap_err();
        assert!(matches!(err, RagBaseError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn zero_top_k_is_rejected() {
        let handle = index_with_dim(2).open().await.unwrap();
        let err = handle.query(vec![0.1, 0.2], 0).await.unwrap_err();
        assert!(matches!(err, RagBaseError::InvalidConfig(_)));
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut cfg = RagConfig::default();
        cfg.qdrant.collection = " ".into();
        assert!(CourseIndex::new(cfg).is_err());
    }

    #[tokio::test]
    async fn handle_reports_namespace() {
        let handle = index_with_dim(3).open().await.unwrap();
        assert_eq!(handle.namespace(), "MCY660");
    }
}
