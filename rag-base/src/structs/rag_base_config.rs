//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for Qdrant and search.

use serde::{Deserialize, Serialize};

use crate::errors::rag_base_error::RagBaseError;

/// Qdrant connectivity and collection parameters.
///
/// A hosted "index + namespace" pair maps to one collection plus a keyword
/// payload field that every query filters on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// gRPC URL for Qdrant (e.g., "http://localhost:6334").
    pub url: String,
    /// Optional API key for Qdrant Cloud.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Collection holding the course material (e.g., "vta-risk-management").
    pub collection: String,
    /// Namespace value that scopes queries (e.g., the course code "MCY660").
    pub namespace: String,
    /// Payload field carrying the namespace value.
    pub namespace_field: String,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "vta-risk-management".to_string(),
            namespace: "MCY660".to_string(),
            namespace_field: "namespace".to_string(),
        }
    }
}

/// Search behavior knobs. The per-query result count is chosen by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Optional minimum score threshold, passed to Qdrant as `score_threshold`.
    pub min_score: Option<f32>,
    /// Expected embedding dimensionality; query vectors of another length are rejected.
    pub embedding_dim: Option<usize>,
}

/// Top-level runtime configuration for the course-material index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    pub qdrant: QdrantConfig,
    pub search: SearchConfig,
}

impl RagConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `QDRANT_URL` (default: "http://localhost:6334")
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default: "vta-risk-management")
    /// - `RAG_NAMESPACE` (default: "MCY660")
    /// - `RAG_NAMESPACE_FIELD` (default: "namespace")
    /// - `RAG_MIN_SCORE` (optional)
    /// - `EMBEDDING_DIM` (optional)
    pub fn from_env() -> Result<Self, RagBaseError> {
        let defaults = Self::default();

        let qdrant = QdrantConfig {
            url: read_string_env("QDRANT_URL").unwrap_or(defaults.qdrant.url),
            api_key: read_string_env("QDRANT_API_KEY"),
            collection: read_string_env("QDRANT_COLLECTION").unwrap_or(defaults.qdrant.collection),
            namespace: read_string_env("RAG_NAMESPACE").unwrap_or(defaults.qdrant.namespace),
            namespace_field: read_string_env("RAG_NAMESPACE_FIELD")
                .unwrap_or(defaults.qdrant.namespace_field),
        };

        let search = SearchConfig {
            min_score: read_parsed_env::<f32>("RAG_MIN_SCORE")?,
            embedding_dim: read_parsed_env::<usize>("EMBEDDING_DIM")?,
        };

        let cfg = Self { qdrant, search };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Basic sanity checks shared by env and hand-built configs.
    pub fn validate(&self) -> Result<(), RagBaseError> {
        if self.qdrant.url.trim().is_empty() {
            return Err(RagBaseError::InvalidConfig("QDRANT_URL is empty".into()));
        }
        if self.qdrant.collection.trim().is_empty() {
            return Err(RagBaseError::InvalidConfig(
                "QDRANT_COLLECTION is empty".into(),
            ));
        }
        if self.qdrant.namespace_field.trim().is_empty() {
            return Err(RagBaseError::InvalidConfig(
                "RAG_NAMESPACE_FIELD is empty".into(),
            ));
        }
        if self.search.embedding_dim == Some(0) {
            return Err(RagBaseError::InvalidConfig(
                "EMBEDDING_DIM must be > 0".into(),
            ));
        }
        Ok(())
    }
}

fn read_string_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read an optional value from env; unset or empty yields `Ok(None)`.
fn read_parsed_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, RagBaseError> {
    match read_string_env(key) {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| RagBaseError::EnvParse {
                key: key.into(),
                value: v,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_course_namespace() {
        let cfg = RagConfig::default();
        assert_eq!(cfg.qdrant.collection, "vta-risk-management");
        assert_eq!(cfg.qdrant.namespace, "MCY660");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_embedding_dim_is_rejected() {
        let mut cfg = RagConfig::default();
        cfg.search.embedding_dim = Some(0);
        assert!(matches!(cfg.validate(), Err(RagBaseError::InvalidConfig(_))));
    }

    #[test]
    fn search_config_carries_no_result_count() {
        let json = serde_json::to_value(RagConfig::default()).unwrap();
        assert!(json["search"].get("top_k").is_none());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let mut cfg = RagConfig::default();
        cfg.qdrant.api_key = Some("secret".into());
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("secret"));
    }
}
