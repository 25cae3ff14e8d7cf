//! Qdrant I/O for the course index: client construction and namespace-scoped
//! top-K search. Nothing here writes to the collection.

use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{Condition, Filter, ScoredPoint, SearchPointsBuilder};
use serde_json::{Map, Value as JsonValue};

use crate::errors::rag_base_error::RagBaseError;
use crate::structs::course_snippet::CourseSnippet;
use crate::structs::rag_base_config::RagConfig;

/// Build a gRPC client for `cfg.qdrant.url`.
///
/// The channel connects lazily, so this never touches the network.
///
/// # Errors
/// Returns `RagBaseError::Qdrant` if the client cannot be constructed.
pub fn connect(cfg: &RagConfig) -> Result<Qdrant, RagBaseError> {
    let mut builder = Qdrant::from_url(&cfg.qdrant.url).skip_compatibility_check();
    if let Some(key) = &cfg.qdrant.api_key {
        builder = builder.api_key(key.clone());
    }
    builder
        .build()
        .map_err(|e| RagBaseError::Qdrant(format!("client build: {e}")))
}

/// Keyword filter restricting a search to the configured namespace.
pub fn namespace_filter(cfg: &RagConfig) -> Filter {
    Filter::must([Condition::matches(
        cfg.qdrant.namespace_field.clone(),
        cfg.qdrant.namespace.clone(),
    )])
}

/// Run k-NN search inside the namespace and return snippets with payloads.
///
/// `cfg.search.min_score`, when set, is sent as `score_threshold`.
///
/// # Errors
/// Returns `RagBaseError::Qdrant` on transport/server errors.
pub async fn search_namespace(
    client: &Qdrant,
    cfg: &RagConfig,
    query_vec: Vec<f32>,
    k: usize,
) -> Result<Vec<CourseSnippet>, RagBaseError> {
    let mut builder = SearchPointsBuilder::new(&cfg.qdrant.collection, query_vec, k as u64)
        .filter(namespace_filter(cfg))
        .with_payload(true);

    if let Some(t) = cfg.search.min_score {
        builder = builder.score_threshold(t);
    }

    let resp = client
        .search_points(builder)
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("search_points: {e}")))?;

    Ok(resp.result.into_iter().map(map_scored_point).collect())
}

/// Map a `ScoredPoint` into a [`CourseSnippet`], turning the payload into a JSON object.
pub(crate) fn map_scored_point(sp: ScoredPoint) -> CourseSnippet {
    let id = match sp.id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Uuid(s)) => s,
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    };

    let metadata = sp
        .payload
        .into_iter()
        .map(|(k, v)| (k, v.into_json()))
        .collect::<Map<String, JsonValue>>();

    CourseSnippet {
        id,
        score: sp.score,
        metadata: JsonValue::Object(metadata),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use qdrant_client::qdrant::{PointId, Value};

    use super::*;

    #[test]
    fn scored_point_payload_becomes_json_metadata() {
        let sp = ScoredPoint {
            id: Some(PointId::from(7u64)),
            score: 0.83,
            payload: HashMap::from([
                ("text".to_string(), Value::from("Risk = likelihood x impact")),
                ("source".to_string(), Value::from("lecture-03.pdf")),
            ]),
            ..Default::default()
        };

        let snippet = map_scored_point(sp);
        assert_eq!(snippet.id, "7");
        assert_eq!(snippet.score, 0.83);
        assert_eq!(snippet.metadata["text"], "Risk = likelihood x impact");
        assert_eq!(snippet.metadata["source"], "lecture-03.pdf");
    }

    #[test]
    fn missing_id_and_payload_yield_empty_values() {
        let snippet = map_scored_point(ScoredPoint::default());
        assert!(snippet.id.is_empty());
        assert_eq!(snippet.metadata, JsonValue::Object(Map::new()));
    }

    #[test]
    fn filter_matches_configured_namespace() {
        let cfg = RagConfig::default();
        let filter = namespace_filter(&cfg);
        assert_eq!(filter.must.len(), 1);
        assert!(filter.should.is_empty());
    }
}
