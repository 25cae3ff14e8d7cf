//! Runtime configuration loaded from environment variables.

use crate::error::ContextorError;

/// Pipeline knobs. All fields have defaults via `from_env`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextorConfig {
    /// Prior interactions of the session replayed to the model.
    pub context_turns: usize,
    /// Snippets fetched from the course index per question.
    pub top_k: usize,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            context_turns: 10,
            top_k: 5,
        }
    }
}

impl ContextorConfig {
    /// Build from `CHAT_CONTEXT_TURNS` and `RAG_TOP_K`.
    ///
    /// # Example
    /// ```
    /// # use contextor::ContextorConfig;
    /// let cfg = ContextorConfig::from_env().unwrap();
    /// assert!(cfg.top_k >= 1);
    /// ```
    pub fn from_env() -> Result<Self, ContextorError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup. `RAG_TOP_K` is read only here; the index
    /// takes the count per query.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ContextorError> {
        let dflt = Self::default();
        let cfg = Self {
            context_turns: parse(&get, "CHAT_CONTEXT_TURNS", dflt.context_turns)?,
            top_k: parse(&get, "RAG_TOP_K", dflt.top_k)?,
        };
        if cfg.top_k == 0 {
            return Err(ContextorError::Config("RAG_TOP_K must be > 0".into()));
        }
        Ok(cfg)
    }
}

fn parse<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    k: &str,
    dflt: T,
) -> Result<T, ContextorError> {
    match get(k) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| ContextorError::Config(format!("{k}='{v}' is not a valid number"))),
        _ => Ok(dflt),
    }
}
