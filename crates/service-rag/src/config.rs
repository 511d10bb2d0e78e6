use crate::error::RagError;

/// Secondary filter applied inside the strong-match branch.
pub const STRONG_MATCH_FLOOR: f64 = 0.15;

/// Retrieval tuning, loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct RagConfig {
    /// Length of the ranked list (`RAG_TOP_K`).
    pub top_k: usize,
    /// Top score needed for a strong match (`RAG_SIMILARITY_THRESHOLD`).
    pub similarity_threshold: f64,
    /// Floor for weak semantic results (`RAG_MIN_SIMILARITY`).
    pub min_similarity: f64,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 2,
            similarity_threshold: 0.30,
            min_similarity: 0.05,
        }
    }
}

impl RagConfig {
    /// Optional:
    /// - `RAG_TOP_K` (default: 2, must be >= 1)
    /// - `RAG_SIMILARITY_THRESHOLD` (default: 0.30)
    /// - `RAG_MIN_SIMILARITY` (default: 0.05)
    ///
    /// A value that is set but does not parse is an error rather than a silent default.
    pub fn from_env() -> Result<Self, RagError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, RagError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let top_k = match var("RAG_TOP_K") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| {
                    RagError::Configuration(format!(
                        "RAG_TOP_K must be an integer >= 1, got '{raw}'"
                    ))
                })?,
            None => defaults.top_k,
        };

        let similarity_threshold = parse_score(
            "RAG_SIMILARITY_THRESHOLD",
            var("RAG_SIMILARITY_THRESHOLD"),
            defaults.similarity_threshold,
        )?;
        let min_similarity = parse_score(
            "RAG_MIN_SIMILARITY",
            var("RAG_MIN_SIMILARITY"),
            defaults.min_similarity,
        )?;

        Ok(Self {
            top_k,
            similarity_threshold,
            min_similarity,
        })
    }
}

fn parse_score(name: &str, raw: Option<String>, default: f64) -> Result<f64, RagError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RagError::Configuration(format!("{name} must be a finite number, got '{raw}'")))
}
