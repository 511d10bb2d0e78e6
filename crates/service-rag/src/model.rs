use serde::{Deserialize, Serialize};

/// A single public service (e.g. passport issuance, birth certificate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Unique key, e.g. "passport", "birth_certificate"
    pub id: String,
    /// Service name in French
    pub name_fr: String,
    /// Service name in Arabic
    pub name_ar: String,
    /// Free-text description of the service
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_required: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_methods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    /// Matching tokens for the keyword fallback, compared case-insensitively.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ServiceRecord {
    /// Text embedded for this record when the index is built.
    pub fn indexing_text(&self) -> String {
        format!(
            "Service: {} / {}. Description: {}",
            self.name_fr, self.name_ar, self.description
        )
    }
}

/// How a result made it into the result set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ranking {
    /// Top score cleared the similarity threshold.
    Semantic(f64),
    /// Number of keywords found in the query.
    Keyword(usize),
    /// Low-confidence semantic result kept above the minimum similarity.
    WeakSemantic(f64),
}

impl Ranking {
    pub fn method(&self) -> &'static str {
        match self {
            Ranking::Semantic(_) => "semantic",
            Ranking::Keyword(_) => "keyword",
            Ranking::WeakSemantic(_) => "weak_semantic",
        }
    }

    /// Score as a float; keyword counts are reported as whole numbers.
    pub fn score(&self) -> f64 {
        match *self {
            Ranking::Semantic(s) | Ranking::WeakSemantic(s) => s,
            Ranking::Keyword(n) => n as f64,
        }
    }
}

/// A service record together with the ranking that selected it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult<'a> {
    pub record: &'a ServiceRecord,
    pub ranking: Ranking,
}
