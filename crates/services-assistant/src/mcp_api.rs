use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use service_rag::model::{RankedResult, ServiceRecord};

use crate::answer::Language;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AskServiceParams {
    /// The citizen's question, in French or Arabic.
    pub question: String,
    /// Answer language: "fr" or "ar". Detected from the question when omitted.
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchServicesParams {
    /// Free-text description of the service being looked for.
    pub query: String,
    /// Length of the ranked list (default: RAG_TOP_K, capped at the catalog size).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetServiceParams {
    /// Service identifier such as "passport" or "birth_certificate".
    pub service_id: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AskServiceResponse {
    /// False when no relevant service was found; `answer` then asks to rephrase.
    pub found: bool,
    pub language: Language,
    /// Ready-to-show answer built from the service record.
    pub answer: String,
    pub service_id: Option<String>,
    /// Service name in the answer language.
    pub source: Option<String>,
    /// Retrieval stage that selected the service: semantic, keyword or weak_semantic.
    pub method: Option<String>,
    /// Full service details for rephrasing the answer. Use only this information.
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ServiceHit {
    pub id: String,
    pub name_fr: String,
    pub name_ar: String,
    pub method: String,
    /// Cosine similarity for semantic hits, matched keyword count for keyword hits.
    pub score: f64,
}

impl From<&RankedResult<'_>> for ServiceHit {
    fn from(result: &RankedResult<'_>) -> Self {
        Self {
            id: result.record.id.clone(),
            name_fr: result.record.name_fr.clone(),
            name_ar: result.record.name_ar.clone(),
            method: result.ranking.method().to_string(),
            score: result.ranking.score(),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchServicesResponse {
    pub results: Vec<ServiceHit>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ServiceDetailResponse {
    pub id: String,
    pub name_fr: String,
    pub name_ar: String,
    pub description: String,
    pub documents_required: Vec<String>,
    pub steps: Vec<String>,
    pub payment_methods: Vec<String>,
    pub cost: Option<String>,
    pub duration: Option<String>,
    pub office: Option<String>,
    pub keywords: Vec<String>,
}

impl From<&ServiceRecord> for ServiceDetailResponse {
    fn from(record: &ServiceRecord) -> Self {
        Self {
            id: record.id.clone(),
            name_fr: record.name_fr.clone(),
            name_ar: record.name_ar.clone(),
            description: record.description.clone(),
            documents_required: record.documents_required.clone().unwrap_or_default(),
            steps: record.steps.clone().unwrap_or_default(),
            payment_methods: record.payment_methods.clone().unwrap_or_default(),
            cost: record.cost.clone(),
            duration: record.duration.clone(),
            office: record.office.clone(),
            keywords: record.keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ServiceSummary {
    pub id: String,
    pub name_fr: String,
    pub name_ar: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceSummary>,
}
