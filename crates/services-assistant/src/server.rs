/// MCP server for the public-services assistant.
///
/// Exposes four tools:
/// - `ask_service`: Answer a question with the single most relevant service
/// - `search_services`: Ranked retrieval results with scores
/// - `get_service`: Look up a service by ID
/// - `list_services`: List the whole catalog
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::{info, warn};

use service_rag::error::RagError;
use service_rag::model::RankedResult;
use service_rag::retriever::Retriever;

use crate::answer::{self, Language};
use crate::mcp_api::{
    AskServiceParams, AskServiceResponse, GetServiceParams, SearchServicesParams,
    SearchServicesResponse, ServiceDetailResponse, ServiceHit, ServiceListResponse,
    ServiceSummary,
};

#[derive(Clone)]
pub struct ServicesAssistantServer {
    retriever: Arc<Retriever>,
    default_language: Language,
    tool_router: ToolRouter<ServicesAssistantServer>,
}

impl ServicesAssistantServer {
    pub fn new(retriever: Arc<Retriever>, default_language: Language) -> Self {
        Self {
            retriever,
            default_language,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl ServicesAssistantServer {
    #[tool(description = "Answer a question about a Mauritanian public service (passport, ID card, birth certificate, driving license...). Returns a ready answer in French or Arabic plus the service details it is based on.")]
    async fn ask_service(
        &self,
        Parameters(params): Parameters<AskServiceParams>,
    ) -> Result<Json<AskServiceResponse>, String> {
        let question = answer::clean_text(&params.question);
        if question.is_empty() {
            return Err("question must not be empty".to_string());
        }

        let lang = match params.lang.as_deref() {
            Some(code) => Language::from_code(code)
                .ok_or_else(|| format!("unsupported language: '{code}' (expected 'fr' or 'ar')"))?,
            None => Language::detect(&question, self.default_language),
        };

        let retriever = Arc::clone(&self.retriever);
        let response =
            tokio::task::spawn_blocking(move || answer_question(&retriever, &question, lang))
                .await
                .map_err(|e| format!("search task failed: {e}"))?
                .map_err(|e| format!("search failed: {e}"))?;

        info!(
            found = response.found,
            service = response.service_id.as_deref().unwrap_or("-"),
            lang = lang.code(),
            "ask_service answered"
        );
        Ok(Json(response))
    }

    #[tool(description = "Search the public-services catalog. Returns the ranked services with the retrieval method and score.")]
    async fn search_services(
        &self,
        Parameters(params): Parameters<SearchServicesParams>,
    ) -> Result<Json<SearchServicesResponse>, String> {
        let query = answer::clean_text(&params.query);
        if query.is_empty() {
            return Err("query must not be empty".to_string());
        }

        let catalog_size = self.retriever.index().len();
        let limit = params
            .limit
            .map(|l| l as usize)
            .unwrap_or(self.retriever.config().top_k)
            .clamp(1, catalog_size);

        let retriever = Arc::clone(&self.retriever);
        let results = tokio::task::spawn_blocking(move || {
            retriever
                .search_ranked(&query, limit)
                .map(|hits| hits.iter().map(ServiceHit::from).collect::<Vec<_>>())
        })
        .await
        .map_err(|e| format!("search task failed: {e}"))?
        .map_err(|e| format!("search failed: {e}"))?;

        Ok(Json(SearchServicesResponse { results }))
    }

    #[tool(description = "Get the full record of a public service by ID (e.g. 'passport', 'national_id', 'birth_certificate').")]
    async fn get_service(
        &self,
        Parameters(params): Parameters<GetServiceParams>,
    ) -> Result<Json<ServiceDetailResponse>, String> {
        let service_id = params.service_id.trim().to_string();
        if service_id.is_empty() {
            return Err("service_id must not be empty".to_string());
        }

        let record = self
            .retriever
            .index()
            .entries()
            .iter()
            .map(|e| &e.record)
            .find(|r| r.id.eq_ignore_ascii_case(&service_id))
            .ok_or_else(|| crate::error::AppError::NotFound(service_id).to_string())?;

        Ok(Json(ServiceDetailResponse::from(record)))
    }

    #[tool(description = "List every public service in the catalog with its French and Arabic names.")]
    async fn list_services(&self) -> Result<Json<ServiceListResponse>, String> {
        let services = self
            .retriever
            .index()
            .entries()
            .iter()
            .map(|e| ServiceSummary {
                id: e.record.id.clone(),
                name_fr: e.record.name_fr.clone(),
                name_ar: e.record.name_ar.clone(),
            })
            .collect();
        Ok(Json(ServiceListResponse { services }))
    }
}

/// Retrieve the best service for `question` and compose the answer.
///
/// If the query cannot be embedded, falls back to keyword-only matching instead of
/// failing the request.
fn answer_question(
    retriever: &Retriever,
    question: &str,
    lang: Language,
) -> Result<AskServiceResponse, RagError> {
    let best: Option<RankedResult<'_>> =
        match retriever.search_ranked(question, retriever.config().top_k) {
            Ok(results) => results.into_iter().next(),
            Err(RagError::Embedding(e)) => {
                warn!(error = %e, "query embedding failed, using keyword search only");
                retriever.keyword_search(question)
            }
            Err(e) => return Err(e),
        };

    let Some(best) = best else {
        return Ok(AskServiceResponse {
            found: false,
            language: lang,
            answer: answer::not_found_message(lang).to_string(),
            service_id: None,
            source: None,
            method: None,
            context: None,
        });
    };

    let service = best.record;
    Ok(AskServiceResponse {
        found: true,
        language: lang,
        answer: answer::compose_answer(service, lang),
        service_id: Some(service.id.clone()),
        source: Some(lang.service_name(service).to_string()),
        method: Some(best.ranking.method().to_string()),
        context: Some(answer::build_context(service)),
    })
}

#[tool_handler]
impl ServerHandler for ServicesAssistantServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "services-assistant".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Mauritanian public services assistant. Use ask_service to answer a citizen's \
                 question in French or Arabic; the answer field can be shown as is, or \
                 rephrased from the context field in the same language, using only that \
                 information. Use search_services for ranked candidates, get_service for a \
                 full record and list_services to browse the catalog."
                    .to_string(),
            ),
        }
    }
}
