use std::path::PathBuf;

use service_rag::config::RagConfig;

use crate::answer::Language;
use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// Everything is optional. Without `SERVICES_CATALOG_PATH` the built-in catalog is used.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to a JSON catalog overriding the built-in one.
    pub catalog_path: Option<PathBuf>,
    /// Answer language for questions with no Arabic script and no explicit `lang`.
    pub default_language: Language,
    pub rag: RagConfig,
}

impl Config {
    /// Optional:
    /// - `SERVICES_CATALOG_PATH`: JSON array of service records
    /// - `SERVICES_DEFAULT_LANG`: "fr" (default) or "ar"
    /// - `RAG_TOP_K`, `RAG_SIMILARITY_THRESHOLD`, `RAG_MIN_SIMILARITY`
    pub fn from_env() -> Result<Self, AppError> {
        let catalog_path = std::env::var("SERVICES_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        if let Some(path) = &catalog_path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "catalog file not found at {}",
                    path.display()
                )));
            }
        }

        let default_language = match std::env::var("SERVICES_DEFAULT_LANG") {
            Ok(code) => Language::from_code(&code).ok_or_else(|| {
                AppError::Config(format!(
                    "SERVICES_DEFAULT_LANG must be 'fr' or 'ar', got '{code}'"
                ))
            })?,
            Err(_) => Language::French,
        };

        Ok(Self {
            catalog_path,
            default_language,
            rag: RagConfig::from_env()?,
        })
    }
}
