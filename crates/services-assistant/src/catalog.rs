/// Catalog loading for the assistant.
///
/// The catalog is a JSON array of service records. A copy ships inside the binary; an
/// operator can point `SERVICES_CATALOG_PATH` at another file with the same shape.
use std::path::Path;

use service_rag::catalog::Catalog;
use service_rag::model::ServiceRecord;

use crate::error::AppError;

const BUILTIN_CATALOG: &str = include_str!("../data/services.json");

/// Load the catalog from `path`, or the built-in one when `path` is `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, AppError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                AppError::Catalog(format!("failed to read {}: {e}", path.display()))
            })?;
            parse_catalog(&content)
        }
        None => parse_catalog(BUILTIN_CATALOG),
    }
}

pub fn parse_catalog(content: &str) -> Result<Catalog, AppError> {
    let records: Vec<ServiceRecord> = serde_json::from_str(content)
        .map_err(|e| AppError::Catalog(format!("invalid catalog JSON: {e}")))?;
    Ok(Catalog::new(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.len(), 8);

        let passport = catalog.get("passport").expect("passport service");
        assert_eq!(passport.name_fr, "Passeport biométrique");
        assert!(passport.keywords.iter().any(|k| k == "travel document"));
        assert!(passport.documents_required.as_ref().is_some_and(|d| !d.is_empty()));

        let residence = catalog.get("residence_certificate").unwrap();
        assert!(residence.steps.is_none());
    }

    #[test]
    fn test_every_builtin_service_has_keywords() {
        let catalog = load_catalog(None).unwrap();
        for record in catalog.records() {
            assert!(!record.keywords.is_empty(), "{} has no keywords", record.id);
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = parse_catalog("{not json").unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let err = parse_catalog(r#"[{"id": "x", "name_fr": "X", "name_ar": "س"}]"#).unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_rejects_empty_array() {
        let err = parse_catalog("[]").unwrap_err();
        assert!(matches!(err, AppError::Rag(_)));
    }

    #[test]
    fn test_missing_file_is_catalog_error() {
        let err = load_catalog(Some(Path::new("/nonexistent/services.json"))).unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }
}
