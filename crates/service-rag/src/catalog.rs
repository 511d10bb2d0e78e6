use std::collections::HashSet;

use crate::error::RagError;
use crate::model::ServiceRecord;

/// The fixed, ordered set of services the assistant can answer about.
///
/// Order is significant: the index keeps catalog order, ranking ties preserve it,
/// and the keyword fallback breaks ties by it.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ServiceRecord>,
}

impl Catalog {
    /// Validate and wrap a list of records.
    ///
    /// Rejects an empty list, duplicate identifiers, and records whose identifier,
    /// names or description are blank.
    pub fn new(records: Vec<ServiceRecord>) -> Result<Self, RagError> {
        if records.is_empty() {
            return Err(RagError::Configuration("catalog is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for (position, record) in records.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(RagError::Configuration(format!(
                    "service at position {position} has an empty id"
                )));
            }
            for (field, value) in [
                ("name_fr", &record.name_fr),
                ("name_ar", &record.name_ar),
                ("description", &record.description),
            ] {
                if value.trim().is_empty() {
                    return Err(RagError::Configuration(format!(
                        "service '{}' is missing {field}",
                        record.id
                    )));
                }
            }
            if !seen.insert(record.id.as_str()) {
                return Err(RagError::Configuration(format!(
                    "duplicate service id: {}",
                    record.id
                )));
            }
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ServiceRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ServiceRecord {
        ServiceRecord {
            id: id.to_string(),
            name_fr: format!("Service {id}"),
            name_ar: format!("خدمة {id}"),
            description: format!("Description of {id}"),
            documents_required: None,
            steps: None,
            payment_methods: None,
            cost: None,
            duration: None,
            office: None,
            keywords: vec![],
        }
    }

    #[test]
    fn test_accepts_valid_records_in_order() {
        let catalog = Catalog::new(vec![record("b"), record("a")]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records()[0].id, "b");
        assert_eq!(catalog.get("a").map(|r| r.id.as_str()), Some("a"));
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let err = Catalog::new(vec![]).unwrap_err();
        assert!(matches!(err, RagError::Configuration(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Catalog::new(vec![record("a"), record("a")]).unwrap_err();
        assert!(err.to_string().contains("duplicate service id: a"));
    }

    #[test]
    fn test_rejects_blank_description() {
        let mut r = record("a");
        r.description = "   ".to_string();
        let err = Catalog::new(vec![r]).unwrap_err();
        assert!(err.to_string().contains("missing description"));
    }

    #[test]
    fn test_optional_fields_default_when_absent() {
        let json = r#"{
            "id": "passport",
            "name_fr": "Passeport",
            "name_ar": "جواز السفر",
            "description": "Delivrance du passeport"
        }"#;
        let r: ServiceRecord = serde_json::from_str(json).unwrap();
        assert!(r.documents_required.is_none());
        assert!(r.keywords.is_empty());
        assert_eq!(
            r.indexing_text(),
            "Service: Passeport / جواز السفر. Description: Delivrance du passeport"
        );
    }
}
