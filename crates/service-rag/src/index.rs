/// In-memory vector index over the service catalog.
///
/// Built once at startup from a `Catalog` and an `Embedder`; immutable afterwards and
/// safe to share across threads. Rebuilding means building a new `Index`.
use sha2::{Digest, Sha256};
use tracing::info;

use crate::catalog::Catalog;
use crate::embedding::Embedder;
use crate::error::RagError;
use crate::model::ServiceRecord;

/// Guards the cosine denominator against zero-norm vectors.
const NORM_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub record: ServiceRecord,
    /// The text that was embedded for this record
    pub text: String,
    pub vector: Vec<f32>,
    norm: f64,
}

#[derive(Debug, Clone)]
pub struct Index {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

impl Index {
    /// Embed every catalog record in one batch and store the vectors in catalog order.
    pub fn build(catalog: &Catalog, embedder: &dyn Embedder) -> Result<Self, RagError> {
        if catalog.is_empty() {
            return Err(RagError::Configuration("cannot index an empty catalog".to_string()));
        }

        let texts: Vec<String> = catalog.records().iter().map(|r| r.indexing_text()).collect();
        let vectors = embedder.encode(&texts)?;

        if vectors.len() != texts.len() {
            return Err(RagError::Configuration(format!(
                "embedder returned {} vectors for {} services",
                vectors.len(),
                texts.len()
            )));
        }

        let dimensions = vectors[0].len();
        if dimensions == 0 {
            return Err(RagError::Configuration(
                "embedder produced zero-length vectors".to_string(),
            ));
        }
        if dimensions != embedder.dimensions() {
            return Err(RagError::Configuration(format!(
                "embedder reports {} dimensions but produced {dimensions}",
                embedder.dimensions()
            )));
        }

        let mut entries = Vec::with_capacity(texts.len());
        for ((record, text), vector) in catalog.records().iter().zip(texts).zip(vectors) {
            if vector.len() != dimensions {
                return Err(RagError::Configuration(format!(
                    "inconsistent embedding dimensions: service '{}' has {}, expected {dimensions}",
                    record.id,
                    vector.len()
                )));
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(RagError::Embedding(format!(
                    "non-finite embedding for service '{}'",
                    record.id
                )));
            }
            entries.push(IndexEntry {
                record: record.clone(),
                text,
                norm: norm(&vector),
                vector,
            });
        }

        let index = Self {
            entries,
            dimensions,
        };
        info!(
            services = index.len(),
            dimensions,
            fingerprint = %index.fingerprint(),
            "retrieval index built"
        );
        Ok(index)
    }

    /// Cosine similarity of `query` against every entry, in catalog order.
    ///
    /// score = dot(v, q) / (|v| * |q| + 1e-10). Not clamped.
    pub fn similarities(&self, query: &[f32]) -> Result<Vec<(usize, f64)>, RagError> {
        if query.len() != self.dimensions {
            return Err(RagError::Embedding(format!(
                "query vector has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        if query.iter().any(|x| !x.is_finite()) {
            return Err(RagError::Embedding("non-finite query embedding".to_string()));
        }

        let query_norm = norm(query);
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let dot: f64 = entry
                    .vector
                    .iter()
                    .zip(query)
                    .map(|(a, b)| f64::from(*a) * f64::from(*b))
                    .sum();
                (i, dot / (entry.norm * query_norm + NORM_EPSILON))
            })
            .collect())
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// SHA-256 over the indexed texts and the vector dimension.
    ///
    /// Changes whenever the catalog content or the embedding model's output size does.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.dimensions.to_string().as_bytes());
        for entry in &self.entries {
            hasher.update(b"|");
            hasher.update(entry.record.id.as_bytes());
            hasher.update(b"=");
            hasher.update(entry.text.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

fn norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt()
}
