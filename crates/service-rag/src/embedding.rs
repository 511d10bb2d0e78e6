/// Text embedding for the retrieval index.
///
/// The core only depends on the `Embedder` trait: one vector per input, a fixed
/// dimension per instance, deterministic for identical input. `FastEmbedder` is the
/// production implementation backed by fastembed's ONNX runtime.
///
/// All calls are synchronous and CPU-bound. Async callers should dispatch them through
/// `tokio::task::spawn_blocking`.
use crate::error::RagError;

pub trait Embedder: Send + Sync {
    /// Encode each text into a vector. The output has one entry per input, in order.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// Length of every vector this embedder produces.
    fn dimensions(&self) -> usize;
}

/// Wraps fastembed's `TextEmbedding` model (all-MiniLM-L6-v2, 384 dimensions).
pub struct FastEmbedder {
    model: fastembed::TextEmbedding,
}

impl FastEmbedder {
    /// Initialize the embedding model.
    ///
    /// This downloads the model on first run (~90MB) and blocks until it is loaded.
    pub fn new() -> Result<Self, RagError> {
        let options = fastembed::InitOptions::new(fastembed::EmbeddingModel::AllMiniLML6V2)
            .with_show_download_progress(true);
        let model = fastembed::TextEmbedding::try_new(options)
            .map_err(|e| RagError::Embedding(format!("model initialization failed: {e}")))?;
        Ok(Self { model })
    }
}

impl Embedder for FastEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let vectors = self
            .model
            .embed(texts.to_vec(), Some(16))
            .map_err(|e| RagError::Embedding(format!("encoding failed: {e}")))?;
        if vectors.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "expected {} vectors, model returned {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        384
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::Embedder;
    use crate::error::RagError;

    /// Deterministic embedder for tests: known texts map to fixed vectors, anything
    /// else gets `fallback`.
    pub struct StubEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        fallback: Vec<f32>,
        fail: bool,
        truncate: bool,
        reported_dimensions: Option<usize>,
        calls: AtomicUsize,
    }

    impl StubEmbedder {
        pub fn new(fallback: Vec<f32>) -> Self {
            Self {
                vectors: HashMap::new(),
                fallback,
                fail: false,
                truncate: false,
                reported_dimensions: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.to_string(), vector);
            self
        }

        pub fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        /// Drop the last vector of every batch.
        pub fn truncating(mut self) -> Self {
            self.truncate = true;
            self
        }

        /// Report `dimensions` regardless of the vectors actually produced.
        pub fn reporting_dimensions(mut self, dimensions: usize) -> Self {
            self.reported_dimensions = Some(dimensions);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Embedder for StubEmbedder {
        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RagError::Embedding("stub failure".to_string()));
            }
            let mut vectors: Vec<Vec<f32>> = texts
                .iter()
                .map(|t| self.vectors.get(t).unwrap_or(&self.fallback).clone())
                .collect();
            if self.truncate {
                vectors.pop();
            }
            Ok(vectors)
        }

        fn dimensions(&self) -> usize {
            self.reported_dimensions.unwrap_or(self.fallback.len())
        }
    }
}
