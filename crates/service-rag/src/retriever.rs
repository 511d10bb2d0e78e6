/// Query-time retrieval over the service index.
///
/// A query goes through up to three stages, stopping at the first that yields
/// something:
///
/// 1. Semantic: rank by cosine similarity and keep the `top_k` best. If the best score
///    clears the similarity threshold, return the ranked entries above the strong-match
///    floor.
/// 2. Keyword: count catalog keywords occurring in the lower-cased query and return the
///    single record with the highest non-zero count.
/// 3. Weak semantic: return the ranked entries above the minimum similarity.
///
/// An empty result means no relevant service was found; it is not an error.
use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::config::{RagConfig, STRONG_MATCH_FLOOR};
use crate::embedding::Embedder;
use crate::error::RagError;
use crate::index::Index;
use crate::model::{RankedResult, Ranking, ServiceRecord};

pub struct Retriever {
    index: Index,
    embedder: Arc<dyn Embedder>,
    config: RagConfig,
}

impl Retriever {
    /// `embedder` must be the one the index was built with.
    pub fn new(index: Index, embedder: Arc<dyn Embedder>, config: RagConfig) -> Self {
        Self {
            index,
            embedder,
            config,
        }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return the matching service records, best first.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<&ServiceRecord>, RagError> {
        Ok(self
            .search_ranked(query, top_k)?
            .into_iter()
            .map(|r| r.record)
            .collect())
    }

    /// Like `search`, but keeps the score and the stage that produced each result.
    pub fn search_ranked(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RankedResult<'_>>, RagError> {
        validate_query(query)?;
        if top_k == 0 {
            return Err(RagError::InvalidQuery("top_k must be at least 1".to_string()));
        }

        let query_vector = self
            .embedder
            .encode(&[query.to_string()])?
            .pop()
            .ok_or_else(|| RagError::Embedding("empty embedding result".to_string()))?;

        let mut ranked = self.index.similarities(&query_vector)?;
        // Stable: equal scores keep catalog order.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(top_k);

        let entries = self.index.entries();

        if let Some(&(_, best)) = ranked.first() {
            if best >= self.config.similarity_threshold {
                debug!(best, "strong semantic match");
                return Ok(ranked
                    .iter()
                    .filter(|(_, score)| *score > STRONG_MATCH_FLOOR)
                    .map(|&(i, score)| RankedResult {
                        record: &entries[i].record,
                        ranking: Ranking::Semantic(score),
                    })
                    .collect());
            }
        }

        if let Some(hit) = self.keyword_search(query) {
            debug!(service = %hit.record.id, "keyword fallback match");
            return Ok(vec![hit]);
        }

        let weak: Vec<RankedResult<'_>> = ranked
            .iter()
            .filter(|(_, score)| *score > self.config.min_similarity)
            .map(|&(i, score)| RankedResult {
                record: &entries[i].record,
                ranking: Ranking::WeakSemantic(score),
            })
            .collect();
        debug!(results = weak.len(), "weak semantic fallback");
        Ok(weak)
    }

    /// Keyword-only lookup, also usable on its own when embedding is unavailable.
    ///
    /// Counts how many of each record's keywords occur as substrings of the lower-cased
    /// query. Returns the record with the highest count, or `None` if nothing matched.
    /// When several records share the highest count, the last one in catalog order wins.
    /// Empty keywords are skipped; whitespace inside keywords is significant.
    pub fn keyword_search(&self, query: &str) -> Option<RankedResult<'_>> {
        let query_lower = query.to_lowercase();
        self.index
            .entries()
            .iter()
            .map(|entry| (entry, keyword_hits(&entry.record, &query_lower)))
            // `max_by_key` returns the last maximum.
            .max_by_key(|&(_, count)| count)
            .filter(|&(_, count)| count > 0)
            .map(|(entry, count)| RankedResult {
                record: &entry.record,
                ranking: Ranking::Keyword(count),
            })
    }
}

fn validate_query(query: &str) -> Result<(), RagError> {
    if query.trim().is_empty() {
        return Err(RagError::InvalidQuery("query must not be empty".to_string()));
    }
    Ok(())
}

fn keyword_hits(record: &ServiceRecord, query_lower: &str) -> usize {
    record
        .keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| !k.is_empty() && query_lower.contains(k.as_str()))
        .count()
}
