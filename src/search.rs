//! # Search Engine Module
//!
//! ## Purpose
//! Façade over the dataset registry, the matcher, and the context windower.
//! Owns the query cache and answers every data question the API layer asks.
//!
//! ## Input/Output Specification
//! - **Input**: Dataset id, raw query string or target paragraph index
//! - **Output**: Matching records in corpus order, context windows, statuses
//!
//! ## Key Features
//! - Pure, synchronous, read-only operation over immutable corpus snapshots;
//!   concurrent requests need no locking
//! - Cache-first search with the cache keyed by dataset and normalized query
//! - Distinct errors for unknown datasets, unavailable datasets, and absent
//!   context indices, so the API can map them to distinct statuses

use crate::cache::{CacheStats, QueryCache};
use crate::config::Config;
use crate::context::context_window;
use crate::datasets::{Dataset, DatasetRegistry, DatasetStatus, Record};
use crate::errors::{Result, SearchError};
use crate::matcher::match_records;
use crate::text::normalize;
use serde::Serialize;
use std::sync::Arc;

/// One entry of the context window as served on the wire
#[derive(Debug, Clone, Serialize)]
pub struct ContextParagraph {
    pub paragraph: String,
    /// Mirrors the window's target flag; the client renders this row bold
    #[serde(rename = "isBold")]
    pub is_bold: bool,
}

/// Engine statistics, served by `/stats`
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub datasets: Vec<DatasetStatus>,
    pub cache: CacheStats,
}

/// Main search engine
pub struct SearchEngine {
    config: Arc<Config>,
    registry: Arc<DatasetRegistry>,
    query_cache: QueryCache<Arc<Vec<Record>>>,
}

impl SearchEngine {
    pub fn new(config: Arc<Config>, registry: Arc<DatasetRegistry>) -> Self {
        let query_cache = QueryCache::new(
            config.search.query_cache_size,
            config.search.query_cache_ttl_seconds,
        );
        Self {
            config,
            registry,
            query_cache,
        }
    }

    /// Search a dataset with the dual-mode matcher. Empty queries resolve
    /// locally to an empty result list and are never an error.
    pub fn search(&self, dataset_id: &str, query: &str) -> Result<Arc<Vec<Record>>> {
        let dataset = self.registry.get(dataset_id)?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(Arc::new(Vec::new()));
        }

        let cache_key = normalize(query);
        if self.config.search.enable_query_cache {
            if let Some(cached) = self.query_cache.get(dataset_id, &cache_key) {
                tracing::debug!(dataset = dataset_id, "query cache hit");
                return Ok(cached);
            }
        }

        let results: Vec<Record> = match_records(&dataset.records, query, &dataset.search_fields)
            .into_iter()
            .cloned()
            .collect();
        let results = Arc::new(results);

        if self.config.search.enable_query_cache {
            self.query_cache
                .insert(dataset_id, &cache_key, results.clone());
        }

        Ok(results)
    }

    /// Context window around an explanatory-notes paragraph. An index absent
    /// from the corpus is a distinct not-found error, never an empty window.
    pub fn context(&self, target_index: i64) -> Result<Vec<ContextParagraph>> {
        let dataset = self.registry.get("izahname")?;
        let window = context_window(
            &dataset.records,
            target_index,
            self.config.search.context_radius,
        );

        if !window.found {
            return Err(SearchError::ContextIndexNotFound {
                index: target_index,
            });
        }

        Ok(window
            .entries
            .iter()
            .map(|entry| ContextParagraph {
                paragraph: entry.record.field("paragraf").into_owned(),
                is_bold: entry.is_target,
            })
            .collect())
    }

    /// Full corpus dump, identity pass-through with no matching
    pub fn full_dump(&self, dataset_id: &str) -> Result<Arc<Dataset>> {
        self.registry.get(dataset_id)
    }

    /// Ok when every dataset loaded; the failed datasets otherwise
    pub fn health_check(&self) -> Result<()> {
        let failed: Vec<String> = self
            .registry
            .statuses()
            .into_iter()
            .filter(|s| !s.available)
            .map(|s| s.dataset)
            .collect();

        if failed.is_empty() {
            Ok(())
        } else {
            Err(SearchError::Internal {
                message: format!("Datasets unavailable: {}", failed.join(", ")),
            })
        }
    }

    pub fn statuses(&self) -> Vec<DatasetStatus> {
        self.registry.statuses()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            datasets: self.registry.statuses(),
            cache: self.query_cache.stats(),
        }
    }
}
