//! # Dataset Registry Module
//!
//! ## Purpose
//! Loads the four tariff reference tables once at process start and exposes
//! them as read-only, process-lifetime handles to the search engine. Spreadsheet
//! conversion happens upstream; this module consumes the exported JSON tables.
//!
//! ## Input/Output Specification
//! - **Input**: JSON array-of-objects files, one per dataset
//! - **Output**: Immutable `Dataset` handles shared via `Arc`, per-dataset status
//! - **Datasets**: `gtip`, `izahname`, `tarife`, `esya-fihristi`
//!
//! ## Key Features
//! - Records keep their field order, since field names are the wire contract
//! - Absent and null field values read as the empty string
//! - A dataset whose table fails to load is marked unavailable and its
//!   endpoints answer with a distinct server error; the rest keep serving

use crate::config::DatasetsConfig;
use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Identifiers of the four reference tables, as they appear in API paths
pub const DATASET_IDS: [&str; 4] = ["gtip", "izahname", "tarife", "esya-fihristi"];

/// One row of a reference table: an ordered mapping from field name to value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Read a field as a string. Absent fields and nulls are the empty
    /// string; numeric cells (spreadsheet exports carry numeric codes)
    /// render as their decimal form.
    pub fn field(&self, name: &str) -> Cow<'_, str> {
        match self.0.get(name) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    /// The stable integer index carried by explanatory-notes records.
    /// Identifies the record for context lookups independently of its
    /// position in any filtered result list.
    pub fn stable_index(&self) -> Option<i64> {
        match self.0.get("index") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// One loaded reference table with its search configuration
#[derive(Debug)]
pub struct Dataset {
    /// Dataset identifier as used in API paths
    pub id: String,
    /// Ordered rows, immutable for the process lifetime
    pub records: Vec<Record>,
    /// Fields the matcher searches, in order; the first one is the
    /// prefix-mode field
    pub search_fields: Vec<String>,
}

/// Load outcome per dataset
enum DatasetState {
    Loaded(Arc<Dataset>),
    Failed { details: String },
}

/// Availability report for one dataset, served by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatus {
    pub dataset: String,
    pub available: bool,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read-only registry over the four reference tables
pub struct DatasetRegistry {
    datasets: HashMap<String, DatasetState>,
}

impl DatasetRegistry {
    /// Load every configured dataset. A failed table does not abort the
    /// process; the dataset is recorded as unavailable with its load error.
    pub fn load(config: &DatasetsConfig) -> Self {
        let mut datasets = HashMap::new();

        for (id, file) in config.iter() {
            let state = match load_table(&file.path) {
                Ok(records) => {
                    tracing::info!(dataset = id, rows = records.len(), "dataset loaded");
                    DatasetState::Loaded(Arc::new(Dataset {
                        id: id.to_string(),
                        records,
                        search_fields: file.search_fields.clone(),
                    }))
                }
                Err(e) => {
                    tracing::error!(dataset = id, error = %e, "dataset failed to load");
                    DatasetState::Failed {
                        details: e.to_string(),
                    }
                }
            };
            datasets.insert(id.to_string(), state);
        }

        Self { datasets }
    }

    /// Build a registry from already-loaded datasets
    pub fn from_datasets(datasets: Vec<Dataset>) -> Self {
        Self {
            datasets: datasets
                .into_iter()
                .map(|d| (d.id.clone(), DatasetState::Loaded(Arc::new(d))))
                .collect(),
        }
    }

    /// Get a dataset handle, distinguishing "unknown dataset" from
    /// "known but failed to load"
    pub fn get(&self, id: &str) -> Result<Arc<Dataset>> {
        match self.datasets.get(id) {
            Some(DatasetState::Loaded(dataset)) => Ok(dataset.clone()),
            Some(DatasetState::Failed { details }) => Err(SearchError::DatasetUnavailable {
                dataset: id.to_string(),
                details: details.clone(),
            }),
            None => Err(SearchError::DatasetNotFound {
                dataset: id.to_string(),
            }),
        }
    }

    /// Availability report for every dataset
    pub fn statuses(&self) -> Vec<DatasetStatus> {
        let mut statuses: Vec<DatasetStatus> = self
            .datasets
            .iter()
            .map(|(id, state)| match state {
                DatasetState::Loaded(dataset) => DatasetStatus {
                    dataset: id.clone(),
                    available: true,
                    rows: dataset.records.len(),
                    error: None,
                },
                DatasetState::Failed { details } => DatasetStatus {
                    dataset: id.clone(),
                    available: false,
                    rows: 0,
                    error: Some(details.clone()),
                },
            })
            .collect();
        statuses.sort_by(|a, b| a.dataset.cmp(&b.dataset));
        statuses
    }

    /// True when every dataset loaded
    pub fn all_available(&self) -> bool {
        self.datasets
            .values()
            .all(|s| matches!(s, DatasetState::Loaded(_)))
    }
}

/// Parse a JSON array-of-objects table file into records
fn load_table(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    let rows: Vec<Map<String, Value>> = serde_json::from_str(&content)?;
    Ok(rows.into_iter().map(Record).collect())
}
