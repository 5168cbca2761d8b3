//! # Tariff Reference Search
//!
//! ## Overview
//! This library implements a search server for the Turkish customs tariff
//! reference tables: the GTİP code table, the explanatory-notes (izahname)
//! paragraph corpus, the tariff schedule (tarife) and the alphabetical goods
//! index (eşya fihristi).
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `text`: Turkish-locale case folding shared by all matching
//! - `datasets`: registry of the four reference tables, loaded once at startup
//! - `matcher`: dual-mode (numeric-prefix / keyword-AND) record filter
//! - `context`: bounded context-window extraction for the paragraph corpus
//! - `cache`: bounded memoizing query cache keyed by dataset and query
//! - `search`: engine façade combining the above
//! - `virtual_list`: client-side viewport geometry for very long result lists
//! - `api`: REST API endpoints
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: JSON table files exported from the source spreadsheets,
//!   search queries (text or code prefixes)
//! - **Output**: matching records in corpus order, context windows, dumps
//! - **Performance**: linear scan per query over in-memory tables,
//!   deterministic results
//!
//! ## Usage
//! ```rust,no_run
//! use tariff_reference_search::{
//!     config::Config, datasets::DatasetRegistry, search::SearchEngine,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::from_file("config.toml")?);
//!     let registry = Arc::new(DatasetRegistry::load(&config.datasets));
//!     let engine = SearchEngine::new(config, registry);
//!     let results = engine.search("gtip", "canlı at")?;
//!     println!("Found {} results", results.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod datasets;
pub mod errors;
pub mod matcher;
pub mod search;
pub mod text;
pub mod virtual_list;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use errors::{Result, SearchError};
pub use search::SearchEngine;

use std::sync::Arc;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub search_engine: Arc<search::SearchEngine>,
}
