//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the tariff reference search endpoints. Thin
//! transport glue: handlers translate query strings into search engine calls
//! and map errors to HTTP statuses.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with query strings and paragraph indices
//! - **Output**: JSON arrays of records, context windows, status reports
//! - **Endpoints**: per-dataset search, context, full dumps, health, stats
//!
//! ## Key Features
//! - Field names of the source tables pass through unchanged; they are the
//!   wire contract
//! - Distinct statuses: 404 for unknown datasets and absent context indices,
//!   503 for datasets that failed to load, 200 with `[]` for empty queries
//! - CORS support for browser frontends

use crate::datasets::Record;
use crate::errors::{Result, SearchError};
use crate::internal_error;
use crate::utils::{TextUtils, Timer};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;

/// Application state for the API server
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Search request query string
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// Context request query string
#[derive(Debug, Deserialize)]
pub struct ContextParams {
    pub index: i64,
}

/// Datasets served whole by the dump endpoint
const DUMPABLE_DATASETS: [&str; 2] = ["tarife", "esya-fihristi"];

impl ApiServer {
    /// Create new API server
    pub async fn new(app_state: crate::AppState) -> Result<Self> {
        Ok(Self { app_state })
    }

    /// Run the API server
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;
        let app_state = self.app_state;

        tracing::info!("Starting API server on {}", bind_addr);

        // The HttpServer builder is !Send. Finish it into a `Server` before
        // the first await so the future stays spawnable.
        let server = HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .wrap(cors)
                .configure(routes)
        })
        .bind(&bind_addr)
        .map_err(|e| internal_error!("Failed to bind server to {}: {}", bind_addr, e))?
        .run();

        server
            .await
            .map_err(|e| internal_error!("Server error: {}", e))?;

        Ok(())
    }
}

/// Route table, shared with the handler tests
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/izahname/context", web::get().to(context_handler))
        .route("/api/{dataset}/search", web::get().to(search_handler))
        .route("/api/{dataset}/all", web::get().to(dump_handler))
        .route("/health", web::get().to(health_handler))
        .route("/stats", web::get().to(stats_handler))
        .route("/", web::get().to(index_handler));
}

/// Map an engine error to its HTTP response
fn error_response(error: &SearchError) -> HttpResponse {
    let body = serde_json::json!({ "error": error.to_string() });
    match error {
        e if e.is_not_found() => HttpResponse::NotFound().json(body),
        SearchError::DatasetUnavailable { .. } => {
            tracing::error!(category = error.category(), "{}", error);
            HttpResponse::ServiceUnavailable().json(body)
        }
        _ => {
            tracing::error!(category = error.category(), "{}", error);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// The explanatory-notes search endpoint answers `{ index, paragraph }`
/// objects rather than whole records
fn project_izahname(records: &[Record]) -> Vec<serde_json::Value> {
    records
        .iter()
        .map(|row| {
            serde_json::json!({
                "index": row.0.get("index").cloned().unwrap_or(serde_json::Value::Null),
                "paragraph": row.field("paragraf"),
            })
        })
        .collect()
}

/// Search endpoint handler
async fn search_handler(
    app_state: web::Data<crate::AppState>,
    path: web::Path<String>,
    params: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    let dataset = path.into_inner();
    let timer = Timer::new("search");

    match app_state.search_engine.search(&dataset, &params.query) {
        Ok(results) => {
            tracing::info!(
                dataset = %dataset,
                query = %TextUtils::preview(&params.query, 80),
                results = results.len(),
                query_time_ms = timer.elapsed_ms(),
                "search completed"
            );
            if dataset == "izahname" {
                Ok(HttpResponse::Ok().json(project_izahname(&results)))
            } else {
                Ok(HttpResponse::Ok().json(&*results))
            }
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// Context endpoint handler for the explanatory-notes corpus
async fn context_handler(
    app_state: web::Data<crate::AppState>,
    params: web::Query<ContextParams>,
) -> ActixResult<HttpResponse> {
    match app_state.search_engine.context(params.index) {
        Ok(window) => Ok(HttpResponse::Ok().json(window)),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Full dump endpoint handler; identity pass-through for the datasets the
/// client filters locally
async fn dump_handler(
    app_state: web::Data<crate::AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let dataset = path.into_inner();
    if !DUMPABLE_DATASETS.contains(&dataset.as_str()) {
        return Ok(error_response(&SearchError::DatasetNotFound { dataset }));
    }

    match app_state.search_engine.full_dump(&dataset) {
        Ok(data) => {
            tracing::info!(dataset = %dataset, rows = data.records.len(), "full dump served");
            Ok(HttpResponse::Ok().json(&data.records))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let statuses = app_state.search_engine.statuses();
    let status = if statuses.iter().all(|s| s.available) {
        "healthy"
    } else {
        "degraded"
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "datasets": statuses,
    })))
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(app_state.search_engine.stats()))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Tariff Reference Search</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .header { color: #2c3e50; }
            .endpoint { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1 class="header">Tariff Reference Search API</h1>
        <p>Search across the Turkish customs tariff reference tables: GTİP codes,
        explanatory notes (izahname), the tariff schedule and the alphabetical goods index.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">GET</span> /api/{dataset}/search?query=...
            <p>Search one dataset (gtip, izahname, tarife, esya-fihristi). All-digit
            queries match as a code prefix, free text matches every keyword.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /api/izahname/context?index=...
            <p>Surrounding paragraphs for an explanatory-notes match.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /api/tarife/all, /api/esya-fihristi/all
            <p>Full table dumps.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /health
            <p>Per-dataset availability.</p>
        </div>
    </body>
    </html>
    "#;

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::datasets::{Dataset, DatasetRegistry};
    use crate::search::SearchEngine;
    use crate::AppState;
    use actix_web::{http::StatusCode, test};
    use serde_json::json;
    use std::sync::Arc;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => Record(map),
            _ => unreachable!(),
        }
    }

    fn test_state() -> AppState {
        let config = Arc::new(Config::default());
        let gtip = Dataset {
            id: "gtip".to_string(),
            records: vec![
                record(json!({ "Kod": "0101", "Tanım": "canlı at" })),
                record(json!({ "Kod": "0102", "Tanım": "canlı sığır" })),
            ],
            search_fields: vec!["Kod".to_string(), "Tanım".to_string()],
        };
        let izahname = Dataset {
            id: "izahname".to_string(),
            records: (0..10)
                .map(|i| record(json!({ "index": i, "paragraf": format!("paragraf {}", i) })))
                .collect(),
            search_fields: vec!["paragraf".to_string()],
        };
        let tarife = Dataset {
            id: "tarife".to_string(),
            records: vec![record(json!({ "1. Kolon": "01.01", "2. Kolon": "Canlı atlar" }))],
            search_fields: vec!["1. Kolon".to_string(), "2. Kolon".to_string()],
        };
        let registry = DatasetRegistry::from_datasets(vec![gtip, izahname, tarife]);
        let search_engine = Arc::new(SearchEngine::new(config.clone(), Arc::new(registry)));
        AppState {
            config,
            search_engine,
        }
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(routes),
            )
            .await
        };
    }

    // `use actix_web::test` shadows the built-in #[test] attribute in this module
    #[::core::prelude::v1::test]
    fn test_run_future_is_spawnable() {
        // tokio::spawn in the binary requires this future to be Send
        fn assert_send<F: Send>(_: &F) {}
        let server = ApiServer {
            app_state: test_state(),
        };
        assert_send(&server.run());
    }

    #[actix_web::test]
    async fn test_search_returns_matching_records() {
        let app = test_app!(test_state());
        let req = test::TestRequest::get()
            .uri("/api/gtip/search?query=0101")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Kod"], "0101");
        assert_eq!(rows[0]["Tanım"], "canlı at");
    }

    #[actix_web::test]
    async fn test_missing_query_is_empty_array_not_error() {
        let app = test_app!(test_state());
        let req = test::TestRequest::get()
            .uri("/api/gtip/search")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_izahname_search_projects_index_and_paragraph() {
        let app = test_app!(test_state());
        let req = test::TestRequest::get()
            .uri("/api/izahname/search?query=paragraf%203")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], json!({ "index": 3, "paragraph": "paragraf 3" }));
    }

    #[actix_web::test]
    async fn test_context_window_and_not_found() {
        let app = test_app!(test_state());

        let req = test::TestRequest::get()
            .uri("/api/izahname/context?index=5")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 10);
        let bold: Vec<_> = rows.iter().filter(|r| r["isBold"] == true).collect();
        assert_eq!(bold.len(), 1);
        assert_eq!(bold[0]["paragraph"], "paragraf 5");

        let req = test::TestRequest::get()
            .uri("/api/izahname/context?index=9999")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("error").is_some());
    }

    #[actix_web::test]
    async fn test_dump_restricted_to_configured_datasets() {
        let app = test_app!(test_state());

        let req = test::TestRequest::get().uri("/api/tarife/all").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/gtip/all").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unknown_dataset_search_is_404() {
        let app = test_app!(test_state());
        let req = test::TestRequest::get()
            .uri("/api/bilinmeyen/search?query=x")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unavailable_dataset_is_503_not_empty_results() {
        // registry loaded from nonexistent files marks every dataset failed
        let mut config = Config::default();
        for (_, file) in config.datasets.iter_mut() {
            file.path = std::path::PathBuf::from("/nonexistent/table.json");
        }
        let config = Arc::new(config);
        let registry = Arc::new(DatasetRegistry::load(&config.datasets));
        let state = AppState {
            config: config.clone(),
            search_engine: Arc::new(SearchEngine::new(config, registry)),
        };
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/gtip/search?query=0101")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "degraded");
    }

    #[actix_web::test]
    async fn test_health_reports_all_datasets() {
        let app = test_app!(test_state());
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["datasets"].as_array().unwrap().len(), 3);
    }
}
