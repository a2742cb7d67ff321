// Insurance Fraud Dashboard - Web Server
// REST API with Axum over the same session the TUI uses

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use insu_dashboard::{
    narrative, ChartSpec, DashboardConfig, DashboardError, LoadedTable, NamedQuery, QueryTable,
    Session, SourceTable, TOP_CLAIMANTS_SQL,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Map the error taxonomy onto HTTP status codes
fn error_response(error: DashboardError) -> Response {
    let status = match &error {
        DashboardError::Query(_) => StatusCode::BAD_REQUEST,
        DashboardError::UnknownQuery(_) | DashboardError::UnknownTable(_) => StatusCode::NOT_FOUND,
        DashboardError::Load { .. } | DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(status = %status, error = %error, "request failed");
    (status, Json(ApiResponse::<()>::err(error.to_string()))).into_response()
}

fn respond<T: Serialize>(result: Result<T, DashboardError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => error_response(e),
    }
}

fn lock_session(state: &AppState) -> Result<std::sync::MutexGuard<'_, Session>, DashboardError> {
    state
        .session
        .lock()
        .map_err(|_| DashboardError::Query("session lock poisoned".to_string()))
}

/// Loaded table summary (for the table picker)
#[derive(Serialize)]
struct TableResponse {
    name: String,
    path: String,
    row_count: usize,
    columns: Vec<String>,
    fingerprint: String,
    loaded_at: String,
}

impl From<LoadedTable> for TableResponse {
    fn from(table: LoadedTable) -> Self {
        Self {
            name: table.table.table_name().to_string(),
            path: table.path,
            row_count: table.row_count,
            columns: table.columns.into_iter().map(|(name, _)| name).collect(),
            fingerprint: table.fingerprint,
            loaded_at: table.loaded_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct QueryInfo {
    name: &'static str,
    slug: &'static str,
    has_chart: bool,
}

#[derive(Serialize)]
struct NamedQueryResponse {
    name: &'static str,
    table: QueryTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartSpec>,
}

#[derive(Deserialize)]
struct AdhocRequest {
    sql: String,
}

#[derive(Serialize)]
struct NarrativeResponse {
    key_objectives: &'static str,
    summary_report: &'static str,
    recommendations: &'static str,
    example_caption: &'static str,
    example_sql: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/tables - Loaded source tables
async fn get_tables(State(state): State<AppState>) -> Response {
    respond(lock_session(&state).and_then(|mut session| {
        session
            .loaded_tables()
            .map(|tables| tables.into_iter().map(TableResponse::from).collect::<Vec<_>>())
    }))
}

/// GET /api/tables/:name - Raw rows of one table
async fn get_table(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let decoded = urlencoding::decode(&name)
        .unwrap_or_else(|_| name.clone().into())
        .into_owned();

    respond(SourceTable::from_name(&decoded).and_then(|table| {
        let mut session = lock_session(&state)?;
        session.browse_table(table)
    }))
}

/// GET /api/overview - Headline counts + gender / age breakdowns
async fn get_overview(State(state): State<AppState>) -> Response {
    respond(lock_session(&state).and_then(|mut session| session.overview()))
}

/// GET /api/queries - The named-query menu
async fn list_queries() -> impl IntoResponse {
    let queries: Vec<QueryInfo> = NamedQuery::ALL
        .iter()
        .map(|q| QueryInfo {
            name: q.display_name(),
            slug: q.slug(),
            has_chart: q.has_chart(),
        })
        .collect();
    Json(ApiResponse::ok(queries))
}

/// GET /api/queries/:name - Run a named query with its chart
async fn run_named(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let decoded = urlencoding::decode(&name)
        .unwrap_or_else(|_| name.clone().into())
        .into_owned();

    respond(NamedQuery::from_name(&decoded).and_then(|query| {
        let mut session = lock_session(&state)?;
        let (table, chart) = session.run_with_chart(query)?;
        Ok(NamedQueryResponse {
            name: query.display_name(),
            table,
            chart,
        })
    }))
}

/// POST /api/query - Ad-hoc SQL
async fn run_adhoc(State(state): State<AppState>, Json(request): Json<AdhocRequest>) -> Response {
    respond(lock_session(&state).and_then(|mut session| session.run_adhoc_query(&request.sql)))
}

/// GET /api/narrative - Static summary / recommendation text
async fn get_narrative() -> impl IntoResponse {
    Json(ApiResponse::ok(NarrativeResponse {
        key_objectives: narrative::KEY_OBJECTIVES,
        summary_report: narrative::SUMMARY_REPORT,
        recommendations: narrative::RECOMMENDATIONS,
        example_caption: narrative::TOP_CLAIMANTS_CAPTION,
        example_sql: TOP_CLAIMANTS_SQL,
    }))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    println!("🌐 Insurance Fraud Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = DashboardConfig::load()?;

    // Load all three sources before accepting requests
    let mut session = Session::from_config(&config);
    if let Err(e) = session.ensure_loaded() {
        eprintln!("❌ Failed to load source data");
        eprintln!("   {}", e);
        std::process::exit(1);
    }
    println!("✓ Source tables loaded (session {})", session.id());

    // Create shared state
    let state = AppState {
        session: Arc::new(Mutex::new(session)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/tables", get(get_tables))
        .route("/tables/:name", get(get_table))
        .route("/overview", get(get_overview))
        .route("/queries", get(list_queries))
        .route("/queries/:name", get(run_named))
        .route("/query", post(run_adhoc))
        .route("/narrative", get(get_narrative))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/queries", config.bind_addr);
    println!("   UI:  http://{}", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;

    Ok(())
}
