use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::cli::ServeArgs;
use crate::render::config::RenderRequest;
use crate::render::linker::{InteractionLinker, Selection};
use crate::render::session::RenderSession;
use crate::render::RenderError;
use crate::store::dataset::Dataset;
use crate::store::CallStore;

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024; // 64KB
pub const MAX_VIEW_SESSIONS: usize = 1_000;
pub const MAX_VIEW_ID_LENGTH: usize = 128;

struct ViewEntry {
    session: RenderSession,
    last_used: u64,
}

/// Render sessions keyed by the client's view id
#[derive(Default)]
struct Views {
    entries: HashMap<String, ViewEntry>,
    /// Bumped on every lookup; orders entries by last use
    clock: u64,
}

/// Shared application state
pub struct AppState {
    pub dataset: Arc<Dataset>,
    sessions: Mutex<Views>,
    max_views: usize,
}

impl AppState {
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_capacity(dataset, MAX_VIEW_SESSIONS)
    }

    /// State tracking at most `max_views` view sessions
    #[must_use]
    pub fn with_capacity(dataset: Arc<Dataset>, max_views: usize) -> Self {
        Self {
            dataset,
            sessions: Mutex::new(Views::default()),
            max_views: max_views.max(1),
        }
    }

    /// Session of `view_id`, created on first use.
    ///
    /// When the table is full, the least recently used idle session is evicted.
    /// Sessions with a render in flight are never evicted; if every session is
    /// busy, `None` is returned.
    fn session(&self, view_id: &str) -> Option<RenderSession> {
        let mut views = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        views.clock += 1;
        let now = views.clock;

        if let Some(entry) = views.entries.get_mut(view_id) {
            entry.last_used = now;
            return Some(entry.session.clone());
        }

        if views.entries.len() >= self.max_views {
            let victim = views
                .entries
                .iter()
                .filter(|(_, entry)| entry.session.is_idle())
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone());
            let Some(victim) = victim else {
                tracing::warn!("All {} view sessions are busy", views.entries.len());
                return None;
            };
            tracing::debug!("Evicting idle view session {}", victim);
            views.entries.remove(&victim);
        }

        let session = RenderSession::new(Arc::clone(&self.dataset));
        views.entries.insert(
            view_id.to_string(),
            ViewEntry {
                session: session.clone(),
                last_used: now,
            },
        );
        Some(session)
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Render request body
#[derive(Debug, Deserialize)]
pub struct RenderBody {
    #[serde(flatten)]
    pub request: RenderRequest,

    /// Client view issuing the request; a newer request from the same view
    /// supersedes an older one still in flight
    #[serde(default)]
    pub view_id: Option<String>,
}

/// Highlight request body: the render to link within, plus the selection
#[derive(Debug, Deserialize)]
pub struct HighlightBody {
    #[serde(flatten)]
    pub request: RenderRequest,

    #[serde(default)]
    pub selection: Selection,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn render_error_response(error: &RenderError) -> Response {
    let (status, body) = match error {
        RenderError::NotFound(run_id) => (
            StatusCode::NOT_FOUND,
            create_safe_error_response("run_not_found", &format!("Run {run_id} not found"), None),
        ),
        RenderError::InvalidRequest(message) => (
            StatusCode::BAD_REQUEST,
            create_safe_error_response("invalid_request", message, None),
        ),
        RenderError::Store(_) | RenderError::Task(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            create_safe_error_response(
                "render_failed",
                "Rendering failed, please retry",
                Some(&error.to_string()),
            ),
        ),
    };
    (status, Json(body)).into_response()
}

fn too_many_views_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(create_safe_error_response(
            "too_many_views",
            "Too many views are rendering, please retry",
            None,
        )),
    )
        .into_response()
}

fn superseded_response() -> Response {
    (
        StatusCode::CONFLICT,
        Json(create_safe_error_response(
            "superseded",
            "A newer request for this view replaced this one",
            None,
        )),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded, the tokio runtime cannot be
/// created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let dataset = Arc::new(args.dataset.load()?);

    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, dataset).await })
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router(dataset: Arc<Dataset>) -> anyhow::Result<Router> {
    let state = Arc::new(AppState::new(dataset));

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    // Build router with comprehensive security layers
    let app = Router::new()
        .route("/api/render", post(render_handler))
        .route("/api/highlight", post(highlight_handler))
        .route("/api/runs", get(runs_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // IP-based rate limiting to prevent abuse
                .layer(GovernorLayer {
                    config: Arc::new(governor_conf),
                })
                // Renders are bounded by the element budget; slow clients are not
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
        );

    Ok(app)
}

async fn run_server(args: ServeArgs, dataset: Arc<Dataset>) -> anyhow::Result<()> {
    let app = create_router(dataset)?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting sv-view web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Render a viewport into a `RenderModel`
async fn render_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RenderBody>,
) -> Response {
    let session = match body.view_id.as_deref() {
        Some(view_id) if view_id.len() > MAX_VIEW_ID_LENGTH => {
            return (
                StatusCode::BAD_REQUEST,
                Json(create_safe_error_response(
                    "invalid_request",
                    "view_id is too long",
                    None,
                )),
            )
                .into_response();
        }
        Some(view_id) => match state.session(view_id) {
            Some(session) => session,
            None => return too_many_views_response(),
        },
        None => RenderSession::new(Arc::clone(&state.dataset)),
    };

    match session.submit(body.request).await {
        Ok(Some(model)) => Json(model).into_response(),
        Ok(None) => superseded_response(),
        Err(e) => render_error_response(&e),
    }
}

/// Render a viewport and link the selected element to the rest of it
async fn highlight_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HighlightBody>,
) -> Response {
    let session = RenderSession::new(Arc::clone(&state.dataset));
    match session.submit(body.request).await {
        Ok(Some(model)) => {
            Json(InteractionLinker::highlight(&model, &body.selection)).into_response()
        }
        Ok(None) => superseded_response(),
        Err(e) => render_error_response(&e),
    }
}

/// Return the runs of the served dataset
async fn runs_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.dataset.store.runs() {
        Ok(runs) => Json(serde_json::json!({
            "dataset": state.dataset.name,
            "count": runs.len(),
            "runs": runs,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(create_safe_error_response(
                "store_error",
                "Failed to list runs",
                Some(&e.to_string()),
            )),
        )
            .into_response(),
    }
}
