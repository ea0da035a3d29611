/*!
 * HTTP surface for triggering pipeline invocations.
 *
 * One POST endpoint runs a single bounded invocation and reports resumption
 * state, so an external scheduler (cron, manual curl) can chain calls until
 * the corpus is complete. All responses carry permissive CORS headers and
 * preflight requests short-circuit in the middleware.
 */

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};

use crate::database::Repository;
use crate::errors::PipelineError;
use crate::pipeline::{PipelineService, RunOutcome, RunRequest};

/// Shared state for the request handlers
pub struct ServerState {
    /// The pipeline behind the batch-translate endpoint
    pub service: PipelineService,
    /// Repository handle for the stats endpoint
    pub repo: Repository,
}

/// Bind and serve until the process is stopped
pub async fn run_server(state: ServerState, addr: &str) -> Result<()> {
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind server address {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Assemble the router; split out so tests can serve on an ephemeral port
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/batch-translate", post(batch_translate))
        .route("/stats", get(stats))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("POST,GET,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type,authorization"),
    );
}

/// Run one invocation.
///
/// An absent or malformed body falls back to all defaults, so a bare
/// `curl -X POST` triggers a full default run.
async fn batch_translate(
    State(state): State<Arc<ServerState>>,
    payload: Option<Json<RunRequest>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    match state.service.run_invocation(&request).await {
        Ok(RunOutcome::Completed) => Ok(Json(serde_json::json!({
            "success": true,
            "message": "No more cards to translate",
            "completed": true,
            "stats": { "processed": 0, "translations": 0 },
        }))),
        Ok(RunOutcome::Progress {
            stats,
            has_more,
            last_card_id,
            continue_from,
        }) => Ok(Json(serde_json::json!({
            "success": true,
            "stats": stats,
            "hasMore": has_more,
            "lastCardId": last_card_id,
            "continueFrom": continue_from,
        }))),
        Err(e) => {
            error!("Invocation failed: {}", e);
            let status = match e {
                PipelineError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((
                status,
                Json(serde_json::json!({ "success": false, "error": e.to_string() })),
            ))
        }
    }
}

async fn stats(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let stats = state.repo.connection().stats().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "success": false, "error": e.to_string() })),
        )
    })?;

    Ok(Json(serde_json::json!({
        "cards": stats.card_count,
        "translations": stats.translation_count,
        "enrichments": stats.enrichment_count,
        "fileSizeBytes": stats.file_size_bytes,
    })))
}
