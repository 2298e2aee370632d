//! HTTP routes: the OneBot event webhook and a few admin endpoints.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use join_core::{ChartSummary, MessageSender, PlatformGateway};
use onebot_client::OneBotEvent;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ListenerError;
use crate::signature::{self, SIGNATURE_HEADER};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    records: usize,
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    status: &'static str,
    config: String,
}

/// Build the router.
pub fn router<G, S>(state: AppState<G, S>) -> Router
where
    G: PlatformGateway + 'static,
    S: MessageSender + 'static,
{
    Router::new()
        .route("/health", get(health::<G, S>))
        .route("/onebot", post(onebot_event::<G, S>))
        .route("/admin/groups/:group_id/summary", get(group_summary::<G, S>))
        .route("/admin/reload", post(reload::<G, S>))
        .with_state(state)
}

fn authorize<G, S>(state: &AppState<G, S>, headers: &HeaderMap) -> Result<(), ListenerError>
where
    G: PlatformGateway,
    S: MessageSender,
{
    let Some(expected) = state.access_token.as_deref() else {
        return Ok(());
    };

    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let token = header.strip_prefix("Bearer ").unwrap_or("");
    if token != expected {
        return Err(ListenerError::Unauthorized);
    }

    Ok(())
}

/// Check the body signature when an event secret is configured.
fn verify_signature<G, S>(
    state: &AppState<G, S>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), ListenerError>
where
    G: PlatformGateway,
    S: MessageSender,
{
    let Some(secret) = state.event_secret.as_deref() else {
        return Ok(());
    };

    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    if !signature::verify(secret, header, body) {
        return Err(ListenerError::InvalidSignature);
    }

    Ok(())
}

async fn health<G, S>(State(state): State<AppState<G, S>>) -> Json<HealthResponse>
where
    G: PlatformGateway,
    S: MessageSender,
{
    Json(HealthResponse {
        status: "ok",
        records: state.manager.records().len().await,
    })
}

/// Accept an event post. Join requests are queued for the worker; every
/// other event, and bodies that do not parse, are acknowledged and dropped.
async fn onebot_event<G, S>(
    State(state): State<AppState<G, S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ListenerError>
where
    G: PlatformGateway,
    S: MessageSender,
{
    verify_signature(&state, &headers, &body)?;

    let event = match OneBotEvent::parse(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Ignoring malformed event post: {}", e);
            return Ok(StatusCode::NO_CONTENT);
        }
    };

    let inbound = event.into_inbound(state.platform());
    if inbound.as_join_request().is_none() {
        debug!("Ignoring {} event", inbound.kind());
        return Ok(StatusCode::NO_CONTENT);
    }

    state
        .events
        .send(inbound)
        .await
        .map_err(|_| ListenerError::QueueClosed)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn group_summary<G, S>(
    State(state): State<AppState<G, S>>,
    headers: HeaderMap,
    Path(group_id): Path<String>,
) -> Result<Json<ChartSummary>, ListenerError>
where
    G: PlatformGateway,
    S: MessageSender,
{
    authorize(&state, &headers)?;

    state
        .manager
        .records()
        .summary(&group_id)
        .await
        .map(Json)
        .ok_or_else(|| ListenerError::NotFound(format!("no records for group {}", group_id)))
}

async fn reload<G, S>(
    State(state): State<AppState<G, S>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ListenerError>
where
    G: PlatformGateway,
    S: MessageSender,
{
    authorize(&state, &headers)?;

    state.manager.reload_from_path(&state.config_path).await?;
    info!("Reloaded configuration from {}", state.config_path.display());

    Ok(Json(ReloadResponse {
        status: "reloaded",
        config: state.config_path.display().to_string(),
    }))
}
