use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

const SERVICE_NAME: &str = "Influence OS Agent Backend";

/// Root endpoint response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootMessage {
    message: String,
}

/// Basic health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Health {
    status: String,
    service: String,
    /// Whether LinkedIn client credentials are present
    linkedin_client_configured: bool,
}

/// Root endpoint
#[utoipa::path(
    get,
    path = "/",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is running", body = RootMessage)
    )
)]
async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: format!("{} is running.", SERVICE_NAME),
    })
}

/// Basic health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = Health)
    )
)]
async fn health_check(State(state): State<AppState>) -> Json<Health> {
    let linkedin = &state.settings.linkedin;
    Json(Health {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        linkedin_client_configured: !linkedin.client_id.is_empty()
            && !linkedin.client_secret.is_empty(),
    })
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(root))
        .routes(routes!(health_check))
}
