use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const AUTH_TAG: &str = "LinkedIn Authorization API";
pub(crate) const POSTS_TAG: &str = "Posts API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = AUTH_TAG, description = "LinkedIn OAuth 2.0 login endpoints"),
        (name = POSTS_TAG, description = "AI-generated post publishing"),
    ),
    info(
        title = "Influence OS Agent API",
        description = "LinkedIn OAuth and AI content generation",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

/// Creates a router serving the generated OpenAPI document and the Scalar UI
pub(crate) fn router(api_doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    let json_doc = api_doc.clone();
    Router::new()
        .route(
            "/openapi.json",
            get(move || {
                let json_doc = json_doc.clone();
                async move { Json(json_doc) }
            }),
        )
        .merge(Scalar::with_url("/scalar", api_doc))
}
