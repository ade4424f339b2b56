use crate::errors::{AppError, ErrorBody};
use crate::generation::{GenerationRequest, TextGenerator};
use crate::linkedin::models::PublishedPost;
use crate::linkedin::LinkedInClient;
use crate::openapi::POSTS_TAG;
use crate::state::AppState;
use axum::extract::{rejection::JsonRejection, Json, State};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

pub(crate) const PUBLISHED_MESSAGE: &str = "Post successfully published to LinkedIn!";

/// Request to generate and publish a post
#[derive(Deserialize, ToSchema)]
pub(crate) struct PostRequest {
    /// Short description of what the post should be about
    #[serde(default)]
    prompt: String,
    /// LinkedIn access token obtained from the login callback
    #[serde(default)]
    access_token: String,
    /// LinkedIn member id the post is attributed to
    #[serde(default, alias = "user_id")]
    linkedin_id: String,
    /// Display name used to personalise the generated text
    #[serde(default)]
    user_name: String,
}

impl fmt::Debug for PostRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostRequest")
            .field("prompt", &self.prompt)
            .field("access_token", &"<redacted>")
            .field("linkedin_id", &self.linkedin_id)
            .field("user_name", &self.user_name)
            .finish()
    }
}

impl PostRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.prompt.trim().is_empty() {
            return Err(AppError::Validation("prompt must not be empty".to_string()));
        }
        if self.access_token.trim().is_empty() {
            return Err(AppError::Validation(
                "access_token must not be empty".to_string(),
            ));
        }
        if self.linkedin_id.trim().is_empty() {
            return Err(AppError::Validation(
                "linkedin_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Successful publish response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PostCreated {
    message: String,
}

/// Generates the post text and publishes it. Publishing only happens after
/// generation succeeded, and nothing is kept when either step fails.
async fn publish_generated_post(
    generator: &dyn TextGenerator,
    linkedin: &LinkedInClient,
    request: &PostRequest,
) -> Result<PublishedPost, AppError> {
    request.validate()?;

    let text = generator
        .generate(&GenerationRequest {
            prompt: request.prompt.clone(),
            author: request.user_name.clone(),
        })
        .await?;

    linkedin
        .create_post(request.access_token.trim(), request.linkedin_id.trim(), &text)
        .await
        .map_err(AppError::Publish)
}

/// Generate a post from a prompt and publish it to LinkedIn
#[utoipa::path(
    post,
    path = "/posts/create",
    tag = POSTS_TAG,
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post published", body = PostCreated),
        (status = 400, description = "Invalid request payload", body = ErrorBody),
        (status = 401, description = "LinkedIn rejected the access token", body = ErrorBody),
        (status = 502, description = "Content generation or LinkedIn failed", body = ErrorBody)
    )
)]
async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<Json<PostCreated>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    match publish_generated_post(state.generator.as_ref(), &state.linkedin, &request).await {
        Ok(post) => {
            info!(
                "Published post {} for member {}",
                post.id.as_deref().unwrap_or("<unknown>"),
                request.linkedin_id
            );
            Ok(Json(PostCreated {
                message: PUBLISHED_MESSAGE.to_string(),
            }))
        }
        Err(err) => {
            warn!("Post creation failed: {}", err);
            Err(err)
        }
    }
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(create_post))
}
