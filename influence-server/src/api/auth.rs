//! LinkedIn OAuth 2.0 authorization code flow
//!
//! `/login/linkedin` sends the browser to the LinkedIn consent screen with a
//! random `state` nonce that is also stored in a signed cookie. `/auth/callback`
//! checks the nonce, exchanges the code for an access token, resolves the
//! member identity and sends the browser back to the frontend with
//! `access_token`, `linkedin_id`, `id` and `name`.

use crate::config::TokenHandoff;
use crate::errors::{ApiError, AppError, ErrorBody};
use crate::headers::sensitive_redirect;
use crate::linkedin::models::UserIdentity;
use crate::openapi::AUTH_TAG;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use log::{error, info, warn};
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use url::Url;
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};

const STATE_COOKIE: &str = "oauth_state";
const STATE_LENGTH: usize = 32;
const STATE_TTL_MINUTES: i64 = 10;

/// Query parameters LinkedIn appends to the redirect URI
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CallbackQuery {
    /// Authorization code
    code: Option<String>,
    /// State nonce issued at login
    state: Option<String>,
    /// Error code, e.g. `user_cancelled_authorize`
    error: Option<String>,
    /// Human-readable error description
    error_description: Option<String>,
}

fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

fn state_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(STATE_TTL_MINUTES))
        .build()
}

/// Redirect to the LinkedIn consent screen
#[utoipa::path(
    get,
    path = "/login/linkedin",
    tag = AUTH_TAG,
    responses(
        (status = 302, description = "Redirect to the LinkedIn authorization URL"),
        (status = 500, description = "Authorization URL could not be built", body = ErrorBody)
    )
)]
async fn login_linkedin(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let nonce = generate_state();
    let url = match state.linkedin.authorization_url(&nonce) {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to build LinkedIn authorization URL: {}", e);
            return ApiError::internal("Failed to build LinkedIn authorization URL")
                .into_response();
        }
    };

    let secure = state.settings.linkedin.redirect_uri.starts_with("https://");
    info!("Redirecting browser to LinkedIn authorization");
    (jar.add(state_cookie(nonce, secure)), sensitive_redirect(url.as_str())).into_response()
}

/// Handle the LinkedIn OAuth callback
#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = AUTH_TAG,
    params(CallbackQuery),
    responses(
        (status = 302, description = "Redirect to the frontend with the access token and identity"),
        (status = 400, description = "Missing or rejected authorization code", body = ErrorBody),
        (status = 401, description = "LinkedIn rejected the code exchange", body = ErrorBody),
        (status = 502, description = "LinkedIn could not be reached", body = ErrorBody)
    )
)]
async fn auth_callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let expected_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    // The nonce is single use whatever the outcome
    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));

    let (access_token, identity) = match complete_login(&state, query, expected_state).await {
        Ok(result) => result,
        Err(err) => {
            warn!("LinkedIn login failed: {}", err);
            return (jar, err).into_response();
        }
    };

    match frontend_redirect(
        &state.settings.frontend_url,
        state.settings.handoff_mode(),
        &access_token,
        &identity,
    ) {
        Ok(url) => {
            info!("LinkedIn login completed for member {}", identity.id);
            (jar, sensitive_redirect(url.as_str())).into_response()
        }
        Err(e) => {
            error!("Invalid frontend URL: {}", e);
            (jar, ApiError::internal("Invalid frontend URL")).into_response()
        }
    }
}

async fn complete_login(
    state: &AppState,
    query: CallbackQuery,
    expected_state: Option<String>,
) -> Result<(String, UserIdentity), AppError> {
    if let Some(error) = query.error.filter(|e| !e.is_empty()) {
        return Err(AppError::Authorization(format!(
            "LinkedIn OAuth error: {}. Description: {}",
            error,
            query
                .error_description
                .as_deref()
                .unwrap_or("No description provided")
        )));
    }

    let code = query
        .code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Authorization("Authorization code not provided".to_string()))?;

    if state.settings.linkedin.verify_state {
        verify_state(query.state.as_deref(), expected_state.as_deref())?;
    }

    let access_token = state
        .linkedin
        .exchange_code(&code)
        .await
        .map_err(AppError::TokenExchange)?;
    let identity = state
        .linkedin
        .fetch_identity(&access_token)
        .await
        .map_err(AppError::IdentityFetch)?;

    Ok((access_token, identity))
}

fn verify_state(received: Option<&str>, expected: Option<&str>) -> Result<(), AppError> {
    match (received, expected) {
        (Some(received), Some(expected)) if !expected.is_empty() && received == expected => Ok(()),
        (_, None) => Err(AppError::Authorization(
            "Login session expired or missing, please sign in again".to_string(),
        )),
        _ => Err(AppError::Authorization(
            "OAuth state mismatch, please sign in again".to_string(),
        )),
    }
}

/// Frontend URL carrying the token and identity, either as query parameters
/// or in the fragment
fn frontend_redirect(
    frontend_url: &str,
    mode: TokenHandoff,
    access_token: &str,
    identity: &UserIdentity,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(frontend_url)?;
    let params = [
        ("name", identity.display_name.as_str()),
        ("access_token", access_token),
        ("linkedin_id", identity.id.as_str()),
        ("id", identity.id.as_str()),
    ];

    match mode {
        TokenHandoff::Query => {
            url.query_pairs_mut().extend_pairs(params);
        }
        TokenHandoff::Fragment => {
            let fragment = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            url.set_fragment(Some(&fragment));
        }
    }
    Ok(url)
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login_linkedin))
        .routes(routes!(auth_callback))
}
