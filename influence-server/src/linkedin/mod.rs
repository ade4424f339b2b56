//! LinkedIn client covering the OAuth 2.0 authorization code flow and the UGC posts API

pub mod models;

use crate::config::LinkedInConfig;
use crate::linkedin::models::{
    PublishedPost, TokenRequest, TokenResponse, UgcPost, UgcPostCreated, UserIdentity, UserInfo,
};
use http::StatusCode;
use log::{debug, error, warn};
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Header LinkedIn uses to report the URN of a created entity
const RESTLI_ID_HEADER: &str = "x-restli-id";

/// Errors that can occur during LinkedIn API operations
#[derive(Debug, Error)]
pub enum LinkedInError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request to LinkedIn timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("LinkedIn responded with {status}: {body}")]
    Provider { status: StatusCode, body: String },
    #[error("Invalid LinkedIn response: {0}")]
    InvalidResponse(String),
}

impl LinkedInError {
    fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LinkedInError::Timeout(err)
        } else {
            LinkedInError::Http(err)
        }
    }

    /// Status returned by LinkedIn, if the request reached it
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            LinkedInError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// LinkedIn API client
#[derive(Clone)]
pub struct LinkedInClient {
    client: Client,
    config: LinkedInConfig,
}

impl LinkedInClient {
    /// Create a new LinkedIn client
    pub fn new(client: Client, config: LinkedInConfig) -> Self {
        Self { client, config }
    }

    /// Builds the URL of the LinkedIn consent screen for the given `state` nonce
    pub fn authorization_url(&self, state: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.config.authorization_url)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope_string())
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchanges an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, LinkedInError> {
        let request = TokenRequest {
            grant_type: "authorization_code",
            code,
            redirect_uri: &self.config.redirect_uri,
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };

        debug!("Exchanging authorization code at {}", self.config.token_url);

        let response = self
            .client
            .post(&self.config.token_url)
            .header(http::header::ACCEPT, "application/json")
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Token exchange request failed: {}", e);
                LinkedInError::from_request(e)
            })?;

        let token: TokenResponse = Self::parse_success(response, "token exchange").await?;
        debug!(
            "Token exchange succeeded (expires_in={:?}, scope={:?})",
            token.expires_in, token.scope
        );

        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LinkedInError::InvalidResponse("No access token in response".into()))
    }

    /// Resolves the identity of the member owning `access_token`
    pub async fn fetch_identity(&self, access_token: &str) -> Result<UserIdentity, LinkedInError> {
        let url = self.config.get_api_url("/v2/userinfo");
        debug!("Fetching member identity from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .header(http::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Userinfo request failed: {}", e);
                LinkedInError::from_request(e)
            })?;

        let info: UserInfo = Self::parse_success(response, "userinfo").await?;
        if info.sub.is_empty() {
            return Err(LinkedInError::InvalidResponse(
                "Userinfo response has an empty subject".into(),
            ));
        }
        let identity = UserIdentity::from(info);
        if identity.display_name.trim().is_empty() {
            return Err(LinkedInError::InvalidResponse(
                "Userinfo response has no member name".into(),
            ));
        }
        Ok(identity)
    }

    /// Publishes `text` as a public post authored by `member_id`
    pub async fn create_post(
        &self,
        access_token: &str,
        member_id: &str,
        text: &str,
    ) -> Result<PublishedPost, LinkedInError> {
        let url = self.config.get_api_url("/v2/ugcPosts");
        debug!("Publishing post for member {} to {}", member_id, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&UgcPost::public_text(member_id, text))
            .send()
            .await
            .map_err(|e| {
                error!("Publish request failed: {}", e);
                LinkedInError::from_request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LinkedIn rejected post with {}: {}", status, body);
            return Err(LinkedInError::Provider { status, body });
        }

        let header_id = response
            .headers()
            .get(RESTLI_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // The body is optional; an empty 201 is still a created post
        let body = response.bytes().await.unwrap_or_default();
        let created: UgcPostCreated = serde_json::from_slice(&body).unwrap_or_default();

        let id = header_id.or(created.id);
        if id.is_none() {
            warn!(
                "LinkedIn accepted post for member {} with {} but returned no post id",
                member_id, status
            );
        }
        Ok(PublishedPost { id })
    }

    async fn parse_success<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, LinkedInError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LinkedIn {} failed with {}: {}", operation, status, body);
            return Err(LinkedInError::Provider { status, body });
        }

        response.json().await.map_err(|e| {
            LinkedInError::InvalidResponse(format!("{} JSON parse error: {}", operation, e))
        })
    }
}
