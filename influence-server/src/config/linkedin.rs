//! LinkedIn OAuth 2.0 and API configuration

use confique::Config;

/// LinkedIn application credentials and endpoints
#[derive(Debug, Config, Clone)]
pub struct LinkedInConfig {
    /// OAuth client identifier issued by LinkedIn
    #[config(env = "LINKEDIN_CLIENT_ID")]
    pub client_id: String,

    /// OAuth client secret issued by LinkedIn
    #[config(env = "LINKEDIN_CLIENT_SECRET")]
    pub client_secret: String,

    /// Redirect URI registered with LinkedIn, used for both login and code exchange
    /// (default: http://127.0.0.1:8000/auth/callback)
    #[config(
        env = "LINKEDIN_REDIRECT_URI",
        default = "http://127.0.0.1:8000/auth/callback"
    )]
    pub redirect_uri: String,

    /// Space-separated scopes requested at login
    /// (default: "openid profile email w_member_social")
    #[config(env = "LINKEDIN_SCOPES", default = "openid profile email w_member_social")]
    pub scopes: String,

    /// Authorization endpoint the browser is redirected to
    #[config(
        env = "LINKEDIN_AUTHORIZATION_URL",
        default = "https://www.linkedin.com/oauth/v2/authorization"
    )]
    pub authorization_url: String,

    /// Token endpoint for the authorization code exchange
    #[config(
        env = "LINKEDIN_TOKEN_URL",
        default = "https://www.linkedin.com/oauth/v2/accessToken"
    )]
    pub token_url: String,

    /// Base URL of the REST API serving /v2/userinfo and /v2/ugcPosts
    /// (default: https://api.linkedin.com)
    #[config(env = "LINKEDIN_API_URL", default = "https://api.linkedin.com")]
    pub api_url: String,

    /// Timeout for LinkedIn requests in seconds (default: 30)
    #[config(env = "LINKEDIN_CLIENT_TIMEOUT", default = 30)]
    pub client_timeout: u64,

    /// Verify the OAuth `state` parameter against the signed login cookie (default: true)
    #[config(env = "LINKEDIN_VERIFY_STATE", default = true)]
    pub verify_state: bool,
}

impl LinkedInConfig {
    /// Returns the URL of the given path on the LinkedIn REST API
    pub fn get_api_url<S: Into<String>>(&self, path: S) -> String {
        let path = path.into();
        let base = self.api_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Scopes normalized to a single-space separated string
    pub fn scope_string(&self) -> String {
        self.scopes.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
pub(crate) fn test_config(api_url: &str) -> LinkedInConfig {
    LinkedInConfig {
        client_id: "test-client-id".to_string(),
        client_secret: "test-client-secret".to_string(),
        redirect_uri: "http://127.0.0.1:8000/auth/callback".to_string(),
        scopes: "openid profile email w_member_social".to_string(),
        authorization_url: "https://www.linkedin.com/oauth/v2/authorization".to_string(),
        token_url: format!("{}/oauth/v2/accessToken", api_url),
        api_url: api_url.to_string(),
        client_timeout: 5,
        verify_state: true,
    }
}
