pub(crate) use crate::config::gemini::GeminiConfig;
pub(crate) use crate::config::linkedin::LinkedInConfig;
use confique::Config;
use std::str::FromStr;
use url::Url;

pub mod gemini;
pub mod linkedin;

/// Optional configuration file layered under the environment
const CONFIG_FILE: &str = "influence.toml";

/// How the access token and identity are handed back to the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenHandoff {
    /// Query string parameters on the frontend URL
    #[default]
    Query,
    /// URL fragment, which browsers never send to servers
    Fragment,
}

impl FromStr for TokenHandoff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "fragment" => Ok(Self::Fragment),
            other => Err(format!(
                "Invalid token handoff mode '{}', expected 'query' or 'fragment'",
                other
            )),
        }
    }
}

/// Main configuration structure for the server
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the server will listen to (default: 8000)
    #[config(env = "INFLUENCE_PORT", default = 8000)]
    pub port: u16,

    /// Frontend root URL users are sent back to after login
    /// (default: http://localhost:3000)
    #[config(env = "INFLUENCE_FRONTEND_URL", default = "http://localhost:3000")]
    pub frontend_url: String,

    /// Token handoff mode: "query" or "fragment" (default: query)
    #[config(env = "INFLUENCE_TOKEN_HANDOFF", default = "query")]
    pub token_handoff: String,

    /// Secret used to sign the login state cookie.
    /// A random key is generated at startup when unset.
    #[config(env = "INFLUENCE_COOKIE_SECRET")]
    pub cookie_secret: Option<String>,

    /// LinkedIn configuration
    #[config(nested)]
    pub linkedin: LinkedInConfig,

    /// Gemini configuration
    #[config(nested)]
    pub gemini: GeminiConfig,
}

impl Settings {
    /// Loads the configuration from environment variables, falling back to
    /// `influence.toml` in the working directory when it exists
    pub fn new() -> Result<Self, String> {
        let settings = Self::builder()
            .env()
            .file(CONFIG_FILE)
            .load()
            .map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values that cannot be expressed as confique types
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.frontend_url)
            .map_err(|e| format!("Invalid frontend URL '{}': {}", self.frontend_url, e))?;
        Url::parse(&self.linkedin.redirect_uri).map_err(|e| {
            format!(
                "Invalid LinkedIn redirect URI '{}': {}",
                self.linkedin.redirect_uri, e
            )
        })?;
        Url::parse(&self.linkedin.authorization_url).map_err(|e| {
            format!(
                "Invalid LinkedIn authorization URL '{}': {}",
                self.linkedin.authorization_url, e
            )
        })?;
        self.token_handoff.parse::<TokenHandoff>()?;
        Ok(())
    }

    /// Parsed token handoff mode, defaulting to query parameters
    pub fn handoff_mode(&self) -> TokenHandoff {
        self.token_handoff.parse().unwrap_or_default()
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(
        linkedin_mock: &wiremock::MockServer,
        gemini_mock: &wiremock::MockServer,
    ) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            frontend_url: "http://localhost:3000".to_string(),
            token_handoff: "query".to_string(),
            cookie_secret: Some("test-cookie-secret".to_string()),
            linkedin: linkedin::test_config(&linkedin_mock.uri()),
            gemini: GeminiConfig {
                api_key: "test-google-api-key".to_string(),
                base_url: gemini_mock.uri(),
                model: "gemini-1.5-flash-latest".to_string(),
                timeout: 5,
            },
        }
    }
}
