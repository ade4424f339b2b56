use crate::config::Settings;
use crate::generation::{GeminiGenerator, TextGenerator};
use crate::linkedin::LinkedInClient;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use http::header::ACCEPT;
use http::{HeaderMap, HeaderValue};
use reqwest::Client;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub linkedin: Arc<LinkedInClient>,
    pub generator: Arc<dyn TextGenerator>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    fn create_http_client(timeout: u64) -> Result<Client, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
    }

    /// Signing key for the login state cookie. Without a configured secret the
    /// key lives as long as the process, so a restart voids pending logins.
    fn cookie_key(settings: &Settings) -> Key {
        match settings.cookie_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
            None => {
                log::warn!("No cookie secret configured, generating a random signing key");
                Key::generate()
            }
        }
    }

    /// Builds the state with the Gemini generator
    pub fn new(settings: Settings) -> Result<Self, reqwest::Error> {
        let client = Self::create_http_client(settings.linkedin.client_timeout)?;
        let generator = Arc::new(GeminiGenerator::new(
            client.clone(),
            settings.gemini.clone(),
        ));
        Ok(Self::with_generator(settings, client, generator))
    }

    /// Builds the state around an arbitrary text generator
    pub fn with_generator(
        settings: Settings,
        client: Client,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            cookie_key: Self::cookie_key(&settings),
            linkedin: Arc::new(LinkedInClient::new(client, settings.linkedin.clone())),
            generator,
            settings: Arc::new(settings),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_testing(settings: &Settings) -> Self {
        Self::new(settings.clone()).expect("Failed to create test state")
    }
}
