use crate::config::Settings;
use crate::create_app;
use crate::generation::TextGenerator;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Test fixture for setting up a complete test environment with mocked services.
///
/// The TestFixture wires the application to wiremock servers standing in for
/// LinkedIn (token, userinfo and UGC endpoints) and Gemini, and provides helper
/// methods for making requests and mounting common mock responses.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture.mock_generation("Announce", "Excited to announce...").await;
///     fixture.mock_publish(201, "", 1).await;
///
///     let response = fixture.post("/posts/create", &body).await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// Mock server for the LinkedIn OAuth and REST APIs
    pub linkedin_mock: MockServer,
    /// Mock server for Gemini
    pub gemini_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture with mock servers for LinkedIn and Gemini.
    pub async fn new() -> Self {
        Self::with_settings(|_| {}).await
    }

    /// Creates a fixture after letting the caller adjust the mock-backed settings.
    pub async fn with_settings(customize: impl FnOnce(&mut Settings)) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let linkedin_mock = MockServer::start().await;
        let gemini_mock = MockServer::start().await;
        let mut settings = Settings::for_test_with_mocks(&linkedin_mock, &gemini_mock);
        customize(&mut settings);

        let state = AppState::for_testing(&settings);
        Self {
            app: create_app(state),
            settings,
            linkedin_mock,
            gemini_mock,
        }
    }

    /// Creates a fixture whose text generation is served by `generator`
    /// instead of the Gemini mock.
    pub async fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let linkedin_mock = MockServer::start().await;
        let gemini_mock = MockServer::start().await;
        let settings = Settings::for_test_with_mocks(&linkedin_mock, &gemini_mock);

        let state =
            AppState::with_generator(settings.clone(), reqwest::Client::new(), generator);
        Self {
            app: create_app(state),
            settings,
            linkedin_mock,
            gemini_mock,
        }
    }

    /// Initializes the test logger with customized settings.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Sends a GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_ref())
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a GET request carrying a `Cookie` header.
    pub async fn get_with_cookie(&self, uri: impl AsRef<str>, cookie: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_ref())
            .header(COOKIE, cookie)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a JSON body to the specified URI.
    pub async fn post<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body to JSON");
        self.post_raw(uri, &json_body).await
    }

    /// Sends a POST request with a raw JSON-typed body.
    pub async fn post_raw(&self, uri: impl AsRef<str>, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri.as_ref())
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else {
            json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// Starts a login and returns the issued `state` nonce together with the
    /// `Cookie` header value the browser would send back on the callback.
    pub async fn begin_login(&self) -> (String, String) {
        let response = self.get("/login/linkedin").await;
        response.assert_status(StatusCode::FOUND);

        let url = Url::parse(response.location()).expect("Invalid authorization URL");
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let state = query.get("state").cloned().expect("Missing state parameter");
        let cookie = response.cookie().expect("Missing state cookie");
        (state, cookie)
    }

    /// Mounts a successful token exchange for `code`.
    pub async fn mock_token_exchange(&self, code: &str, access_token: &str) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/oauth/v2/accessToken"))
            .and(matchers::body_string_contains("grant_type=authorization_code"))
            .and(matchers::body_string_contains(format!("code={}", code)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": access_token,
                "expires_in": 5184000,
                "scope": "email,openid,profile,w_member_social"
            })))
            .expect(1)
            .mount(&self.linkedin_mock)
            .await;
    }

    /// Mounts a failing token exchange.
    pub async fn mock_token_exchange_failure(&self, status: u16, body: &str) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/oauth/v2/accessToken"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&self.linkedin_mock)
            .await;
    }

    /// Mounts a userinfo response for `access_token`.
    pub async fn mock_userinfo(&self, access_token: &str, id: &str, name: &str) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v2/userinfo"))
            .and(matchers::header(
                "authorization",
                format!("Bearer {}", access_token).as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sub": id,
                "name": name,
                "email_verified": true,
                "locale": {"country": "US", "language": "en"}
            })))
            .expect(1)
            .mount(&self.linkedin_mock)
            .await;
    }

    /// Mounts a userinfo response with an arbitrary JSON body.
    pub async fn mock_userinfo_body(&self, body: Value) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v2/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.linkedin_mock)
            .await;
    }

    /// Mounts a failing userinfo response.
    pub async fn mock_userinfo_failure(&self, status: u16, body: &str) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v2/userinfo"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&self.linkedin_mock)
            .await;
    }

    /// Mounts a UGC post response expected to be hit `expected_calls` times.
    pub async fn mock_publish(&self, status: u16, body: &str, expected_calls: u64) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v2/ugcPosts"))
            .and(matchers::header("x-restli-protocol-version", "2.0.0"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&self.linkedin_mock)
            .await;
    }

    /// Fails the test if anything reaches the LinkedIn mock.
    pub async fn expect_no_linkedin_calls(&self) {
        Mock::given(matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.linkedin_mock)
            .await;
    }

    /// JSON bodies of every UGC post received by the LinkedIn mock.
    pub async fn published_posts(&self) -> Vec<Value> {
        self.linkedin_mock
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/v2/ugcPosts")
            .map(|r| r.body_json::<Value>().expect("UGC post body is not JSON"))
            .collect()
    }

    /// Mounts a Gemini completion for requests whose prompt contains `prompt_fragment`.
    pub async fn mock_generation(&self, prompt_fragment: &str, text: &str) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path(format!(
                "/v1beta/models/{}:generateContent",
                self.settings.gemini.model
            )))
            .and(matchers::body_string_contains(prompt_fragment))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": text}]},
                    "finishReason": "STOP"
                }]
            })))
            .mount(&self.gemini_mock)
            .await;
    }

    /// Mounts a failing Gemini completion.
    pub async fn mock_generation_failure(&self, status: u16, body: &str) {
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&self.gemini_mock)
            .await;
    }
}

/// Response from a test request that provides convenient access to status, headers and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// The `Location` header of a redirect.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing.
    pub fn location(&self) -> &str {
        self.headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("Response has no Location header")
    }

    /// The first `Set-Cookie` header reduced to its `name=value` pair.
    pub fn cookie(&self) -> Option<String> {
        self.headers
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|pair| pair.trim().to_string())
    }

    /// Converts the response body to the specified type.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
