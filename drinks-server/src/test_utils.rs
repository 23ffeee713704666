use crate::auth::{KeySet, TokenVerifier};
use crate::config::Settings;
use crate::create_app;
use crate::models::{Drink, Ingredient, NewDrink, Recipe, RecipeInput};
use crate::state::AppState;
use crate::store::DrinkStore;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, EncodingKey, Header};
use log::LevelFilter;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

/// Issuer the test verifier trusts
pub const TEST_ISSUER: &str = "https://drinks-test.auth.example/";
/// Audience the test verifier expects
pub const TEST_AUDIENCE: &str = "drinks";
/// Key id of the public key published in `testdata/jwks.json`
pub const TRUSTED_KID: &str = "trusted-key";

/// JWKS document holding the public half of [`TRUSTED_KEY_PEM`]
pub const TEST_JWKS: &str = include_str!("../testdata/jwks.json");
/// Private key whose public half is in the test key set
pub const TRUSTED_KEY_PEM: &[u8] = include_bytes!("../testdata/trusted_key.pem");
/// Private key that no test key set trusts
pub const ROGUE_KEY_PEM: &[u8] = include_bytes!("../testdata/rogue_key.pem");

/// A verifier configured with the test key set, issuer and audience
pub fn test_verifier() -> TokenVerifier {
    let keys = KeySet::from_json(TEST_JWKS).expect("Failed to load test key set");
    TokenVerifier::new(keys, TEST_ISSUER, TEST_AUDIENCE, &[Algorithm::RS256])
}

/// Builder for signed test tokens.
///
/// Defaults to a token signed by the trusted key, issued for the test issuer
/// and audience, valid for one hour and carrying no `permissions` claim.
///
/// # Examples
///
/// ```rust
/// let token = TokenBuilder::new()
///     .permissions(&["post:drinks"])
///     .build();
/// let response = fixture.post("/drinks", Some(&token), &body).await;
/// ```
pub struct TokenBuilder {
    claims: Map<String, Value>,
    key_pem: &'static [u8],
    kid: Option<String>,
}

impl TokenBuilder {
    pub fn new() -> Self {
        let now = get_current_timestamp();
        let mut claims = Map::new();
        claims.insert("iss".to_string(), json!(TEST_ISSUER));
        claims.insert("aud".to_string(), json!(TEST_AUDIENCE));
        claims.insert("iat".to_string(), json!(now));
        claims.insert("exp".to_string(), json!(now + 3600));

        Self {
            claims,
            key_pem: TRUSTED_KEY_PEM,
            kid: Some(TRUSTED_KID.to_string()),
        }
    }

    pub fn permissions(mut self, permissions: &[&str]) -> Self {
        self.claims
            .insert("permissions".to_string(), json!(permissions));
        self
    }

    pub fn subject(mut self, sub: &str) -> Self {
        self.claims.insert("sub".to_string(), json!(sub));
        self
    }

    pub fn issuer(mut self, iss: &str) -> Self {
        self.claims.insert("iss".to_string(), json!(iss));
        self
    }

    pub fn audience(mut self, aud: &str) -> Self {
        self.claims.insert("aud".to_string(), json!(aud));
        self
    }

    pub fn expires_at(mut self, exp: u64) -> Self {
        self.claims.insert("exp".to_string(), json!(exp));
        self
    }

    pub fn without_claim(mut self, name: &str) -> Self {
        self.claims.remove(name);
        self
    }

    /// Sign with a different private key, optionally under a different `kid`
    pub fn signing_key(mut self, pem: &'static [u8], kid: Option<&str>) -> Self {
        self.key_pem = pem;
        self.kid = kid.map(String::from);
        self
    }

    pub fn build(self) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.kid;
        let key = EncodingKey::from_rsa_pem(self.key_pem).expect("Failed to parse test key");
        encode(&header, &self.claims, &key).expect("Failed to sign test token")
    }
}

/// Shorthand for a trusted token carrying the given permissions
pub fn token_with(permissions: &[&str]) -> String {
    TokenBuilder::new().permissions(permissions).build()
}

/// A one-ingredient recipe
pub fn recipe(name: &str, color: &str, parts: u32) -> Recipe {
    Recipe::try_from(RecipeInput::One(Ingredient {
        name: name.to_string(),
        color: color.to_string(),
        parts,
    }))
    .expect("Failed to build test recipe")
}

/// Test fixture for setting up a complete test environment.
///
/// The TestFixture builds the full application router over an in-memory
/// drink store and a verifier that trusts `testdata/jwks.json`. Tokens for
/// protected routes are minted with [`TokenBuilder`] or [`token_with`].
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     // Create a new test fixture
///     let fixture = TestFixture::new().await;
///
///     // Seed the store directly
///     let drink = fixture.seed("Latte", recipe("espresso", "brown", 1)).await;
///
///     // Send a request to the API
///     let token = token_with(&["get:drinks-detail"]);
///     let response = fixture.get("/drinks-detail", Some(&token)).await;
///
///     // Verify the response
///     response.assert_ok();
///     assert_eq!(response.json["drinks"][0]["id"], drink.id);
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Application state shared with the router
    pub state: AppState,
}

impl TestFixture {
    /// Creates a new test fixture with an empty in-memory store.
    pub async fn new() -> Self {
        Self::with_state(AppState::for_testing(&Settings::for_test())).await
    }

    /// Creates a test fixture around a prepared application state, e.g. one
    /// backed by a specific store.
    pub async fn with_state(state: AppState) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let app = create_app(state.clone()).await;
        Self { app, state }
    }

    /// Initializes the test logger with customized settings.
    ///
    /// Note that this is automatically called by TestFixture::new() with
    /// default settings.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Inserts a drink straight into the store, bypassing the API.
    pub async fn seed(&self, title: &str, recipe: Recipe) -> Drink {
        self.state
            .store
            .create(NewDrink::new(title, recipe).expect("Failed to build test drink"))
            .await
            .expect("Failed to seed drink")
    }

    /// Creates a request builder with pre-configured headers.
    ///
    /// The request builder includes:
    /// - Authorization: `Bearer <token>` when a token is given
    /// - Content-Type: application/json
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri.as_ref());

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.header("Content-Type", "application/json")
    }

    /// Sends a GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a JSON body to the specified URI.
    pub async fn post<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::POST, uri, token, body).await
    }

    /// Sends a PATCH request with a JSON body to the specified URI.
    pub async fn patch<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::PATCH, uri, token, body).await
    }

    /// Sends a DELETE request to the specified URI.
    pub async fn delete(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::DELETE, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri, token)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// This is a lower-level method that is used by the convenience methods
    /// like `get()` and `post()`. Use this method when you need more control
    /// over the request details, e.g. a raw, non-JSON body.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
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

        TestResponse { status, json }
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
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

    /// Asserts the shared error body shape for the given status.
    pub fn assert_error(&self, expected: StatusCode) -> &Self {
        self.assert_status(expected);
        assert_eq!(self.json["success"], false);
        assert_eq!(self.json["error"], expected.as_u16());
        assert!(
            self.json["message"]
                .as_str()
                .is_some_and(|message| !message.is_empty()),
            "Expected a non-empty error message, got: {}",
            self.json
        );
        self
    }
}
