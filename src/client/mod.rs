//! Authenticated client for the AYON server.
//!
//! [`AyonClient`] owns the credentials and the current bearer token, and
//! funnels every call through [`AyonClient::request`], which re-authenticates
//! once when the server answers 401/403. The typed entity operations live in
//! the sibling modules as further `impl AyonClient` blocks.

pub mod folders;
pub mod graphql;
pub mod products;
pub mod projects;
pub mod response;
pub mod tasks;
pub mod token_store;
pub mod users;

pub use response::ApiResponse;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, Credentials};
use crate::error::{ClientError, ClientResult, RequestError};
use crate::types::{EntityKind, HttpMethod, Operation};

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const LOGIN_ENDPOINT: &str = "auth/login";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Token in use by one client, with when it was adopted
#[derive(Debug, Clone)]
struct AdoptedToken {
    value: String,
    adopted_at: Instant,
}

/// Client for a single AYON server and credential set
pub struct AyonClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    token: RwLock<Option<AdoptedToken>>,
    store: Arc<dyn TokenStore>,
    cache_key: String,
    token_ttl: Duration,
}

pub struct AyonClientBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    store: Option<Arc<dyn TokenStore>>,
    token_ttl: Duration,
    connect_timeout: Duration,
    request_timeout: Duration,
    user_agent: Option<String>,
}

impl AyonClientBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> ClientResult<AyonClient> {
        let base_url = normalize_base_url(&self.base_url)?;
        let credentials = self
            .credentials
            .ok_or_else(|| ClientError::config("no AYON credentials configured"))?;

        let mut http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout);
        if let Some(agent) = &self.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http.build()?;

        let cache_key = cache_key(&base_url, &credentials);
        let store = self
            .store
            .unwrap_or_else(|| MemoryTokenStore::shared() as Arc<dyn TokenStore>);

        Ok(AyonClient {
            http,
            base_url,
            credentials,
            token: RwLock::new(None),
            store,
            cache_key,
            token_ttl: self.token_ttl,
        })
    }
}

impl AyonClient {
    pub fn builder(base_url: impl Into<String>) -> AyonClientBuilder {
        AyonClientBuilder {
            base_url: base_url.into(),
            credentials: None,
            store: None,
            token_ttl: DEFAULT_TOKEN_TTL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: None,
        }
    }

    /// Builder preloaded from application config
    pub fn builder_from_config(config: &AppConfig) -> ClientResult<AyonClientBuilder> {
        let credentials = config.server.credentials().ok_or_else(|| {
            ClientError::config("set AYON_API_KEY or AYON_USERNAME and AYON_PASSWORD")
        })?;

        Ok(Self::builder(config.server.base_url.clone())
            .credentials(credentials)
            .token_ttl(config.auth.token_ttl())
            .connect_timeout(config.http.connect_timeout())
            .request_timeout(config.http.request_timeout())
            .user_agent(config.http.user_agent.clone()))
    }

    /// Build from config and authenticate immediately
    pub async fn connect(config: &AppConfig) -> ClientResult<Self> {
        let client = Self::builder_from_config(config)?.build()?;
        client.authenticate().await?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Token currently adopted by this client, if any
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.as_ref().map(|t| t.value.clone())
    }

    /// Absolute URL for an endpoint relative to the base URL
    pub fn url(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    /// Adopt a cached token, or log in and cache the new one.
    ///
    /// API keys are adopted directly and never written to the store.
    /// Session credentials only ever adopt a cached token.
    pub async fn authenticate(&self) -> ClientResult<()> {
        if let Credentials::ApiKey(key) = &self.credentials {
            self.adopt(key.clone()).await;
            return Ok(());
        }

        if let Some(cached) = self.store.get(&self.cache_key).await? {
            debug!("Reusing cached AYON token");
            self.adopt(cached).await;
            return Ok(());
        }

        let token = self.login().await?;
        self.store
            .set(&self.cache_key, &token, self.token_ttl)
            .await?;
        self.adopt(token).await;
        Ok(())
    }

    async fn adopt(&self, value: String) {
        *self.token.write().await = Some(AdoptedToken {
            value,
            adopted_at: Instant::now(),
        });
    }

    fn is_fresh(&self, token: &AdoptedToken) -> bool {
        matches!(self.credentials, Credentials::ApiKey(_))
            || token.adopted_at.elapsed() < self.token_ttl
    }

    /// Discard the cached token everywhere, then authenticate afresh
    pub async fn reauthenticate(&self) -> ClientResult<()> {
        self.store.invalidate(&self.cache_key).await?;
        *self.token.write().await = None;
        self.authenticate().await
    }

    /// Forget the token locally and in the store
    pub async fn logout(&self) -> ClientResult<()> {
        self.store.invalidate(&self.cache_key).await?;
        *self.token.write().await = None;
        Ok(())
    }

    async fn login(&self) -> ClientResult<String> {
        let (username, password) = match &self.credentials {
            Credentials::ApiKey(key) => return Ok(key.clone()),
            Credentials::Password { username, password } => (username, password),
            Credentials::Session { .. } => {
                return Err(ClientError::SessionExpired {
                    identity: self.credentials.identity(),
                });
            }
        };

        info!(user = %username, "Authenticating with AYON server");
        let response = self
            .http
            .post(self.url(LOGIN_ENDPOINT))
            .json(&json!({ "name": username, "password": password }))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            warn!(user = %username, status, "AYON login rejected");
            return Err(ClientError::Authentication { status, body });
        }

        match serde_json::from_str::<LoginResponse>(&body) {
            Ok(LoginResponse { token: Some(token) }) if !token.is_empty() => Ok(token),
            _ => Err(ClientError::Authentication { status, body }),
        }
    }

    /// Token for the next call; one older than the TTL is replaced first
    async fn current_token(&self) -> ClientResult<String> {
        let current = self
            .token
            .read()
            .await
            .as_ref()
            .filter(|t| self.is_fresh(t))
            .map(|t| t.value.clone());
        if let Some(token) = current {
            return Ok(token);
        }

        self.authenticate().await?;
        self.token()
            .await
            .ok_or_else(|| ClientError::config("authentication produced no token"))
    }

    /// Authenticated call with one re-authentication retry on 401/403.
    ///
    /// Non-auth statuses are returned as-is for the caller to check. A second
    /// authorization failure becomes a [`RequestError`]. Transport errors are
    /// never retried.
    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> ClientResult<ApiResponse> {
        let url = self.url(endpoint);

        let token = self.current_token().await?;
        let response = self.send(method, &url, &token, params, body).await?;
        if !is_auth_failure(response.status) {
            return Ok(response);
        }

        warn!(%method, url = %url, status = response.status, "AYON rejected token, re-authenticating");
        self.reauthenticate().await?;
        let token = self.current_token().await?;

        let response = self.send(method, &url, &token, params, body).await?;
        if is_auth_failure(response.status) {
            return Err(RequestError::raw(response.status, response.body).into());
        }
        Ok(response)
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        token: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> ClientResult<ApiResponse> {
        let mut request = self
            .http
            .request(method.into(), url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(%method, url, status, "AYON request completed");
        Ok(ApiResponse { status, body })
    }

    /// Entity call: request, then check the status against the operation
    pub(crate) async fn call(
        &self,
        target: Target<'_>,
        method: HttpMethod,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> ClientResult<ApiResponse> {
        let response = self
            .request(method, endpoint, params, body)
            .await
            .map_err(|err| match err {
                ClientError::Request(e) => {
                    ClientError::Request(e.with_context(target.kind, target.operation, target.identifier))
                }
                other => other,
            })?;

        if !target.operation.accepts(response.status) {
            return Err(RequestError::entity(
                target.kind,
                target.operation,
                target.identifier,
                response.status,
                response.body,
            )
            .into());
        }
        Ok(response)
    }
}

/// What an entity call is about, for status checks and error messages
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target<'a> {
    pub kind: EntityKind,
    pub operation: Operation,
    pub identifier: Option<&'a str>,
}

impl<'a> Target<'a> {
    pub fn new(kind: EntityKind, operation: Operation) -> Self {
        Self {
            kind,
            operation,
            identifier: None,
        }
    }

    pub fn id(mut self, identifier: &'a str) -> Self {
        self.identifier = Some(identifier);
        self
    }
}

pub(crate) fn to_body<T: serde::Serialize>(value: &T, kind: EntityKind) -> ClientResult<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::decode(kind.as_str(), e))
}

fn is_auth_failure(status: u16) -> bool {
    status == 401 || status == 403
}

fn normalize_base_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ClientError::config(format!("invalid AYON base URL '{}': {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::config(format!(
            "AYON base URL must be http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

/// Join without doubling slashes at the seam or leaving one dangling
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let endpoint = endpoint.trim_matches('/');
    if endpoint.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, endpoint)
    }
}

/// Store key shared by every client with the same server and credentials
fn cache_key(base_url: &str, credentials: &Credentials) -> String {
    let secret_identity = match credentials {
        Credentials::Password { username, .. } | Credentials::Session { username } => {
            format!("user:{}", username)
        }
        Credentials::ApiKey(key) => format!("api-key:{}", key),
    };

    let mut hasher = Sha256::new();
    hasher.update(base_url.as_bytes());
    hasher.update(b"\n");
    hasher.update(secret_identity.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    format!("ayon_api_token:{}", &hash[..16])
}
