use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token_ttl_secs: u64,
}

/// Credentials used to obtain a bearer token
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { username: String, password: String },
    ApiKey(String),
    /// A previous login's cached token for `username`; never logs in itself
    Session { username: String },
}

impl Credentials {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey(key.into())
    }

    pub fn session(username: impl Into<String>) -> Self {
        Credentials::Session {
            username: username.into(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Credentials::Password { username, .. } | Credentials::Session { username } => {
                Some(username)
            }
            Credentials::ApiKey(_) => None,
        }
    }

    /// Identity part of the credentials, safe to log
    pub fn identity(&self) -> String {
        match self {
            Credentials::Password { username, .. } | Credentials::Session { username } => {
                format!("user:{}", username)
            }
            Credentials::ApiKey(key) => {
                let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
                format!("api-key:...{}", tail)
            }
        }
    }
}

// Secrets stay out of Debug output
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::ApiKey(_) => f.debug_tuple("ApiKey").field(&"***").finish(),
            Credentials::Session { username } => f
                .debug_struct("Session")
                .field("username", username)
                .finish(),
        }
    }
}

impl ServerConfig {
    /// API key wins over username/password when both are configured
    pub fn credentials(&self) -> Option<Credentials> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Some(Credentials::api_key(key.clone()));
        }
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) if !user.is_empty() => {
                Some(Credentials::password(user.clone(), pass.clone()))
            }
            _ => None,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::for_environment(environment).with_env_overrides()
    }

    /// Built-in defaults for an environment, ignoring env var overrides
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("AYON_API_URL") {
            self.server.base_url = v;
        }
        if let Ok(v) = env::var("AYON_USERNAME") {
            self.server.username = Some(v);
        }
        if let Ok(v) = env::var("AYON_PASSWORD") {
            self.server.password = Some(v);
        }
        if let Ok(v) = env::var("AYON_API_KEY") {
            self.server.api_key = Some(v);
        }

        // HTTP overrides
        if let Ok(v) = env::var("AYON_CONNECT_TIMEOUT_SECS") {
            self.http.connect_timeout_secs = v.parse().unwrap_or(self.http.connect_timeout_secs);
        }
        if let Ok(v) = env::var("AYON_REQUEST_TIMEOUT_SECS") {
            self.http.request_timeout_secs = v.parse().unwrap_or(self.http.request_timeout_secs);
        }

        // Auth overrides
        if let Ok(v) = env::var("AYON_TOKEN_TTL_SECS") {
            self.auth.token_ttl_secs = v.parse().unwrap_or(self.auth.token_ttl_secs);
        }

        self
    }

    fn server_defaults() -> ServerConfig {
        ServerConfig {
            base_url: "http://localhost:5000/api".to_string(),
            username: None,
            password: None,
            api_key: None,
        }
    }

    fn user_agent() -> String {
        format!("ayon-client-rust/{}", env!("CARGO_PKG_VERSION"))
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: Self::server_defaults(),
            http: HttpConfig {
                connect_timeout_secs: 10,
                request_timeout_secs: 60,
                user_agent: Self::user_agent(),
            },
            auth: AuthConfig {
                token_ttl_secs: 3600,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: Self::server_defaults(),
            http: HttpConfig {
                connect_timeout_secs: 5,
                request_timeout_secs: 30,
                user_agent: Self::user_agent(),
            },
            auth: AuthConfig {
                token_ttl_secs: 3600,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: Self::server_defaults(),
            http: HttpConfig {
                connect_timeout_secs: 5,
                request_timeout_secs: 30,
                user_agent: Self::user_agent(),
            },
            auth: AuthConfig {
                token_ttl_secs: 1800,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
