use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{AyonClient, FileTokenStore};
use crate::config::Credentials;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub current_project: Option<String>,
    pub last_login: Option<LoginInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInfo {
    pub server: String,
    pub identity: String,
    pub username: Option<String>,
    pub logged_in_at: DateTime<Utc>,
}

impl LoginInfo {
    pub fn new(server: &str, credentials: &Credentials) -> Self {
        Self {
            server: server.to_string(),
            identity: credentials.identity(),
            username: credentials.username().map(str::to_string),
            logged_in_at: Utc::now(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("AYON_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("ayon").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn token_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join("token.json"))
}

pub fn load_environment_config() -> anyhow::Result<EnvironmentConfig> {
    let config_dir = get_config_dir()?;
    let env_file = config_dir.join("env.json");

    if !env_file.exists() {
        return Ok(EnvironmentConfig::default());
    }

    let content = fs::read_to_string(env_file)?;
    let config: EnvironmentConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_environment_config(config: &EnvironmentConfig) -> anyhow::Result<()> {
    let config_dir = get_config_dir()?;
    let env_file = config_dir.join("env.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(env_file, content)?;
    Ok(())
}

pub fn current_project() -> anyhow::Result<Option<String>> {
    Ok(load_environment_config()?.current_project)
}

/// Credentials for CLI commands: explicit, then env config, then the last login.
///
/// The last-login fallback is a session: it reuses the cached token and never
/// logs in, so an expired or rejected token asks the user to log in again.
pub fn resolve_credentials(explicit: Option<Credentials>) -> anyhow::Result<Credentials> {
    if let Some(creds) = explicit {
        return Ok(creds);
    }

    let config = crate::config::config();
    if let Some(creds) = config.server.credentials() {
        return Ok(creds);
    }

    let last_login = load_environment_config()?.last_login;
    session_from_last_login(last_login, &config.server.base_url).ok_or_else(|| {
        anyhow::anyhow!(
            "Not logged in: run 'ayon auth login <username>' or set AYON_USERNAME/AYON_PASSWORD"
        )
    })
}

fn session_from_last_login(last_login: Option<LoginInfo>, base_url: &str) -> Option<Credentials> {
    let login = last_login?;
    let server = base_url.trim().trim_end_matches('/');
    match login.username {
        Some(username) if login.server == server => Some(Credentials::session(username)),
        _ => None,
    }
}

/// Client for CLI commands, with a token file so consecutive runs share a login
pub fn build_client(credentials: Option<Credentials>) -> anyhow::Result<AyonClient> {
    let config = crate::config::config();
    let store = Arc::new(FileTokenStore::new(token_file()?));

    let client = AyonClient::builder(config.server.base_url.clone())
        .credentials(resolve_credentials(credentials)?)
        .token_ttl(config.auth.token_ttl())
        .connect_timeout(config.http.connect_timeout())
        .request_timeout(config.http.request_timeout())
        .user_agent(config.http.user_agent.clone())
        .token_store(store)
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_login_becomes_session_for_same_server() {
        let login = LoginInfo::new("http://ayon/api", &Credentials::password("ana", "pw"));
        assert_eq!(login.username.as_deref(), Some("ana"));

        let creds = session_from_last_login(Some(login.clone()), "http://ayon/api/");
        assert_eq!(creds, Some(Credentials::session("ana")));
        assert_eq!(session_from_last_login(Some(login), "http://other/api"), None);
        assert_eq!(session_from_last_login(None, "http://ayon/api"), None);
    }

    #[test]
    fn test_api_key_login_leaves_no_session() {
        let login = LoginInfo::new("http://ayon/api", &Credentials::api_key("key-1"));
        assert!(login.username.is_none());
        assert_eq!(session_from_last_login(Some(login), "http://ayon/api"), None);
    }
}
