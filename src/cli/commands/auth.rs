use clap::Subcommand;
use serde_json::json;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::Credentials;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server (uses AYON_USERNAME/AYON_PASSWORD when no username is given)")]
    Login {
        #[arg(help = "Username")]
        username: Option<String>,
        #[arg(long, help = "Password (read from AYON_PASSWORD if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and discard the cached token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let explicit = match username {
                Some(user) => {
                    let password = password
                        .or_else(|| crate::config::config().server.password.clone())
                        .ok_or_else(|| anyhow::anyhow!("Password required: pass --password or set AYON_PASSWORD"))?;
                    Some(Credentials::password(user, password))
                }
                None => None,
            };

            let client = build_client(explicit)?;
            if let Credentials::Session { username } = client.credentials() {
                return Err(anyhow::anyhow!(
                    "No password available: run 'ayon auth login {} --password <password>'",
                    username
                ));
            }
            // Fresh login even when a cached token exists
            client.reauthenticate().await?;

            let mut env_config = load_environment_config()?;
            env_config.last_login = Some(LoginInfo::new(client.base_url(), client.credentials()));
            save_environment_config(&env_config)?;

            output_success(
                &output_format,
                &format!("Logged in to {} as {}", client.base_url(), client.credentials().identity()),
                Some(json!({
                    "server": client.base_url(),
                    "identity": client.credentials().identity(),
                })),
            )
        }
        AuthCommands::Logout => {
            let client = build_client(None)?;
            client.logout().await?;

            let mut env_config = load_environment_config()?;
            env_config.last_login = None;
            save_environment_config(&env_config)?;

            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let env_config = load_environment_config()?;
            let server = crate::config::config().server.base_url.clone();

            let login = match env_config.last_login {
                Some(login) => login,
                None => {
                    return output_success(
                        &output_format,
                        &format!("Not logged in to {}", server),
                        Some(json!({ "server": server, "authenticated": false })),
                    );
                }
            };

            output_success(
                &output_format,
                &format!(
                    "Logged in to {} as {} since {}",
                    login.server,
                    login.identity,
                    login.logged_in_at.format("%Y-%m-%d %H:%M")
                ),
                Some(json!({
                    "server": login.server,
                    "identity": login.identity,
                    "logged_in_at": login.logged_in_at,
                    "authenticated": true,
                })),
            )
        }
    }
}
