use clap::Subcommand;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List users, optionally only the named ones")]
    List {
        #[arg(help = "User names")]
        names: Vec<String>,
    },

    #[command(about = "Show user details")]
    Get {
        #[arg(help = "User name")]
        name: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = build_client(None)?;

    match cmd {
        UserCommands::List { names } => {
            let users = client.get_users(&names).await?;
            output_rows(
                &output_format,
                "users",
                &users,
                &format!("{:<20} {:<30} {}", "NAME", "FULL NAME", "ACTIVE"),
                |u| {
                    format!(
                        "{:<20} {:<30} {}",
                        u.name,
                        cell(u.full_name()),
                        match u.active {
                            Some(true) => "yes",
                            Some(false) => "no",
                            None => "-",
                        }
                    )
                },
            )
        }
        UserCommands::Get { name } => {
            let user = client.get_user(&name).await?;
            output_record(&output_format, "user", &user)
        }
    }
}
