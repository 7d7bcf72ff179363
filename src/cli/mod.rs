pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "ayon")]
#[command(about = "AYON CLI - browse and edit production-tracking entities")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Project operations")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Folder (sequence and shot folder) operations")]
    Folder {
        #[command(subcommand)]
        cmd: commands::folder::FolderCommands,
    },

    #[command(about = "Product (shot) operations")]
    Product {
        #[command(subcommand)]
        cmd: commands::product::ProductCommands,
    },

    #[command(about = "Task operations")]
    Task {
        #[command(subcommand)]
        cmd: commands::task::TaskCommands,
    },

    #[command(about = "User lookup")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Read-only GraphQL queries")]
    Graphql {
        #[command(subcommand)]
        cmd: commands::graphql::GraphqlCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format.clone()).await,
        Commands::Project { cmd } => commands::project::handle(cmd, output_format.clone()).await,
        Commands::Folder { cmd } => commands::folder::handle(cmd, output_format.clone()).await,
        Commands::Product { cmd } => commands::product::handle(cmd, output_format.clone()).await,
        Commands::Task { cmd } => commands::task::handle(cmd, output_format.clone()).await,
        Commands::User { cmd } => commands::user::handle(cmd, output_format.clone()).await,
        Commands::Graphql { cmd } => commands::graphql::handle(cmd, output_format.clone()).await,
    };

    // JSON consumers get a structured error body on stdout as well
    if let (Err(e), OutputFormat::Json) = (&result, &output_format) {
        let code = e
            .downcast_ref::<crate::error::ClientError>()
            .map(|err| err.error_code());
        utils::output_error(&output_format, &e.to_string(), code)?;
    }

    result
}
