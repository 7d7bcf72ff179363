use std::io::Read;
use clap::Subcommand;
use serde_json::Value;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum GraphqlCommands {
    #[command(about = "Run a read-only GraphQL query (reads the query from stdin when omitted)")]
    Query {
        #[arg(help = "GraphQL query text")]
        query: Option<String>,
        #[arg(long, help = "Variables as a JSON object")]
        variables: Option<String>,
    },
}

pub async fn handle(cmd: GraphqlCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        GraphqlCommands::Query { query, variables } => {
            let query = match query {
                Some(query) => query,
                None => {
                    let mut input = String::new();
                    std::io::stdin().read_to_string(&mut input)?;
                    input
                }
            };
            if query.trim().is_empty() {
                return Err(anyhow::anyhow!("Expected a GraphQL query argument or query text on stdin"));
            }

            let variables: Option<Value> = variables
                .as_deref()
                .map(|raw| parse_json_input(raw, "variables"))
                .transpose()?;

            let client = build_client(None)?;
            let data = client.graphql(&query, variables).await?;
            output_record(&output_format, "data", &data)
        }
    }
}
