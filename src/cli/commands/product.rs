use clap::Subcommand;
use serde_json::json;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::Product;

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List products")]
    List {
        #[arg(long)]
        project: Option<String>,
        #[arg(long = "type", help = "Only products of this type (e.g. Shot)")]
        product_type: Option<String>,
    },

    #[command(about = "Show product details")]
    Get {
        #[arg(help = "Product id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Create a product under a folder")]
    Create {
        #[arg(help = "Product name")]
        name: String,
        #[arg(long, help = "Folder id the product belongs to")]
        folder: String,
        #[arg(long = "type", default_value = "Shot")]
        product_type: String,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Replace a product with JSON read from stdin")]
    Update {
        #[arg(help = "Product id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Delete a product")]
    Delete {
        #[arg(help = "Product id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },
}

pub async fn handle(cmd: ProductCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProductCommands::List { project, product_type } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            let products = client.get_products(&project, product_type.as_deref()).await?;

            output_rows(
                &output_format,
                "products",
                &products,
                &format!("{:<38} {:<20} {:<10} {}", "ID", "NAME", "TYPE", "FOLDER"),
                |p| {
                    format!(
                        "{:<38} {:<20} {:<10} {}",
                        cell(p.id.as_deref()),
                        cell(p.name.as_deref()),
                        cell(p.product_type.as_deref()),
                        cell(p.folder_id.as_deref())
                    )
                },
            )
        }
        ProductCommands::Get { id, project } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            let product = client.get_product(&project, &id).await?;
            output_record(&output_format, "product", &product)
        }
        ProductCommands::Create { name, folder, product_type, project } => {
            let project = resolve_project(project)?;
            let product = Product::new(name, product_type, folder);
            let client = build_client(None)?;
            let created = client.create_product(&project, &product).await?;
            output_mutation(&output_format, "product", &created, "Product created")
        }
        ProductCommands::Update { id, project } => {
            let project = resolve_project(project)?;
            let product: Product = read_json_stdin("product")?;
            let client = build_client(None)?;
            let outcome = client.update_product(&project, &id, &product).await?;
            output_mutation(
                &output_format,
                "product",
                &outcome,
                &format!("Product '{}' updated", id),
            )
        }
        ProductCommands::Delete { id, project } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            client.delete_product(&project, &id).await?;
            output_success(
                &output_format,
                &format!("Product '{}' deleted", id),
                Some(json!({ "product_id": id })),
            )
        }
    }
}
