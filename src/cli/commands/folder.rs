use clap::Subcommand;
use serde_json::json;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{is_root_parent, Folder, FolderFilter, FolderPatch};

#[derive(Subcommand)]
pub enum FolderCommands {
    #[command(about = "List folders")]
    List {
        #[arg(long, help = "Project name (defaults to the current project)")]
        project: Option<String>,
        #[arg(long = "type", help = "Only folders of this type (e.g. Sequence, Shot)")]
        folder_type: Option<String>,
        #[arg(long, help = "Only children of this folder id")]
        parent: Option<String>,
    },

    #[command(about = "Show folder details")]
    Get {
        #[arg(help = "Folder id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Create a folder")]
    Create {
        #[arg(help = "Folder name")]
        name: String,
        #[arg(long = "type", default_value = "Sequence", help = "Folder type")]
        folder_type: String,
        #[arg(long, help = "Parent folder id (omit for top level)")]
        parent: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Replace a folder with JSON read from stdin")]
    Update {
        #[arg(help = "Folder id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Change selected folder fields")]
    Patch {
        #[arg(help = "Folder id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    #[command(about = "Delete a folder")]
    Delete {
        #[arg(help = "Folder id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
        #[arg(long, help = "Also delete everything below the folder")]
        force: bool,
    },

    #[command(about = "List shot folders of a sequence")]
    Shots {
        #[arg(help = "Sequence name")]
        sequence: String,
        #[arg(long)]
        project: Option<String>,
    },
}

fn print_folders(output_format: &OutputFormat, project: &str, folders: &[Folder]) -> anyhow::Result<()> {
    output_rows(
        output_format,
        "folders",
        folders,
        &format!("{:<38} {:<20} {:<10} {}", "ID", "NAME", "TYPE", "PARENT"),
        |f| {
            format!(
                "{:<38} {:<20} {:<10} {}",
                cell(f.id.as_deref()),
                cell(f.name.as_deref()),
                cell(f.folder_type.as_deref()),
                if is_root_parent(f.parent_id.as_deref(), project) {
                    "(top)"
                } else {
                    cell(f.parent_id.as_deref())
                }
            )
        },
    )
}

pub async fn handle(cmd: FolderCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        FolderCommands::List { project, folder_type, parent } => {
            let project = resolve_project(project)?;
            let filter = FolderFilter { folder_type, parent_id: parent };
            let client = build_client(None)?;
            let folders = client.get_folders(&project, &filter).await?;
            print_folders(&output_format, &project, &folders)
        }
        FolderCommands::Get { id, project } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            let folder = client.get_folder(&project, &id).await?;
            output_record(&output_format, "folder", &folder)
        }
        FolderCommands::Create { name, folder_type, parent, label, project } => {
            let project = resolve_project(project)?;
            let mut folder = Folder::new(name, folder_type);
            folder.parent_id = parent;
            folder.label = label;

            let client = build_client(None)?;
            let created = client.create_folder(&project, &folder).await?;
            output_mutation(&output_format, "folder", &created, "Folder created")
        }
        FolderCommands::Update { id, project } => {
            let project = resolve_project(project)?;
            let folder: Folder = read_json_stdin("folder")?;
            let client = build_client(None)?;
            let outcome = client.update_folder(&project, &id, &folder).await?;
            output_mutation(&output_format, "folder", &outcome, &format!("Folder '{}' updated", id))
        }
        FolderCommands::Patch { id, project, name, label, status, parent, active } => {
            let project = resolve_project(project)?;
            let patch = FolderPatch {
                name,
                label,
                status,
                parent_id: parent,
                active,
                ..Default::default()
            };
            if patch.is_empty() {
                return Err(anyhow::anyhow!("Nothing to change: pass at least one field flag"));
            }

            let client = build_client(None)?;
            let outcome = client.patch_folder(&project, &id, &patch).await?;
            output_mutation(&output_format, "folder", &outcome, &format!("Folder '{}' updated", id))
        }
        FolderCommands::Delete { id, project, force } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            client.delete_folder(&project, &id, force).await?;
            output_success(
                &output_format,
                &format!("Folder '{}' deleted", id),
                Some(json!({ "folder_id": id })),
            )
        }
        FolderCommands::Shots { sequence, project } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            let shots = client.get_shots(&project, &sequence).await?;
            print_folders(&output_format, &project, &shots)
        }
    }
}
