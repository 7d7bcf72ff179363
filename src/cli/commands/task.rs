use clap::Subcommand;
use serde_json::json;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::task::parse_assignees;
use crate::models::{Task, TaskFilter, TaskPatch};

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List tasks")]
    List {
        #[arg(long)]
        project: Option<String>,
        #[arg(long, help = "Only tasks of this product id")]
        product: Option<String>,
        #[arg(long, help = "Only tasks of this folder id")]
        folder: Option<String>,
        #[arg(long, help = "Only tasks assigned to these users (comma separated)")]
        assignee: Option<String>,
    },

    #[command(about = "Show task details")]
    Get {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Create a task")]
    Create {
        #[arg(help = "Task name")]
        name: String,
        #[arg(long = "type", help = "Task type, e.g. Compositing")]
        task_type: String,
        #[arg(long, help = "Product id the task belongs to")]
        product: Option<String>,
        #[arg(long, help = "Folder id the task belongs to")]
        folder: Option<String>,
        #[arg(long, help = "Assignees (comma separated)")]
        assignees: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Replace a task with JSON read from stdin")]
    Update {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },

    #[command(about = "Change selected task fields")]
    Patch {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, help = "Assignees (comma separated, replaces the list)")]
        assignees: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    #[command(about = "Delete a task")]
    Delete {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long)]
        project: Option<String>,
    },
}

pub async fn handle(cmd: TaskCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TaskCommands::List { project, product, folder, assignee } => {
            let project = resolve_project(project)?;
            let filter = TaskFilter {
                product_id: product,
                folder_id: folder,
                assignees: assignee.as_deref().map(parse_assignees).unwrap_or_default(),
            };
            let client = build_client(None)?;
            let tasks = client.get_tasks(&project, &filter).await?;

            output_rows(
                &output_format,
                "tasks",
                &tasks,
                &format!("{:<38} {:<16} {:<14} {:<12} {}", "ID", "NAME", "TYPE", "STATUS", "ASSIGNEES"),
                |t| {
                    format!(
                        "{:<38} {:<16} {:<14} {:<12} {}",
                        cell(t.id.as_deref()),
                        cell(t.name.as_deref()),
                        cell(t.task_type.as_deref()),
                        cell(t.status.as_deref()),
                        t.assignees.as_ref().map(|a| a.join(",")).unwrap_or_default()
                    )
                },
            )
        }
        TaskCommands::Get { id, project } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            let task = client.get_task(&project, &id).await?;
            output_record(&output_format, "task", &task)
        }
        TaskCommands::Create { name, task_type, product, folder, assignees, status, project } => {
            let project = resolve_project(project)?;
            let mut task = Task::new(name, task_type);
            task.product_id = product;
            task.folder_id = folder;
            task.status = status;
            if let Some(raw) = assignees {
                task = task.with_assignees(parse_assignees(&raw));
            }

            let client = build_client(None)?;
            let created = client.create_task(&project, &task).await?;
            output_mutation(&output_format, "task", &created, "Task created")
        }
        TaskCommands::Update { id, project } => {
            let project = resolve_project(project)?;
            let task: Task = read_json_stdin("task")?;
            let client = build_client(None)?;
            let outcome = client.update_task(&project, &id, &task).await?;
            output_mutation(&output_format, "task", &outcome, &format!("Task '{}' updated", id))
        }
        TaskCommands::Patch { id, project, name, status, assignees, active } => {
            let project = resolve_project(project)?;
            let patch = TaskPatch {
                name,
                status,
                assignees: assignees.as_deref().map(parse_assignees),
                active,
                ..Default::default()
            };
            if patch.is_empty() {
                return Err(anyhow::anyhow!("Nothing to change: pass at least one field flag"));
            }

            let client = build_client(None)?;
            let outcome = client.patch_task(&project, &id, &patch).await?;
            output_mutation(&output_format, "task", &outcome, &format!("Task '{}' updated", id))
        }
        TaskCommands::Delete { id, project } => {
            let project = resolve_project(project)?;
            let client = build_client(None)?;
            client.delete_task(&project, &id).await?;
            output_success(
                &output_format,
                &format!("Task '{}' deleted", id),
                Some(json!({ "task_id": id })),
            )
        }
    }
}
