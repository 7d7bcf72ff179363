use clap::Subcommand;
use serde_json::json;
use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::Project;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List all projects")]
    List,

    #[command(about = "Show project details")]
    Get {
        #[arg(help = "Project name (defaults to the current project)")]
        name: Option<String>,
    },

    #[command(about = "Create a project (reads JSON from stdin when --code is omitted)")]
    Create {
        #[arg(help = "Project name")]
        name: String,
        #[arg(long, help = "Project code")]
        code: Option<String>,
        #[arg(long, help = "Project description")]
        description: Option<String>,
    },

    #[command(about = "Replace a project with JSON read from stdin")]
    Update {
        #[arg(help = "Project name")]
        name: String,
    },

    #[command(about = "Delete a project")]
    Delete {
        #[arg(help = "Project name")]
        name: String,
    },

    #[command(about = "Select the project used when --project is omitted")]
    Use {
        #[arg(help = "Project name")]
        name: String,
    },

    #[command(about = "Show the current project")]
    Current,
}

pub async fn handle(cmd: ProjectCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProjectCommands::List => {
            let client = build_client(None)?;
            let projects = client.get_projects().await?;
            let current = current_project()?;

            output_rows(
                &output_format,
                "projects",
                &projects,
                &format!("{:<24} {:<10} {:<8}", "NAME", "CODE", "ACTIVE"),
                |p| {
                    let marker = if current.as_deref() == Some(p.name.as_str()) { "*" } else { " " };
                    format!(
                        "{}{:<23} {:<10} {:<8}",
                        marker,
                        p.name,
                        cell(p.code.as_deref()),
                        if p.is_active() { "yes" } else { "no" }
                    )
                },
            )
        }
        ProjectCommands::Get { name } => {
            let name = resolve_project(name)?;
            let client = build_client(None)?;
            let project = client.get_project(&name).await?;
            output_record(&output_format, "project", &project)
        }
        ProjectCommands::Create { name, code, description } => {
            let project = match code {
                Some(code) => {
                    let mut project = Project::new(name.clone(), code);
                    if let Some(description) = description {
                        project.attrib = Some(json!({ "description": description }));
                    }
                    project
                }
                None => read_json_stdin::<Project>("project")?,
            };

            let client = build_client(None)?;
            let created = client.create_project(&name, &project).await?;
            output_mutation(
                &output_format,
                "project",
                &created,
                &format!("Project '{}' created", name),
            )
        }
        ProjectCommands::Update { name } => {
            let project: Project = read_json_stdin("project")?;
            let client = build_client(None)?;
            let outcome = client.update_project(&name, &project).await?;
            output_mutation(
                &output_format,
                "project",
                &outcome,
                &format!("Project '{}' updated", name),
            )
        }
        ProjectCommands::Delete { name } => {
            let client = build_client(None)?;
            client.delete_project(&name).await?;

            // Forget the selection if it pointed at the deleted project
            let mut env_config = load_environment_config()?;
            if env_config.current_project.as_deref() == Some(name.as_str()) {
                env_config.current_project = None;
                save_environment_config(&env_config)?;
            }

            output_success(
                &output_format,
                &format!("Project '{}' deleted", name),
                Some(json!({ "project": name })),
            )
        }
        ProjectCommands::Use { name } => {
            let client = build_client(None)?;
            let project = client.get_project(&name).await?;

            let mut env_config = load_environment_config()?;
            env_config.current_project = Some(project.name.clone());
            save_environment_config(&env_config)?;

            output_success(
                &output_format,
                &format!("Switched to project: {}", project.name),
                Some(json!({ "current_project": project.name })),
            )
        }
        ProjectCommands::Current => match current_project()? {
            Some(name) => output_current_item(&output_format, "project", &name),
            None => output_no_current_item(&output_format, "project"),
        },
    }
}
