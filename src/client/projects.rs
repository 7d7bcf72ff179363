use super::{to_body, AyonClient, Target};
use crate::error::ClientResult;
use crate::models::{Mutation, Project, StatusResponse};
use crate::types::{EntityKind, HttpMethod, Operation};

const KIND: EntityKind = EntityKind::Project;

impl AyonClient {
    pub async fn get_projects(&self) -> ClientResult<Vec<Project>> {
        self.call(Target::new(KIND, Operation::List), HttpMethod::Get, "projects", &[], None)
            .await?
            .list(KIND)
    }

    pub async fn get_project(&self, project_name: &str) -> ClientResult<Project> {
        self.call(
            Target::new(KIND, Operation::Get).id(project_name),
            HttpMethod::Get,
            &format!("projects/{}", project_name),
            &[],
            None,
        )
        .await?
        .entity(KIND)
    }

    /// Create a project; AYON creates projects with PUT on the name
    pub async fn create_project(
        &self,
        project_name: &str,
        project: &Project,
    ) -> ClientResult<Mutation<Project>> {
        let body = to_body(&named(project_name, project), KIND)?;
        self.call(
            Target::new(KIND, Operation::Create).id(project_name),
            HttpMethod::Put,
            &format!("projects/{}", project_name),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    pub async fn update_project(
        &self,
        project_name: &str,
        project: &Project,
    ) -> ClientResult<Mutation<Project>> {
        let body = to_body(&named(project_name, project), KIND)?;
        self.call(
            Target::new(KIND, Operation::Update).id(project_name),
            HttpMethod::Put,
            &format!("projects/{}", project_name),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    pub async fn delete_project(&self, project_name: &str) -> ClientResult<StatusResponse> {
        self.call(
            Target::new(KIND, Operation::Delete).id(project_name),
            HttpMethod::Delete,
            &format!("projects/{}", project_name),
            &[],
            None,
        )
        .await?;
        Ok(StatusResponse::success())
    }
}

// The path segment is the identity; an unnamed payload takes it
fn named(project_name: &str, project: &Project) -> Project {
    let mut project = project.clone();
    if project.name.is_empty() {
        project.name = project_name.to_string();
    }
    project
}
