use super::{to_body, AyonClient, Target};
use crate::error::ClientResult;
use crate::models::{Mutation, StatusResponse, Task, TaskFilter, TaskPatch};
use crate::types::{EntityKind, HttpMethod, Operation};

const KIND: EntityKind = EntityKind::Task;

fn tasks_endpoint(project_name: &str) -> String {
    format!("projects/{}/tasks", project_name)
}

fn task_endpoint(project_name: &str, task_id: &str) -> String {
    format!("projects/{}/tasks/{}", project_name, task_id)
}

impl AyonClient {
    /// List tasks; an empty filter returns every task in the project
    pub async fn get_tasks(&self, project_name: &str, filter: &TaskFilter) -> ClientResult<Vec<Task>> {
        self.call(
            Target::new(KIND, Operation::List),
            HttpMethod::Get,
            &tasks_endpoint(project_name),
            &filter.to_query(),
            None,
        )
        .await?
        .list(KIND)
    }

    pub async fn get_task(&self, project_name: &str, task_id: &str) -> ClientResult<Task> {
        self.call(
            Target::new(KIND, Operation::Get).id(task_id),
            HttpMethod::Get,
            &task_endpoint(project_name, task_id),
            &[],
            None,
        )
        .await?
        .entity(KIND)
    }

    pub async fn create_task(
        &self,
        project_name: &str,
        task: &Task,
    ) -> ClientResult<Mutation<Task>> {
        let body = to_body(task, KIND)?;
        self.call(
            Target::new(KIND, Operation::Create),
            HttpMethod::Post,
            &tasks_endpoint(project_name),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    pub async fn update_task(
        &self,
        project_name: &str,
        task_id: &str,
        task: &Task,
    ) -> ClientResult<Mutation<Task>> {
        let body = to_body(task, KIND)?;
        self.call(
            Target::new(KIND, Operation::Update).id(task_id),
            HttpMethod::Put,
            &task_endpoint(project_name, task_id),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    pub async fn patch_task(
        &self,
        project_name: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> ClientResult<Mutation<Task>> {
        let body = to_body(patch, KIND)?;
        self.call(
            Target::new(KIND, Operation::Update).id(task_id),
            HttpMethod::Patch,
            &task_endpoint(project_name, task_id),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    pub async fn delete_task(&self, project_name: &str, task_id: &str) -> ClientResult<StatusResponse> {
        self.call(
            Target::new(KIND, Operation::Delete).id(task_id),
            HttpMethod::Delete,
            &task_endpoint(project_name, task_id),
            &[],
            None,
        )
        .await?;
        Ok(StatusResponse::success())
    }

    /// Tasks in `project_name` assigned to `user`
    pub async fn get_user_tasks(&self, project_name: &str, user: &str) -> ClientResult<Vec<Task>> {
        self.get_tasks(project_name, &TaskFilter::assignee(user)).await
    }
}
