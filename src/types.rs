// Shared types used across the client

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods accepted by the AYON REST surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kinds managed through the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Folder,
    Product,
    Task,
    User,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Folder => "folder",
            EntityKind::Product => "product",
            EntityKind::Task => "task",
            EntityKind::User => "user",
        }
    }

    /// Key under which the server wraps list responses, e.g. `{"folders": [...]}`
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Folder => "folders",
            EntityKind::Product => "products",
            EntityKind::Task => "tasks",
            EntityKind::User => "users",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity operations, each with its own accepted status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Status codes the server returns when the operation succeeded
    pub fn success_statuses(&self) -> &'static [u16] {
        match self {
            Operation::List | Operation::Get => &[200],
            Operation::Create => &[200, 201],
            Operation::Update | Operation::Delete => &[200, 204],
        }
    }

    pub fn accepts(&self, status: u16) -> bool {
        self.success_statuses().contains(&status)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses_per_operation() {
        assert!(Operation::Get.accepts(200));
        assert!(!Operation::Get.accepts(201));
        assert!(Operation::Create.accepts(201));
        assert!(Operation::Update.accepts(204));
        assert!(!Operation::Update.accepts(201));
        assert!(Operation::Delete.accepts(204));
        assert!(!Operation::Delete.accepts(404));
    }

    #[test]
    fn test_method_maps_to_reqwest() {
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
