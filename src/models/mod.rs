pub mod folder;
pub mod product;
pub mod project;
pub mod task;
pub mod user;

pub use folder::{Folder, FolderFilter, FolderPatch};
pub use product::Product;
pub use project::Project;
pub use task::{Task, TaskFilter, TaskPatch};
pub use user::User;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::types::EntityKind;

/// Unknown fields carried alongside the named ones
pub type Extra = Map<String, Value>;

/// Body returned by mutations when the server answers without content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Result of an update: the echoed entity, or a synthetic success marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mutation<T> {
    Entity(T),
    Status(StatusResponse),
}

impl<T> Mutation<T> {
    pub fn entity(self) -> Option<T> {
        match self {
            Mutation::Entity(entity) => Some(entity),
            Mutation::Status(_) => None,
        }
    }

    pub fn is_success_marker(&self) -> bool {
        matches!(self, Mutation::Status(_))
    }
}

/// Decode a list response that is either a bare array or `{"<plural>": [...]}`
pub fn list_from_value<T: DeserializeOwned>(
    value: Value,
    kind: EntityKind,
) -> Result<Vec<T>, serde_json::Error> {
    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut obj) => obj.remove(kind.plural()).unwrap_or_else(|| json!([])),
        Value::Null => json!([]),
        other => other,
    };
    serde_json::from_value(items)
}

/// Folders and tasks treat these parents as "attached to the project itself"
pub fn is_root_parent(parent_id: Option<&str>, project_name: &str) -> bool {
    match parent_id {
        None => true,
        Some(id) => id.is_empty() || id == "root" || id == project_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_accepts_bare_array_and_wrapped_object() {
        let bare: Vec<Folder> =
            list_from_value(json!([{"id": "f1", "name": "sq010"}]), EntityKind::Folder).unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped: Vec<Folder> = list_from_value(
            json!({"folders": [{"id": "f1"}, {"id": "f2"}], "count": 2}),
            EntityKind::Folder,
        )
        .unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].id.as_deref(), Some("f2"));
    }

    #[test]
    fn test_list_missing_key_is_empty() {
        let empty: Vec<Task> = list_from_value(json!({"detail": "none"}), EntityKind::Task).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_root_parent_conventions() {
        assert!(is_root_parent(None, "demo"));
        assert!(is_root_parent(Some("root"), "demo"));
        assert!(is_root_parent(Some("demo"), "demo"));
        assert!(!is_root_parent(Some("f-123"), "demo"));
    }

    #[test]
    fn test_mutation_status_serializes_as_plain_marker() {
        let m: Mutation<Project> = Mutation::Status(StatusResponse::success());
        assert_eq!(serde_json::to_value(&m).unwrap(), json!({"status": "success"}));
    }
}
