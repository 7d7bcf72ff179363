use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Extra;

pub const SEQUENCE: &str = "Sequence";
pub const SHOT: &str = "Shot";

/// Folder record (sequences and shot folders)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, alias = "folderType", skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<String>,
    #[serde(default, alias = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrib: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Folder {
    pub fn new(name: impl Into<String>, folder_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            folder_type: Some(folder_type.into()),
            ..Default::default()
        }
    }

    pub fn sequence(name: impl Into<String>) -> Self {
        Self::new(name, SEQUENCE)
    }

    pub fn shot(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::new(name, SHOT)
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_type(&self, folder_type: &str) -> bool {
        self.folder_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(folder_type))
    }
}

/// Server-side filters for folder listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderFilter {
    pub folder_type: Option<String>,
    pub parent_id: Option<String>,
}

impl FolderFilter {
    pub fn of_type(folder_type: impl Into<String>) -> Self {
        Self {
            folder_type: Some(folder_type.into()),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(t) = &self.folder_type {
            params.push(("folder_type".to_string(), t.clone()));
        }
        if let Some(p) = &self.parent_id {
            params.push(("parent_id".to_string(), p.clone()));
        }
        params
    }
}

/// Partial folder update sent with PATCH; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FolderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrib: Option<Value>,
}

impl FolderPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_camel_case_server_fields() {
        let folder: Folder = serde_json::from_value(json!({
            "id": "f1",
            "name": "sh010",
            "folderType": "Shot",
            "parentId": "seq1",
            "hasTasks": true
        }))
        .unwrap();
        assert!(folder.is_type("shot"));
        assert_eq!(folder.parent_id.as_deref(), Some("seq1"));
        assert_eq!(folder.extra.get("hasTasks"), Some(&json!(true)));
    }

    #[test]
    fn test_filter_query_pairs() {
        assert!(FolderFilter::default().to_query().is_empty());
        let q = FolderFilter::of_type(SHOT).with_parent("seq1").to_query();
        assert_eq!(
            q,
            vec![
                ("folder_type".to_string(), "Shot".to_string()),
                ("parent_id".to_string(), "seq1".to_string())
            ]
        );
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = FolderPatch {
            status: Some("In progress".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"status": "In progress"}));
    }
}
