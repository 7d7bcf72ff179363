use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Extra;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrib: Option<Value>,
    #[serde(default, alias = "accessGroups", skip_serializing_if = "Option::is_none")]
    pub access_groups: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl User {
    pub fn full_name(&self) -> Option<&str> {
        self.attrib
            .as_ref()
            .and_then(|a| a.get("fullName"))
            .and_then(Value::as_str)
    }
}
