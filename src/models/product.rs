use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Extra;

/// Product record; shots are products of type "Shot" attached to a folder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "folderId", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, alias = "productType", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
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

impl Product {
    pub fn new(
        name: impl Into<String>,
        product_type: impl Into<String>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            product_type: Some(product_type.into()),
            folder_id: Some(folder_id.into()),
            ..Default::default()
        }
    }

    pub fn shot(name: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self::new(name, super::folder::SHOT, folder_id)
    }
}
