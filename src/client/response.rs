use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::models::{list_from_value, Mutation, StatusResponse};
use crate::types::EntityKind;

/// Raw server answer: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// Parse the body as JSON; an empty body reads as `null`
    pub fn json_value(&self) -> ClientResult<Value> {
        if !self.has_content() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
            .map_err(|e| ClientError::decode(format!("HTTP {} response", self.status), e))
    }

    /// Parse a single entity; an empty body is a decode error
    pub fn entity<T: DeserializeOwned>(&self, kind: EntityKind) -> ClientResult<T> {
        serde_json::from_value(self.json_value()?)
            .map_err(|e| ClientError::decode(kind.as_str(), e))
    }

    pub fn list<T: DeserializeOwned>(&self, kind: EntityKind) -> ClientResult<Vec<T>> {
        list_from_value(self.json_value()?, kind)
            .map_err(|e| ClientError::decode(kind.plural(), e))
    }

    /// Echoed entity when the server sent one, synthetic success otherwise
    pub fn mutation<T: DeserializeOwned>(&self, kind: EntityKind) -> ClientResult<Mutation<T>> {
        if !self.has_content() {
            return Ok(Mutation::Status(StatusResponse::success()));
        }
        match self.json_value()? {
            Value::Null => Ok(Mutation::Status(StatusResponse::success())),
            value => serde_json::from_value(value)
                .map(Mutation::Entity)
                .map_err(|e| ClientError::decode(kind.as_str(), e)),
        }
    }
}
