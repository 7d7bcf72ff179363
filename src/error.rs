// Client Error Types
use crate::client::token_store::TokenStoreError;
use crate::types::{EntityKind, Operation};
use thiserror::Error;

/// A CRUD call rejected by the server, after the single re-authentication retry
#[derive(Debug, Clone, Error)]
#[error("{}", self.describe())]
pub struct RequestError {
    pub entity: Option<EntityKind>,
    pub operation: Option<Operation>,
    pub identifier: Option<String>,
    pub status: u16,
    pub body: String,
}

impl RequestError {
    /// Rejection seen by the raw request path, with no entity context
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            entity: None,
            operation: None,
            identifier: None,
            status,
            body: body.into(),
        }
    }

    pub fn entity(
        entity: EntityKind,
        operation: Operation,
        identifier: Option<&str>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self {
            entity: Some(entity),
            operation: Some(operation),
            identifier: identifier.map(str::to_string),
            status,
            body: body.into(),
        }
    }

    /// Attach entity context to a rejection raised by the raw request path
    pub fn with_context(
        mut self,
        entity: EntityKind,
        operation: Operation,
        identifier: Option<&str>,
    ) -> Self {
        self.entity.get_or_insert(entity);
        self.operation.get_or_insert(operation);
        if self.identifier.is_none() {
            self.identifier = identifier.map(str::to_string);
        }
        self
    }

    fn describe(&self) -> String {
        match (self.entity, self.operation, &self.identifier) {
            (Some(entity), Some(op), Some(id)) => {
                format!("Failed to {} {} {}: {} - {}", op, entity, id, self.status, self.body)
            }
            (Some(entity), Some(Operation::List), None) => {
                format!("Failed to list {}: {} - {}", entity.plural(), self.status, self.body)
            }
            (Some(entity), Some(op), None) => {
                format!("Failed to {} {}: {} - {}", op, entity, self.status, self.body)
            }
            _ => format!("Request failed: {} - {}", self.status, self.body),
        }
    }
}

/// Errors surfaced by the AYON client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authentication failed: {status} - {body}")]
    Authentication { status: u16, body: String },

    #[error("Session for {identity} expired, run 'ayon auth login' to sign in again")]
    SessionExpired { identity: String },

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("{entity} '{identifier}' not found")]
    NotFound { entity: EntityKind, identifier: String },

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn config(message: impl Into<String>) -> Self {
        ClientError::Config(message.into())
    }

    pub fn not_found(entity: EntityKind, identifier: impl Into<String>) -> Self {
        ClientError::NotFound {
            entity,
            identifier: identifier.into(),
        }
    }

    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        ClientError::Decode {
            context: context.into(),
            source,
        }
    }

    /// HTTP status carried by the error, when the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { status, .. } => Some(*status),
            ClientError::Request(err) => Some(err.status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Stable code for CLI and collaborator output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Authentication { .. } => "AUTHENTICATION_FAILED",
            ClientError::SessionExpired { .. } => "SESSION_EXPIRED",
            ClientError::Request(err) if err.status == 404 => "NOT_FOUND",
            ClientError::Request(_) => "REQUEST_FAILED",
            ClientError::NotFound { .. } => "NOT_FOUND",
            ClientError::Graphql(_) => "GRAPHQL_ERROR",
            ClientError::Transport(err) if err.is_timeout() => "TIMEOUT",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Decode { .. } => "INVALID_RESPONSE",
            ClientError::TokenStore(_) => "TOKEN_STORE_ERROR",
            ClientError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
