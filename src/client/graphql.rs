use serde_json::{json, Value};

use super::AyonClient;
use crate::error::{ClientError, ClientResult};
use crate::types::HttpMethod;

const GRAPHQL_ENDPOINT: &str = "graphql";

impl AyonClient {
    /// Run a read-only GraphQL document and return its `data` member
    pub async fn graphql(&self, query: &str, variables: Option<Value>) -> ClientResult<Value> {
        ensure_read_only(query)?;

        let body = json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| json!({})),
        });
        let response = self
            .request(HttpMethod::Post, GRAPHQL_ENDPOINT, &[], Some(&body))
            .await?;
        if response.status != 200 {
            return Err(ClientError::Graphql(format!(
                "HTTP {} - {}",
                response.status, response.body
            )));
        }

        let mut payload = response.json_value()?;
        if let Some(message) = error_messages(&payload) {
            return Err(ClientError::Graphql(message));
        }
        Ok(payload
            .get_mut("data")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// Reject mutations and subscriptions; GraphQL is only used for reads
fn ensure_read_only(query: &str) -> ClientResult<()> {
    match first_keyword(query) {
        Some(kw) if kw == "mutation" || kw == "subscription" => Err(ClientError::Graphql(format!(
            "{} operations are not allowed",
            kw
        ))),
        Some(_) => Ok(()),
        None => Err(ClientError::Graphql("empty query".to_string())),
    }
}

fn first_keyword(query: &str) -> Option<String> {
    let stripped: String = query
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = stripped.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        return Some("query".to_string());
    }
    Some(
        trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase(),
    )
}

fn error_messages(payload: &Value) -> Option<String> {
    let errors = payload.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string())
        })
        .collect();
    Some(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_guard() {
        assert!(ensure_read_only("{ projects { edges { node { name } } } }").is_ok());
        assert!(ensure_read_only("query Projects { projects { edges { node { name } } } }").is_ok());
        assert!(ensure_read_only("# list\n  query { users { name } }").is_ok());
        assert!(ensure_read_only("mutation { deleteProject(name: \"x\") }").is_err());
        assert!(ensure_read_only("  Subscription { events }").is_err());
        assert!(ensure_read_only("   # nothing here").is_err());
    }

    #[test]
    fn test_error_messages_collected() {
        let payload = json!({"errors": [{"message": "bad field"}, {"message": "worse"}]});
        assert_eq!(error_messages(&payload).as_deref(), Some("bad field; worse"));
        assert_eq!(error_messages(&json!({"data": {}, "errors": []})), None);
    }
}
