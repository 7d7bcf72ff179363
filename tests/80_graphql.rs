mod common;

use anyhow::Result;
use ayon_client_rust::ClientError;
use common::*;
use serde_json::json;

#[tokio::test]
async fn query_returns_data_member() -> Result<()> {
    let server = spawn_server().await?;
    let client = server.client()?;

    let data = client
        .graphql(
            "query Projects($first: Int) { projects(first: $first) { edges { node { name } } } }",
            Some(json!({ "first": 10 })),
        )
        .await?;
    assert_eq!(data["projects"]["edges"][0]["node"]["name"], json!(PROJECT));
    assert_eq!(data["variables"], json!({ "first": 10 }));
    Ok(())
}

#[tokio::test]
async fn server_errors_become_graphql_error() -> Result<()> {
    let server = spawn_server().await?;
    let client = server.client()?;

    let err = client.graphql("{ boom }", None).await.unwrap_err();
    match err {
        ClientError::Graphql(message) => {
            assert!(message.contains("boom"));
            assert!(message.contains("; Unknown argument"));
        }
        other => panic!("expected graphql error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn mutations_are_rejected_before_sending() -> Result<()> {
    let server = spawn_server().await?;
    let client = server.client()?;

    let err = client
        .graphql("# rename\nmutation { updateProject(name: \"x\") { ok } }", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Graphql(_)));
    assert_eq!(server.state.request_count(), 0);
    assert_eq!(server.state.login_count(), 0);
    Ok(())
}

#[tokio::test]
async fn graphql_retries_once_on_401() -> Result<()> {
    let server = spawn_server().await?;
    let client = server.client()?;
    client.authenticate().await?;

    server.state.reject_next(1);
    client.graphql("{ projects { edges { node { name } } } }", None).await?;
    assert_eq!(server.state.login_count(), 2);
    Ok(())
}
