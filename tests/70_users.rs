mod common;

use anyhow::Result;
use common::*;

#[tokio::test]
async fn lists_all_or_named_users() -> Result<()> {
    let server = spawn_server().await?;
    let client = server.client()?;

    assert_eq!(client.get_users(&[]).await?.len(), 3);

    let named = client.get_users(&["ana".to_string(), "bo".to_string()]).await?;
    let names: Vec<&str> = named.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["ana", "bo"]);
    Ok(())
}

#[tokio::test]
async fn get_user_reads_camel_case_fields() -> Result<()> {
    let server = spawn_server().await?;
    let client = server.client()?;

    let ana = client.get_user("ana").await?;
    assert_eq!(ana.full_name(), Some("Ana Lima"));
    assert!(ana.access_groups.is_some());

    let err = client.get_user("ghost").await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
    Ok(())
}
