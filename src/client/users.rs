use super::{AyonClient, Target};
use crate::error::ClientResult;
use crate::models::User;
use crate::types::{EntityKind, HttpMethod, Operation};

const KIND: EntityKind = EntityKind::User;

impl AyonClient {
    /// List users; a non-empty `usernames` restricts the result to those names
    pub async fn get_users(&self, usernames: &[String]) -> ClientResult<Vec<User>> {
        let params: Vec<(String, String)> = usernames
            .iter()
            .map(|name| ("userNames".to_string(), name.clone()))
            .collect();
        self.call(Target::new(KIND, Operation::List), HttpMethod::Get, "users", &params, None)
            .await?
            .list(KIND)
    }

    pub async fn get_user(&self, username: &str) -> ClientResult<User> {
        self.call(
            Target::new(KIND, Operation::Get).id(username),
            HttpMethod::Get,
            &format!("users/{}", username),
            &[],
            None,
        )
        .await?
        .entity(KIND)
    }
}
