//! User and group membership endpoints

use super::client::{segment, OktaClient};
use super::models::{Group, Role, User};
use super::query::{QueryParams, DEFAULT_PAGINATION_LIMIT};
use crate::error::Result;

/// List every user matching `query`
pub async fn list_users(client: &OktaClient, query: &QueryParams) -> Result<Vec<User>> {
    client.list_all("/api/v1/users", Some(query)).await
}

/// List every member of a group
pub async fn list_group_users(client: &OktaClient, group_id: &str) -> Result<Vec<User>> {
    let path = format!("/api/v1/groups/{}/users", segment(group_id));
    let query = QueryParams {
        limit: Some(DEFAULT_PAGINATION_LIMIT),
        ..Default::default()
    };
    client.list_all(&path, Some(&query)).await
}

/// IDs of the groups a user belongs to
pub async fn list_user_group_ids(client: &OktaClient, user_id: &str) -> Result<Vec<String>> {
    let path = format!("/api/v1/users/{}/groups", segment(user_id));
    let query = QueryParams {
        limit: Some(DEFAULT_PAGINATION_LIMIT),
        ..Default::default()
    };
    let groups: Vec<Group> = client.list_all(&path, Some(&query)).await?;
    Ok(groups.into_iter().map(|g| g.id).collect())
}

/// Admin role types assigned to a user
pub async fn list_user_role_types(client: &OktaClient, user_id: &str) -> Result<Vec<String>> {
    let path = format!("/api/v1/users/{}/roles", segment(user_id));
    let roles: Option<Vec<Role>> = client.get_json(&path, None).await?;
    Ok(roles
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.role_type)
        .collect())
}
