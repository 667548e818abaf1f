//! Application endpoints

use super::client::{segment, OktaClient};
use super::models::{Assignment, ClientSecret, OpenIdConnectApplication};
use super::query::{QueryParams, DEFAULT_PAGINATION_LIMIT};
use crate::error::Result;

/// Fetch one application by ID
pub async fn get_application(client: &OktaClient, id: &str) -> Result<OpenIdConnectApplication> {
    let path = format!("/api/v1/apps/{}", segment(id));
    client.get_json(&path, None).await
}

/// List applications matching `query`, first page only
pub async fn list_applications(
    client: &OktaClient,
    query: &QueryParams,
) -> Result<Vec<OpenIdConnectApplication>> {
    let apps: Option<Vec<OpenIdConnectApplication>> =
        client.get_json("/api/v1/apps", Some(query)).await?;
    Ok(apps.unwrap_or_default())
}

/// List the client secrets of an OAuth application
pub async fn list_client_secrets(client: &OktaClient, app_id: &str) -> Result<Vec<ClientSecret>> {
    let path = format!("/api/v1/apps/{}/credentials/secrets", segment(app_id));
    let secrets: Option<Vec<ClientSecret>> = client.get_json(&path, None).await?;
    Ok(secrets.unwrap_or_default())
}

/// IDs of the users assigned to an application
pub async fn list_application_user_ids(client: &OktaClient, app_id: &str) -> Result<Vec<String>> {
    let path = format!("/api/v1/apps/{}/users", segment(app_id));
    let query = QueryParams {
        limit: Some(DEFAULT_PAGINATION_LIMIT),
        ..Default::default()
    };
    let users: Vec<Assignment> = client.list_all(&path, Some(&query)).await?;
    Ok(users.into_iter().map(|u| u.id).collect())
}

/// IDs of the groups assigned to an application
pub async fn list_application_group_ids(client: &OktaClient, app_id: &str) -> Result<Vec<String>> {
    let path = format!("/api/v1/apps/{}/groups", segment(app_id));
    let query = QueryParams {
        limit: Some(DEFAULT_PAGINATION_LIMIT),
        ..Default::default()
    };
    let groups: Vec<Assignment> = client.list_all(&path, Some(&query)).await?;
    Ok(groups.into_iter().map(|g| g.id).collect())
}
