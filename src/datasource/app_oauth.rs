//! OAuth application lookup

use super::disambiguate::{select_application, select_client_secret};
use super::filter::{AppFilterInput, AppFilters};
use super::flatten::flatten_app;
use super::ReadResult;
use crate::error::{Error, Result};
use crate::okta::{apps, OktaClient};

/// Arguments of the OAuth application lookup
#[derive(Debug, Clone)]
pub struct AppOauthArgs {
    pub filters: AppFilterInput,
    /// Skip listing assigned user IDs
    pub skip_users: bool,
    /// Skip listing assigned group IDs
    pub skip_groups: bool,
}

impl Default for AppOauthArgs {
    fn default() -> Self {
        Self {
            filters: AppFilterInput::new(),
            skip_users: false,
            skip_groups: false,
        }
    }
}

/// Read one OAuth application and its current client secret
pub async fn read_app_oauth(client: &OktaClient, args: &AppOauthArgs) -> Result<ReadResult> {
    let filters =
        AppFilters::resolve(&args.filters).map_err(|e| e.during("invalid OAuth app filters"))?;

    let app = match (filters.id(), filters.query()) {
        (Some(id), _) => apps::get_application(client, id)
            .await
            .map_err(|e| e.during("failed get app by ID"))?,
        (None, Some(query)) => {
            let found = apps::list_applications(client, &query)
                .await
                .map_err(|e| e.during("failed to list OAuth apps"))?;
            select_application(found, &filters)?
        }
        (None, None) => return Err(Error::config("application filter resolved to no query")),
    };
    tracing::info!("reading OAuth application {} ({})", app.id, app.label);

    let mut user_ids = None;
    let mut group_ids = None;
    if !args.skip_users {
        user_ids = Some(
            apps::list_application_user_ids(client, &app.id)
                .await
                .map_err(|e| e.during("failed to list OAuth's app users"))?,
        );
    }
    if !args.skip_groups {
        group_ids = Some(
            apps::list_application_group_ids(client, &app.id)
                .await
                .map_err(|e| e.during("failed to list OAuth's app groups"))?,
        );
    }

    let secrets = apps::list_client_secrets(client, &app.id)
        .await
        .map_err(|e| e.during("failed to list OAuth client secrets"))?;
    let client_secret = select_client_secret(&secrets).map(|s| s.client_secret.as_str());
    if client_secret.is_none() {
        tracing::debug!("no active client secret for application {}", app.id);
    }

    let mut fields = flatten_app(&app, client_secret);
    if let Some(ids) = user_ids {
        tracing::warn!(
            "the `users` field is deprecated, use application user assignments instead"
        );
        fields.set_set("users", ids);
    }
    if let Some(ids) = group_ids {
        tracing::warn!(
            "the `groups` field is deprecated, use application group assignments instead"
        );
        fields.set_set("groups", ids);
    }

    Ok(ReadResult {
        id: app.id,
        fields,
    })
}
