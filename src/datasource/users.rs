//! Users lookup by group membership or search

use super::filter::{UserFilterInput, UserFilters};
use super::flatten::flatten_user;
use super::{FieldValue, FlatRecord, ReadResult};
use crate::error::Result;
use crate::okta::{users, OktaClient};
use std::time::Duration;

/// Arguments of the users lookup
#[derive(Debug, Clone)]
pub struct UsersArgs {
    pub filters: UserFilterInput,
    /// Fetch group memberships for each user
    pub include_groups: bool,
    /// Fetch admin roles for each user
    pub include_roles: bool,
    /// Seconds to wait before reading, as supplied (validated at read time)
    pub delay_read_seconds: Option<String>,
}

impl Default for UsersArgs {
    fn default() -> Self {
        Self {
            filters: UserFilterInput::new(),
            include_groups: false,
            include_roles: false,
            delay_read_seconds: None,
        }
    }
}

/// Parse the read delay; `None` means no delay
///
/// A value that is not an integer is reported and ignored. Negative values
/// wait for nothing.
pub fn parse_read_delay(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<i64>() {
        Ok(seconds) => Some(Duration::from_secs(seconds.max(0) as u64)),
        Err(_) => {
            tracing::warn!("users read delay value {:?} is not an integer", raw);
            None
        }
    }
}

async fn delay_read(raw: Option<&str>) {
    let Some(delay) = raw.and_then(parse_read_delay) else {
        return;
    };
    tracing::info!("delaying users read by {} seconds", delay.as_secs());
    tokio::time::sleep(delay).await;
}

/// Read every user matching the filters
pub async fn read_users(client: &OktaClient, args: &UsersArgs) -> Result<ReadResult> {
    delay_read(args.delay_read_seconds.as_deref()).await;

    let filters =
        UserFilters::resolve(&args.filters).map_err(|e| e.during("invalid users filters"))?;

    let found = match &filters {
        UserFilters::Group(group_id) => users::list_group_users(client, group_id).await,
        UserFilters::Search { .. } => users::list_users(client, &filters.query()).await,
    }
    .map_err(|e| e.during("failed to list users"))?;
    tracing::info!("found {} users", found.len());

    let mut records = Vec::with_capacity(found.len());
    for user in &found {
        let mut record = flatten_user(user);
        record.set_str("id", user.id.as_str());

        if args.include_groups {
            let groups = users::list_user_group_ids(client, &user.id)
                .await
                .map_err(|e| e.during("failed to list users"))?;
            record.set_set("group_memberships", groups);
        }
        if args.include_roles {
            let roles = users::list_user_role_types(client, &user.id)
                .await
                .map_err(|e| e.during("failed to set user's admin roles"))?;
            record.set_set("admin_roles", roles);
        }
        records.push(record);
    }

    let mut fields = FlatRecord::new();
    fields.set("users", FieldValue::List(records));

    Ok(ReadResult {
        id: filters.synthetic_id(),
        fields,
    })
}
