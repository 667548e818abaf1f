//! Picking one record when a query can match several

use super::filter::AppFilters;
use crate::error::{Error, Result};
use crate::okta::models::{ClientSecret, OpenIdConnectApplication};
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

/// Pick the first application in server order
///
/// An exact-label lookup is re-checked locally because the server-side `q`
/// parameter also matches on prefix.
pub fn select_application(
    apps: Vec<OpenIdConnectApplication>,
    filters: &AppFilters,
) -> Result<OpenIdConnectApplication> {
    let count = apps.len();
    let Some(first) = apps.into_iter().next() else {
        return Err(Error::not_found(format!(
            "no OAuth application found with provided filter: {}",
            filters
        )));
    };

    if let Some(label) = filters.exact_label() {
        if first.label != label {
            return Err(Error::not_found(format!(
                "no OAuth application found with the provided label: {}",
                label
            )));
        }
    }

    if count > 1 {
        tracing::info!(
            "found {} OAuth applications with the criteria supplied, using the first one",
            count
        );
    }

    Ok(first)
}

/// Pick the current client secret
///
/// An app holds at most two secrets. When both are active the more recently
/// updated one wins; with none active there is no current secret.
pub fn select_client_secret(secrets: &[ClientSecret]) -> Option<&ClientSecret> {
    match secrets {
        [] => None,
        [only] => only.is_active().then_some(only),
        [first, second, ..] => match (first.is_active(), second.is_active()) {
            (true, true) => {
                if compare_timestamps(&second.last_updated, &first.last_updated)
                    == Ordering::Greater
                {
                    Some(second)
                } else {
                    Some(first)
                }
            }
            (true, false) => Some(first),
            (false, true) => Some(second),
            (false, false) => None,
        },
    }
}

/// Compare RFC 3339 timestamps, falling back to plain string order
fn compare_timestamps(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}
