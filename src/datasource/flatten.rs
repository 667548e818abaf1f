//! Flattening API records into output fields

use super::FlatRecord;
use crate::okta::models::{EmailTemplate, OpenIdConnectApplication, User, STATUS_ACTIVE};
use serde_json::{Map, Value};

/// Standard Okta profile attributes and their output field names
const PROFILE_ATTRIBUTES: &[(&str, &str)] = &[
    ("city", "city"),
    ("costCenter", "cost_center"),
    ("countryCode", "country_code"),
    ("department", "department"),
    ("displayName", "display_name"),
    ("division", "division"),
    ("email", "email"),
    ("employeeNumber", "employee_number"),
    ("firstName", "first_name"),
    ("honorificPrefix", "honorific_prefix"),
    ("honorificSuffix", "honorific_suffix"),
    ("lastName", "last_name"),
    ("locale", "locale"),
    ("login", "login"),
    ("manager", "manager"),
    ("managerId", "manager_id"),
    ("middleName", "middle_name"),
    ("mobilePhone", "mobile_phone"),
    ("nickName", "nick_name"),
    ("organization", "organization"),
    ("postalAddress", "postal_address"),
    ("preferredLanguage", "preferred_language"),
    ("primaryPhone", "primary_phone"),
    ("profileUrl", "profile_url"),
    ("secondEmail", "second_email"),
    ("state", "state"),
    ("streetAddress", "street_address"),
    ("timezone", "timezone"),
    ("title", "title"),
    ("userType", "user_type"),
    ("zipCode", "zip_code"),
];

/// Canonical JSON text of a value; absent values render as `null`
pub fn json_text(value: Option<&Value>) -> String {
    value.unwrap_or(&Value::Null).to_string()
}

/// Flatten an OAuth application
///
/// `client_secret` is the disambiguated current secret; `None` yields an
/// empty string.
pub fn flatten_app(app: &OpenIdConnectApplication, client_secret: Option<&str>) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.set_str("label", app.label.as_str());
    record.set_str("name", app.name.as_str());
    record.set_str("status", app.status.as_str());

    let visibility = app.visibility.clone().unwrap_or_default();
    let hide = visibility.hide.unwrap_or_default();
    record.set_bool("auto_submit_toolbar", visibility.auto_submit_toolbar);
    record.set_bool("hide_ios", hide.ios);
    record.set_bool("hide_web", hide.web);

    let oauth = app.settings.as_ref().and_then(|s| s.oauth_client.as_ref());
    let (mut grant_types, mut response_types) = (Vec::new(), Vec::new());
    let (mut redirect_uris, mut post_logout_redirect_uris) = (Vec::new(), Vec::new());

    if let Some(oauth) = oauth {
        record.set_opt_str("type", oauth.application_type.as_deref());
        record.set_opt_str("client_uri", oauth.client_uri.as_deref());
        record.set_opt_str("logo_uri", oauth.logo_uri.as_deref());
        record.set_opt_str("login_uri", oauth.initiate_login_uri.as_deref());
        record.set_opt_str("policy_uri", oauth.policy_uri.as_deref());
        record.set_opt_str("wildcard_redirect", oauth.wildcard_redirect.as_deref());

        let client_id = app
            .credentials
            .as_ref()
            .and_then(|c| c.oauth_client.as_ref())
            .and_then(|c| c.client_id.as_deref());
        record.set_opt_str("client_id", client_id);
        record.set_str("client_secret", client_secret.unwrap_or_default());

        grant_types.extend(oauth.grant_types.iter().cloned());
        response_types.extend(oauth.response_types.iter().cloned());
        redirect_uris.extend(oauth.redirect_uris.iter().cloned());
        post_logout_redirect_uris.extend(oauth.post_logout_redirect_uris.iter().cloned());

        if let Some(login) = &oauth.idp_initiated_login {
            record.set_opt_str("login_mode", login.mode.as_deref());
            record.set_set("login_scopes", login.default_scope.iter().cloned());
        }
    }

    record.set_set("grant_types", grant_types);
    record.set_set("response_types", response_types);
    record.set_set("redirect_uris", redirect_uris);
    record.set_set("post_logout_redirect_uris", post_logout_redirect_uris);
    record.set_str("links", json_text(app.links.as_ref()));
    record
}

/// Status as a data source reports it
///
/// Password-expired, recovering and locked-out users are still active
/// accounts.
pub fn map_user_status(status: &str) -> &str {
    match status {
        "PASSWORD_EXPIRED" | "RECOVERY" | "LOCKED_OUT" => STATUS_ACTIVE,
        other => other,
    }
}

fn profile_value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Flatten a user's profile and status
///
/// Attributes outside the standard profile are kept together as JSON text
/// in `custom_profile_attributes`.
pub fn flatten_user(user: &User) -> FlatRecord {
    let mut record = FlatRecord::new();
    let mut custom: Map<String, Value> = user.profile.clone();

    for (attribute, field) in PROFILE_ATTRIBUTES {
        if let Some(value) = custom.remove(*attribute) {
            if let Some(text) = profile_value_text(&value) {
                record.set_str(field, text);
            }
        }
    }

    record.set_str(
        "custom_profile_attributes",
        Value::Object(custom).to_string(),
    );
    record.set_str("status", map_user_status(&user.status));
    record.set_str("raw_status", user.status.as_str());
    record
}

/// Flatten a custom email template
pub fn flatten_email_template(template: &EmailTemplate) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.set_str("name", template.name.as_str());
    record.set_str("type", template.template_type.as_str());
    record.set_str("default_language", template.default_language.as_str());
    record.set_str("subject", template.subject.as_str());
    record.set_str("template", template.template.as_str());
    let translations = serde_json::to_value(&template.translations).unwrap_or(Value::Null);
    record.set_str("translations", translations.to_string());
    record
}
