//! Okta API records
//!
//! Only the fields the lookups read are modeled; unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Status value shared by apps, users and client secrets
pub const STATUS_ACTIVE: &str = "ACTIVE";

/// OpenID Connect application (`signOnMode: OPENID_CONNECT`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenIdConnectApplication {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub visibility: Option<AppVisibility>,
    #[serde(default)]
    pub settings: Option<AppSettings>,
    #[serde(default)]
    pub credentials: Option<AppCredentials>,
    #[serde(rename = "_links", default)]
    pub links: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVisibility {
    #[serde(default)]
    pub auto_submit_toolbar: bool,
    #[serde(default)]
    pub hide: Option<AppHide>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppHide {
    #[serde(rename = "iOS", default)]
    pub ios: bool,
    #[serde(default)]
    pub web: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub oauth_client: Option<OAuthClientSettings>,
}

/// OIDC client settings; Okta uses snake_case inside this object
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OAuthClientSettings {
    #[serde(default)]
    pub application_type: Option<String>,
    #[serde(default)]
    pub client_uri: Option<String>,
    #[serde(default)]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub initiate_login_uri: Option<String>,
    #[serde(default)]
    pub policy_uri: Option<String>,
    #[serde(default)]
    pub wildcard_redirect: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub post_logout_redirect_uris: Vec<String>,
    #[serde(default)]
    pub response_types: Vec<String>,
    #[serde(default)]
    pub grant_types: Vec<String>,
    #[serde(default)]
    pub idp_initiated_login: Option<IdpInitiatedLogin>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct IdpInitiatedLogin {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub default_scope: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCredentials {
    #[serde(default)]
    pub oauth_client: Option<OAuthClientCredentials>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OAuthClientCredentials {
    #[serde(default)]
    pub client_id: Option<String>,
}

/// One entry of `/apps/{id}/credentials/secrets`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecret {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "client_secret", default)]
    pub client_secret: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub created: String,
}

impl ClientSecret {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// User with its free-form profile
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub profile: Map<String, Value>,
}

/// Entry of `/users/{id}/groups`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Group {
    pub id: String,
}

/// Admin role assigned to a user
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Role {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub role_type: String,
}

/// Entry of `/apps/{id}/users` or `/apps/{id}/groups`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Assignment {
    pub id: String,
}

/// Custom email template
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub template_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_language: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, EmailTranslation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmailTranslation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
}
