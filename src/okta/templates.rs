//! Custom email template endpoints

use super::client::{segment, OktaClient};
use super::models::EmailTemplate;
use super::query::QueryParams;
use crate::error::{Error, Result};
use reqwest::Method;

const EMAIL_TEMPLATES_PATH: &str = "/api/v1/templates/emails";

fn template_path(id: &str) -> String {
    format!("{}/{}", EMAIL_TEMPLATES_PATH, segment(id))
}

/// A successful response must carry the template
fn require_body(template: Option<EmailTemplate>, action: &str) -> Result<EmailTemplate> {
    template.ok_or_else(|| {
        Error::Decode(serde::de::Error::custom(format!(
            "{} returned no email template",
            action
        )))
    })
}

pub async fn create_email_template(
    client: &OktaClient,
    body: &EmailTemplate,
    query: Option<&QueryParams>,
) -> Result<EmailTemplate> {
    let created = client
        .send_json(Method::POST, EMAIL_TEMPLATES_PATH, query, body)
        .await?;
    require_body(created, "create")
}

pub async fn update_email_template(
    client: &OktaClient,
    id: &str,
    body: &EmailTemplate,
    query: Option<&QueryParams>,
) -> Result<EmailTemplate> {
    let updated = client
        .send_json(Method::PUT, &template_path(id), query, body)
        .await?;
    require_body(updated, "update")
}

pub async fn get_email_template(client: &OktaClient, id: &str) -> Result<EmailTemplate> {
    let template = client.get_json(&template_path(id), None).await?;
    require_body(template, "get")
}

pub async fn delete_email_template(client: &OktaClient, id: &str) -> Result<()> {
    client.delete(&template_path(id)).await
}
