//! Custom email template operations

use super::flatten::flatten_email_template;
use super::ReadResult;
use crate::error::Result;
use crate::okta::models::EmailTemplate;
use crate::okta::{templates, OktaClient};

fn to_result(template: EmailTemplate) -> ReadResult {
    ReadResult {
        fields: flatten_email_template(&template),
        id: template.id,
    }
}

pub async fn read_email_template(client: &OktaClient, id: &str) -> Result<ReadResult> {
    let template = templates::get_email_template(client, id)
        .await
        .map_err(|e| e.during("failed to get email template"))?;
    Ok(to_result(template))
}

pub async fn create_email_template(
    client: &OktaClient,
    template: &EmailTemplate,
) -> Result<ReadResult> {
    let created = templates::create_email_template(client, template, None)
        .await
        .map_err(|e| e.during("failed to create email template"))?;
    tracing::info!("created email template {}", created.id);
    Ok(to_result(created))
}

pub async fn update_email_template(
    client: &OktaClient,
    id: &str,
    template: &EmailTemplate,
) -> Result<ReadResult> {
    let updated = templates::update_email_template(client, id, template, None)
        .await
        .map_err(|e| e.during("failed to update email template"))?;
    Ok(to_result(updated))
}

/// Delete a template; one that is already gone counts as deleted
pub async fn delete_email_template(client: &OktaClient, id: &str) -> Result<()> {
    match templates::delete_email_template(client, id).await {
        Ok(()) => {
            tracing::info!("deleted email template {}", id);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            tracing::warn!("email template {} was already deleted", id);
            Ok(())
        }
        Err(e) => Err(e.during("failed to delete email template")),
    }
}
