//! HTTP utilities for Okta REST API calls

use super::pagination::next_page_link;
use crate::error::{Error, Result};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Credentials sent with every request
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Okta API token, sent as `SSWS <token>`
    ApiToken(String),
    /// OAuth 2.0 access token, sent as `Bearer <token>`
    AccessToken(String),
}

impl Authorization {
    fn header_value(&self) -> Result<HeaderValue> {
        let raw = match self {
            Authorization::ApiToken(token) => format!("SSWS {}", token),
            Authorization::AccessToken(token) => format!("Bearer {}", token),
        };
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|_| Error::config("token contains characters not allowed in a header"))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::ApiToken(_) => f.write_str("ApiToken(***)"),
            Authorization::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

/// Error body returned by the Okta API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OktaErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_summary: Option<String>,
}

/// A successful response: raw body plus the pagination cursor
#[derive(Debug)]
pub struct OktaResponse {
    pub status: StatusCode,
    pub next_page: Option<Url>,
    body: String,
}

impl OktaResponse {
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Decode the body; an empty body decodes as JSON `null`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.trim().is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// HTTP client wrapper for Okta API calls
#[derive(Clone)]
pub struct OktaHttpClient {
    client: Client,
    authorization: HeaderValue,
}

impl OktaHttpClient {
    /// Create a new HTTP client
    pub fn new(authorization: &Authorization) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("okta-lookup/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            authorization: authorization.header_value()?,
        })
    }

    /// Issue a request and return the body with its next-page link
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<OktaResponse> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let next_page = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(next_page_link);
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(api_error(status, &body));
        }

        Ok(OktaResponse {
            status,
            next_page,
            body,
        })
    }
}

fn api_error(status: StatusCode, body: &str) -> Error {
    let parsed: Option<OktaErrorBody> = serde_json::from_str(body).ok();
    let (code, summary) = match parsed {
        Some(OktaErrorBody {
            error_code,
            error_summary,
        }) => (error_code, error_summary),
        None => (None, None),
    };

    Error::Api {
        status,
        code,
        summary: summary.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        }),
    }
}
