//! Okta Client
//!
//! Main client for the Okta management API, combining the org URL,
//! credentials and HTTP functionality. Every operation in this crate takes
//! a client explicitly; there is no process-wide handle.

use super::http::{Authorization, OktaHttpClient};
use super::pagination;
use super::query::QueryParams;
use crate::error::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Main Okta client
#[derive(Clone)]
pub struct OktaClient {
    pub(crate) http: OktaHttpClient,
    org_url: Url,
}

impl OktaClient {
    /// Create a new client for the org at `org_url`
    pub fn new(org_url: Url, authorization: &Authorization) -> Result<Self> {
        let http = OktaHttpClient::new(authorization)?;
        Ok(Self { http, org_url })
    }

    pub fn org_url(&self) -> &Url {
        &self.org_url
    }

    /// Build an API URL from a path below the org and optional query
    pub fn api_url(&self, path: &str, query: Option<&QueryParams>) -> Result<Url> {
        let mut url = self.org_url.join(path)?;
        match query.map(QueryParams::encode) {
            Some(encoded) if !encoded.is_empty() => url.set_query(Some(&encoded)),
            _ => url.set_query(None),
        }
        Ok(url)
    }

    /// GET a single JSON document
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&QueryParams>,
    ) -> Result<T> {
        let url = self.api_url(path, query)?;
        self.http.execute(Method::GET, url, None).await?.json()
    }

    /// GET a list endpoint and follow every page
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&QueryParams>,
    ) -> Result<Vec<T>> {
        let url = self.api_url(path, query)?;
        pagination::collect_all(self, url).await
    }

    /// Send a JSON body and decode the JSON response
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParams>,
        body: &B,
    ) -> Result<T> {
        let url = self.api_url(path, query)?;
        let body = serde_json::to_value(body)?;
        self.http.execute(method, url, Some(&body)).await?.json()
    }

    /// DELETE a resource, ignoring any response body
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.api_url(path, None)?;
        self.http.execute(Method::DELETE, url, None).await?;
        Ok(())
    }
}

/// Percent-encode a single path segment such as an application ID
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
