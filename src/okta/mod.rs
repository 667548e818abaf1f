//! Okta API interaction module
//!
//! This module provides the HTTP plumbing for the Okta management API and
//! thin wrappers over the endpoints the lookups use.
//!
//! # Module Structure
//!
//! - [`client`] - Org-scoped client that builds URLs and decodes responses
//! - [`http`] - Request execution, authorization header, API error mapping
//! - [`pagination`] - `Link` header cursor following
//! - [`query`] - Canonical query-string construction
//! - [`models`] - Serde records for apps, users, secrets and templates
//! - [`apps`], [`users`], [`templates`] - Endpoint wrappers
//!
//! # Example
//!
//! ```ignore
//! use okta_lookup::okta::{apps, Authorization, OktaClient};
//!
//! async fn example() -> okta_lookup::Result<()> {
//!     let org = url::Url::parse("https://example.okta.com")?;
//!     let client = OktaClient::new(org, &Authorization::ApiToken("00abc".into()))?;
//!     let app = apps::get_application(&client, "0oa1abcd").await?;
//!     Ok(())
//! }
//! ```

pub mod apps;
pub mod client;
pub mod http;
pub mod models;
pub mod pagination;
pub mod query;
pub mod templates;
pub mod users;

pub use client::OktaClient;
pub use http::Authorization;
pub use query::QueryParams;
