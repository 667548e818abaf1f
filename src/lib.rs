//! Read lookups against the Okta management API
//!
//! Each lookup resolves a set of mutually exclusive selectors into one
//! query, fetches (following pagination), picks a single record where the
//! query could match several, and flattens the API response into a flat
//! field mapping suitable as data-source state.

pub mod config;
pub mod datasource;
pub mod error;
pub mod okta;

pub use error::{format_okta_error, Error, Result};
