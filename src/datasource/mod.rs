//! Data source reads
//!
//! Each read resolves its selectors, fetches from Okta, picks one record
//! where several could match and flattens the result into a [`FlatRecord`].
//!
//! # Architecture
//!
//! - [`filter`] - Turns mutually exclusive selectors into one query
//! - [`disambiguate`] - First-match and client-secret tie-break rules
//! - [`flatten`] - API records to flat field mappings
//! - [`app_oauth`], [`users`], [`email_template`] - The read operations

pub mod app_oauth;
pub mod disambiguate;
pub mod email_template;
pub mod filter;
pub mod flatten;
pub mod users;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub use app_oauth::{read_app_oauth, AppOauthArgs};
pub use email_template::read_email_template;
pub use users::{read_users, UsersArgs};

/// Value of one output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    /// Repeated values where order carries no meaning
    Set(BTreeSet<String>),
    List(Vec<FlatRecord>),
}

/// Flat mapping of field name to value, keys kept sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlatRecord(BTreeMap<String, FieldValue>);

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: FieldValue) {
        self.0.insert(key.to_string(), value);
    }

    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.set(key, FieldValue::String(value.into()));
    }

    /// Set `key` only when a value is present
    pub fn set_opt_str(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.set_str(key, value);
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, FieldValue::Bool(value));
    }

    pub fn set_set<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(key, FieldValue::Set(values.into_iter().map(Into::into).collect()));
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(FieldValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_set(&self, key: &str) -> Option<&BTreeSet<String>> {
        match self.0.get(key) {
            Some(FieldValue::Set(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Observed state produced by one read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadResult {
    pub id: String,
    #[serde(flatten)]
    pub fields: FlatRecord,
}
