//! Selector resolution
//!
//! Lookups accept several selectors of which exactly one may be given.
//! Resolution either yields a single canonical query or fails with a
//! configuration error.

use crate::error::{Error, Result};
use crate::okta::query::{QueryParams, DEFAULT_PAGINATION_LIMIT};
use std::fmt;
use std::str::FromStr;

const ACTIVE_STATUS_CLAUSE: &str = r#"status eq "ACTIVE""#;

/// Comparison operators accepted by the users search API
const SEARCH_OPERATORS: &[&str] = &["eq", "ne", "sw", "co", "pr", "gt", "ge", "lt", "le"];

/// Raw application selectors as supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct AppFilterInput {
    pub id: Option<String>,
    pub label: Option<String>,
    pub label_prefix: Option<String>,
    pub active_only: bool,
}

impl AppFilterInput {
    pub fn new() -> Self {
        Self {
            active_only: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSelector {
    Id(String),
    Label(String),
    LabelPrefix(String),
}

/// Resolved application filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFilters {
    pub selector: AppSelector,
    pub active_only: bool,
}

impl AppFilters {
    pub fn resolve(input: &AppFilterInput) -> Result<Self> {
        let given: Vec<(&str, &String)> = [
            ("id", input.id.as_ref()),
            ("label", input.label.as_ref()),
            ("label_prefix", input.label_prefix.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
        .collect();

        let selector = match given.as_slice() {
            [] => {
                return Err(Error::config(
                    "you must provide either label_prefix, id, or label for application search",
                ))
            }
            [("id", v)] => AppSelector::Id((*v).clone()),
            [("label", v)] => AppSelector::Label((*v).clone()),
            [(_, v)] => AppSelector::LabelPrefix((*v).clone()),
            many => {
                let names: Vec<&str> = many.iter().map(|(name, _)| *name).collect();
                return Err(Error::config(format!(
                    "conflicting selectors: {} are mutually exclusive",
                    names.join(", ")
                )));
            }
        };

        Ok(Self {
            selector,
            active_only: input.active_only,
        })
    }

    pub fn id(&self) -> Option<&str> {
        match &self.selector {
            AppSelector::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Label that the first result must match exactly
    pub fn exact_label(&self) -> Option<&str> {
        match &self.selector {
            AppSelector::Label(label) => Some(label),
            _ => None,
        }
    }

    /// Server-side status filter
    pub fn status_filter(&self) -> Option<&'static str> {
        self.active_only.then_some(ACTIVE_STATUS_CLAUSE)
    }

    /// List query, or `None` for a lookup by ID
    ///
    /// Only the first match is used, so a single result is requested.
    pub fn query(&self) -> Option<QueryParams> {
        let q = match &self.selector {
            AppSelector::Id(_) => return None,
            AppSelector::Label(q) | AppSelector::LabelPrefix(q) => q.clone(),
        };
        Some(QueryParams {
            q: Some(q),
            filter: self.status_filter().map(str::to_string),
            limit: Some(1),
            ..Default::default()
        })
    }
}

impl fmt::Display for AppFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            AppSelector::Id(id) => write!(f, "id: {}", id)?,
            AppSelector::Label(label) => write!(f, "label: {}", label)?,
            AppSelector::LabelPrefix(prefix) => write!(f, "label_prefix: {}", prefix)?,
        }
        if let Some(status) = self.status_filter() {
            write!(f, ", filter: {}", status)?;
        }
        Ok(())
    }
}

/// Boolean operator joining search clauses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompoundOperator {
    #[default]
    And,
    Or,
}

impl CompoundOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            CompoundOperator::And => "and",
            CompoundOperator::Or => "or",
        }
    }
}

impl fmt::Display for CompoundOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompoundOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "and" => Ok(CompoundOperator::And),
            "or" => Ok(CompoundOperator::Or),
            other => Err(Error::config(format!(
                "compound search operator must be one of [and, or], got {:?}",
                other
            ))),
        }
    }
}

/// One user search criterion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchClause {
    /// `name comparison "value"`
    Attribute {
        name: String,
        comparison: String,
        value: String,
    },
    /// Raw search expression used verbatim
    Expression(String),
}

impl SearchClause {
    pub fn eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        SearchClause::Attribute {
            name: name.into(),
            comparison: "eq".to_string(),
            value: value.into(),
        }
    }

    /// Reject clauses that would render an empty or dangling search term
    fn validate(&self) -> Result<()> {
        match self {
            SearchClause::Attribute {
                name, comparison, ..
            } if name.trim().is_empty() || comparison.trim().is_empty() => {
                Err(Error::config(format!(
                    "search clause {:?} needs an attribute name and comparison",
                    self.render()
                )))
            }
            SearchClause::Expression(expression) if expression.trim().is_empty() => {
                Err(Error::config("search expression must not be empty"))
            }
            _ => Ok(()),
        }
    }

    pub fn render(&self) -> String {
        match self {
            SearchClause::Attribute {
                name,
                comparison,
                value,
            } => format!(r#"{} {} "{}""#, name, comparison, value),
            SearchClause::Expression(expression) => expression.clone(),
        }
    }
}

impl FromStr for SearchClause {
    type Err = Error;

    /// Parses `name:comparison:value` or `name=value` (comparison `eq`)
    ///
    /// The colon form applies only when the comparison is a known search
    /// operator, so values holding `:` (URLs, ports) parse as `name=value`.
    fn from_str(s: &str) -> Result<Self> {
        if let Some((name, rest)) = s.split_once(':') {
            if let Some((comparison, value)) = rest.split_once(':') {
                if !name.is_empty()
                    && !name.contains('=')
                    && SEARCH_OPERATORS.contains(&comparison)
                {
                    return Ok(SearchClause::Attribute {
                        name: name.to_string(),
                        comparison: comparison.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }
        match s.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(SearchClause::eq(name, value)),
            _ => Err(Error::config(format!(
                "invalid search clause {:?}, expected name=value or name:comparison:value",
                s
            ))),
        }
    }
}

/// Raw user selectors as supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct UserFilterInput {
    pub group_id: Option<String>,
    pub search: Vec<SearchClause>,
    pub operator: CompoundOperator,
    pub active_only: bool,
}

impl UserFilterInput {
    pub fn new() -> Self {
        Self {
            active_only: true,
            ..Default::default()
        }
    }
}

/// Resolved user filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilters {
    Group(String),
    Search {
        clauses: Vec<SearchClause>,
        operator: CompoundOperator,
        active_only: bool,
    },
}

impl UserFilters {
    pub fn resolve(input: &UserFilterInput) -> Result<Self> {
        let group_id = input.group_id.as_deref().filter(|g| !g.is_empty());
        match (group_id, input.search.is_empty()) {
            (Some(_), false) => Err(Error::config(
                "conflicting selectors: group_id, search are mutually exclusive",
            )),
            (Some(group_id), true) => Ok(UserFilters::Group(group_id.to_string())),
            (None, false) => {
                for clause in &input.search {
                    clause.validate()?;
                }
                Ok(UserFilters::Search {
                    clauses: input.search.clone(),
                    operator: input.operator,
                    active_only: input.active_only,
                })
            }
            (None, true) => Err(Error::config(
                "must specify either group_id or search attributes",
            )),
        }
    }

    /// Search expression with clauses sorted and de-duplicated
    pub fn search_expression(&self) -> Option<String> {
        let UserFilters::Search {
            clauses,
            operator,
            active_only,
        } = self
        else {
            return None;
        };

        let mut unique: Vec<&SearchClause> = clauses.iter().collect();
        unique.sort_by_key(|c| c.render());
        unique.dedup_by_key(|c| c.render());

        // Raw expressions are parenthesized whenever another term joins them
        let grouped = *active_only || unique.len() > 1;
        let mut rendered: Vec<String> = unique
            .iter()
            .map(|clause| match clause {
                SearchClause::Expression(expression) if grouped => {
                    format!("({})", expression.trim())
                }
                other => other.render(),
            })
            .collect();
        rendered.sort();

        let joined = rendered.join(&format!(" {} ", operator));
        if !*active_only {
            return Some(joined);
        }
        if rendered.len() > 1 {
            Some(format!("({}) and {}", joined, ACTIVE_STATUS_CLAUSE))
        } else {
            Some(format!("{} and {}", joined, ACTIVE_STATUS_CLAUSE))
        }
    }

    /// Query for `/api/v1/users` or `/api/v1/groups/{id}/users`
    pub fn query(&self) -> QueryParams {
        match self {
            UserFilters::Group(_) => QueryParams {
                limit: Some(DEFAULT_PAGINATION_LIMIT),
                ..Default::default()
            },
            UserFilters::Search { .. } => QueryParams {
                search: self.search_expression(),
                limit: Some(DEFAULT_PAGINATION_LIMIT),
                sort_order: Some("0".to_string()),
                ..Default::default()
            },
        }
    }

    /// Stable identifier for the result set
    ///
    /// A group lookup is keyed by the group ID; a search by the checksum of
    /// its canonical query string.
    pub fn synthetic_id(&self) -> String {
        match self {
            UserFilters::Group(group_id) => group_id.clone(),
            UserFilters::Search { .. } => self.query().checksum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_input(id: Option<&str>, label: Option<&str>, prefix: Option<&str>) -> AppFilterInput {
        AppFilterInput {
            id: id.map(String::from),
            label: label.map(String::from),
            label_prefix: prefix.map(String::from),
            active_only: true,
        }
    }

    #[test]
    fn test_app_by_id_has_no_query() {
        let filters = AppFilters::resolve(&app_input(Some("0oa1"), None, None)).unwrap();
        assert_eq!(filters.id(), Some("0oa1"));
        assert!(filters.query().is_none());
    }

    #[test]
    fn test_app_by_label_queries_active_only() {
        let filters = AppFilters::resolve(&app_input(None, Some("Portal"), None)).unwrap();
        let query = filters.query().unwrap();
        assert_eq!(query.q.as_deref(), Some("Portal"));
        assert_eq!(query.filter.as_deref(), Some(r#"status eq "ACTIVE""#));
        assert_eq!(query.limit, Some(1));
        assert_eq!(filters.exact_label(), Some("Portal"));
    }

    #[test]
    fn test_app_prefix_without_status_filter() {
        let mut input = app_input(None, None, Some("Port"));
        input.active_only = false;
        let filters = AppFilters::resolve(&input).unwrap();
        let query = filters.query().unwrap();
        assert!(query.filter.is_none());
        assert!(filters.exact_label().is_none());
        assert_eq!(filters.to_string(), "label_prefix: Port");
    }

    #[test]
    fn test_app_conflicting_selectors() {
        let err = AppFilters::resolve(&app_input(Some("0oa1"), Some("Portal"), None)).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("id, label"));
    }

    #[test]
    fn test_app_missing_selector() {
        let err = AppFilters::resolve(&app_input(None, Some(""), None)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_search_clause_parsing() {
        assert_eq!(
            "profile.department=Engineering".parse::<SearchClause>().unwrap(),
            SearchClause::eq("profile.department", "Engineering")
        );
        assert_eq!(
            "profile.login:sw:jane".parse::<SearchClause>().unwrap(),
            SearchClause::Attribute {
                name: "profile.login".to_string(),
                comparison: "sw".to_string(),
                value: "jane".to_string(),
            }
        );
        assert!("no-separator".parse::<SearchClause>().is_err());
    }

    #[test]
    fn test_search_clause_value_with_colons() {
        assert_eq!(
            "profile.profileUrl=https://example.com:8443/x"
                .parse::<SearchClause>()
                .unwrap(),
            SearchClause::eq("profile.profileUrl", "https://example.com:8443/x")
        );
        assert_eq!(
            "profile.nickName=a:b:c".parse::<SearchClause>().unwrap(),
            SearchClause::eq("profile.nickName", "a:b:c")
        );
        assert!("profile.city:near:Paris".parse::<SearchClause>().is_err());
        assert_eq!(
            "profile.city:co:a:b".parse::<SearchClause>().unwrap(),
            SearchClause::Attribute {
                name: "profile.city".to_string(),
                comparison: "co".to_string(),
                value: "a:b".to_string(),
            }
        );
    }

    #[test]
    fn test_raw_expression_with_or_scoped_to_active() {
        let filters = UserFilters::resolve(&UserFilterInput {
            search: vec![SearchClause::Expression(
                r#"profile.department eq "Eng" or profile.department eq "Ops""#.to_string(),
            )],
            ..UserFilterInput::new()
        })
        .unwrap();
        assert_eq!(
            filters.search_expression().unwrap(),
            r#"(profile.department eq "Eng" or profile.department eq "Ops") and status eq "ACTIVE""#
        );
    }

    #[test]
    fn test_raw_expression_joined_with_attribute() {
        let filters = UserFilters::resolve(&UserFilterInput {
            search: vec![
                SearchClause::eq("profile.city", "Paris"),
                SearchClause::Expression(
                    r#"profile.department eq "Eng" or profile.department eq "Ops""#.to_string(),
                ),
            ],
            ..UserFilterInput::new()
        })
        .unwrap();
        assert_eq!(
            filters.search_expression().unwrap(),
            r#"((profile.department eq "Eng" or profile.department eq "Ops") and profile.city eq "Paris") and status eq "ACTIVE""#
        );
    }

    #[test]
    fn test_empty_search_clauses_rejected() {
        for clause in [
            SearchClause::Expression(String::new()),
            SearchClause::Expression("   ".to_string()),
            SearchClause::eq("", "Paris"),
        ] {
            let err = UserFilters::resolve(&UserFilterInput {
                search: vec![SearchClause::eq("profile.city", "Paris"), clause],
                ..UserFilterInput::new()
            })
            .unwrap_err();
            assert!(err.is_config());
        }
    }

    #[test]
    fn test_search_expression_sorted_and_scoped_to_active() {
        let filters = UserFilters::resolve(&UserFilterInput {
            search: vec![
                SearchClause::eq("profile.lastName", "Doe"),
                SearchClause::eq("profile.firstName", "Jane"),
            ],
            operator: CompoundOperator::Or,
            active_only: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            filters.search_expression().unwrap(),
            r#"(profile.firstName eq "Jane" or profile.lastName eq "Doe") and status eq "ACTIVE""#
        );
    }

    #[test]
    fn test_search_expression_raw() {
        let filters = UserFilters::resolve(&UserFilterInput {
            search: vec![SearchClause::Expression(
                r#"profile.department eq "Engineering""#.to_string(),
            )],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            filters.search_expression().unwrap(),
            r#"profile.department eq "Engineering""#
        );
        let query = filters.query();
        assert_eq!(query.limit, Some(DEFAULT_PAGINATION_LIMIT));
        assert_eq!(query.sort_order.as_deref(), Some("0"));
    }

    #[test]
    fn test_group_and_search_conflict() {
        let err = UserFilters::resolve(&UserFilterInput {
            group_id: Some("00g1".to_string()),
            search: vec![SearchClause::eq("profile.email", "a@example.com")],
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_no_user_selector() {
        let err = UserFilters::resolve(&UserFilterInput::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: must specify either group_id or search attributes"
        );
    }

    #[test]
    fn test_group_synthetic_id_is_group_id() {
        let filters = UserFilters::resolve(&UserFilterInput {
            group_id: Some("00g1".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filters.synthetic_id(), "00g1");
        assert!(filters.search_expression().is_none());
    }

    #[test]
    fn test_compound_operator_parse() {
        assert_eq!("or".parse::<CompoundOperator>().unwrap(), CompoundOperator::Or);
        assert!("xor".parse::<CompoundOperator>().is_err());
    }
}
