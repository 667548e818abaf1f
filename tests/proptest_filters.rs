//! Property-based tests using proptest
//!
//! These tests verify selector resolution, synthetic IDs, client-secret
//! selection and flattening using randomized inputs.

use okta_lookup::datasource::disambiguate::select_client_secret;
use okta_lookup::datasource::filter::{
    AppFilterInput, AppFilters, CompoundOperator, SearchClause, UserFilterInput, UserFilters,
};
use okta_lookup::datasource::flatten::flatten_app;
use okta_lookup::okta::models::{ClientSecret, OpenIdConnectApplication};
use okta_lookup::okta::pagination::next_page_link;
use okta_lookup::okta::QueryParams;
use proptest::prelude::*;
use serde_json::json;

/// Generate a non-empty selector value
fn arb_selector_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 _-]{0,30}"
}

/// Generate a search clause on a profile attribute
fn arb_clause() -> impl Strategy<Value = SearchClause> {
    (
        prop_oneof!["profile.department", "profile.city", "profile.login", "status"],
        prop_oneof!["eq", "sw", "co"],
        "[A-Za-z0-9@. ]{1,20}",
    )
        .prop_map(|(name, comparison, value)| SearchClause::Attribute {
            name: name.to_string(),
            comparison: comparison.to_string(),
            value,
        })
}

fn arb_operator() -> impl Strategy<Value = CompoundOperator> {
    prop_oneof![Just(CompoundOperator::And), Just(CompoundOperator::Or)]
}

/// Generate an RFC 3339 timestamp in 2023
fn arb_timestamp() -> impl Strategy<Value = String> {
    (1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(month, day, hour, minute)| {
        format!("2023-{:02}-{:02}T{:02}:{:02}:00.000Z", month, day, hour, minute)
    })
}

/// Generate a client secret with a random status
fn arb_secret() -> impl Strategy<Value = ClientSecret> {
    (
        "ocs[a-z0-9]{6}",
        prop_oneof!["ACTIVE", "INACTIVE"],
        "[A-Za-z0-9]{16}",
        arb_timestamp(),
    )
        .prop_map(|(id, status, secret, last_updated)| ClientSecret {
            id,
            status: status.to_string(),
            client_secret: secret,
            last_updated,
            created: "2023-01-01T00:00:00.000Z".to_string(),
        })
}

fn search_filters(clauses: Vec<SearchClause>, operator: CompoundOperator) -> UserFilters {
    UserFilters::resolve(&UserFilterInput {
        search: clauses,
        operator,
        ..UserFilterInput::new()
    })
    .unwrap()
}

fn app_with(redirect_uris: Vec<String>, grant_types: Vec<String>) -> OpenIdConnectApplication {
    serde_json::from_value(json!({
        "id": "0oa1",
        "name": "oidc_client",
        "label": "Portal",
        "status": "ACTIVE",
        "settings": {"oauthClient": {
            "redirect_uris": redirect_uris,
            "grant_types": grant_types
        }},
        "credentials": {"oauthClient": {"client_id": "abc"}}
    }))
    .unwrap()
}

proptest! {
    /// Any two or more application selectors are rejected
    #[test]
    fn test_multiple_app_selectors_rejected(
        id in proptest::option::of(arb_selector_value()),
        label in proptest::option::of(arb_selector_value()),
        label_prefix in proptest::option::of(arb_selector_value()),
        active_only in any::<bool>(),
    ) {
        let given = [&id, &label, &label_prefix].iter().filter(|v| v.is_some()).count();
        let input = AppFilterInput { id, label, label_prefix, active_only };
        let resolved = AppFilters::resolve(&input);

        if given == 1 {
            prop_assert!(resolved.is_ok());
        } else {
            prop_assert!(resolved.unwrap_err().is_config());
        }
    }

    /// Label queries always ask for a single result
    #[test]
    fn test_label_query_limit_one(label in arb_selector_value(), active_only in any::<bool>()) {
        let input = AppFilterInput { label: Some(label.clone()), active_only, ..Default::default() };
        let query = AppFilters::resolve(&input).unwrap().query().unwrap();

        prop_assert_eq!(query.limit, Some(1));
        prop_assert_eq!(query.q, Some(label));
        prop_assert_eq!(query.filter.is_some(), active_only);
    }

    /// The synthetic ID does not depend on clause order or repetition
    #[test]
    fn test_checksum_invariant_under_permutation(
        (clauses, shuffled) in prop::collection::vec(arb_clause(), 1..6)
            .prop_flat_map(|clauses| (Just(clauses.clone()), Just(clauses).prop_shuffle())),
        operator in arb_operator(),
    ) {
        let mut repeated = shuffled.clone();
        repeated.extend(shuffled.iter().take(1).cloned());

        let original = search_filters(clauses, operator).synthetic_id();
        prop_assert_eq!(&original, &search_filters(shuffled, operator).synthetic_id());
        prop_assert_eq!(&original, &search_filters(repeated, operator).synthetic_id());
    }

    /// Raw expressions keep their own `or` away from the status clause
    #[test]
    fn test_raw_expression_grouped_under_active_only(
        left in arb_clause(),
        right in arb_clause(),
        extra in proptest::option::of(arb_clause()),
        operator in arb_operator(),
    ) {
        let raw = format!("{} or {}", left.render(), right.render());
        let mut clauses = vec![SearchClause::Expression(raw.clone())];
        clauses.extend(extra);
        let expression = search_filters(clauses, operator).search_expression().unwrap();

        let grouped = format!("({})", raw);
        prop_assert!(expression.contains(&grouped));
        prop_assert!(expression.ends_with(r#") and status eq "ACTIVE""#));
        prop_assert!(expression.starts_with('('));
    }

    /// Different searches produce different IDs
    #[test]
    fn test_checksum_distinguishes_values(a in "[a-z]{1,12}", b in "[a-z]{1,12}") {
        prop_assume!(a != b);
        let first = search_filters(vec![SearchClause::eq("profile.department", a)], CompoundOperator::And);
        let second = search_filters(vec![SearchClause::eq("profile.department", b)], CompoundOperator::And);
        prop_assert_ne!(first.synthetic_id(), second.synthetic_id());
    }

    /// Query strings are rendered with keys in sorted order
    #[test]
    fn test_query_pairs_sorted(
        q in proptest::option::of("[a-z ]{1,10}"),
        search in proptest::option::of("[a-z ]{1,10}"),
        limit in proptest::option::of(0u32..500),
        after in proptest::option::of("[a-z0-9]{1,10}"),
    ) {
        let params = QueryParams { q, search, limit, after, ..Default::default() };
        let names: Vec<&str> = params.pairs().iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        prop_assert_eq!(names, sorted);
        prop_assert_eq!(params.is_empty(), params.to_query_string().is_empty());
    }

    /// The selected secret is active and one of the first two
    #[test]
    fn test_selected_secret_is_active(secrets in prop::collection::vec(arb_secret(), 0..4)) {
        let candidates: Vec<&ClientSecret> = secrets.iter().take(2).collect();
        match select_client_secret(&secrets) {
            Some(selected) => {
                prop_assert!(selected.is_active());
                prop_assert!(candidates.iter().any(|c| std::ptr::eq(*c, selected)));
            }
            None => prop_assert!(candidates.iter().all(|c| !c.is_active())),
        }
    }

    /// With two active secrets the selection is never older than the other
    #[test]
    fn test_two_active_secrets_pick_latest(mut first in arb_secret(), mut second in arb_secret()) {
        first.status = "ACTIVE".to_string();
        second.status = "ACTIVE".to_string();
        let secrets = vec![first, second];
        let selected = select_client_secret(&secrets).unwrap();

        let other = if std::ptr::eq(selected, &secrets[0]) { &secrets[1] } else { &secrets[0] };
        prop_assert!(selected.last_updated >= other.last_updated);
        if secrets[0].last_updated == secrets[1].last_updated {
            prop_assert!(std::ptr::eq(selected, &secrets[0]));
        }
    }

    /// Flattening is deterministic and ignores the order of repeated values
    #[test]
    fn test_flatten_app_deterministic(
        (uris, shuffled) in prop::collection::vec("https://[a-z]{1,8}\\.example\\.com/cb", 0..6)
            .prop_flat_map(|uris| (Just(uris.clone()), Just(uris).prop_shuffle())),
        secret in proptest::option::of("[A-Za-z0-9]{8}"),
    ) {
        let grants = vec!["authorization_code".to_string(), "refresh_token".to_string()];
        let mut reversed_grants = grants.clone();
        reversed_grants.reverse();

        let a = flatten_app(&app_with(uris, grants), secret.as_deref());
        let b = flatten_app(&app_with(shuffled, reversed_grants), secret.as_deref());

        prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        prop_assert_eq!(a.get_str("client_secret"), Some(secret.as_deref().unwrap_or("")));
    }

    /// The next-page cursor survives Link header parsing
    #[test]
    fn test_next_link_cursor(cursor in "[A-Za-z0-9]{1,20}", limit in 1u32..=200) {
        let header = format!(
            r#"<https://example.okta.com/api/v1/users?limit={limit}>; rel="self", <https://example.okta.com/api/v1/users?after={cursor}&limit={limit}>; rel="next""#
        );
        let next = next_page_link(&header).unwrap();
        let after = next
            .query_pairs()
            .find(|(name, _)| name == "after")
            .map(|(_, value)| value.into_owned());
        prop_assert_eq!(after, Some(cursor));
    }
}
