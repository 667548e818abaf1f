//! Query parameters for Okta list endpoints

use url::form_urlencoded;

/// Default page size for user and group listings
pub const DEFAULT_PAGINATION_LIMIT: u32 = 200;

/// Name/value query clauses accepted by Okta list endpoints
///
/// Rendered with keys in sorted order so the same parameters always
/// produce the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub q: Option<String>,
    pub after: Option<String>,
    pub limit: Option<u32>,
    pub filter: Option<String>,
    pub search: Option<String>,
    pub sort_order: Option<String>,
}

impl QueryParams {
    /// Name/value pairs sorted by name, empty values skipped
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = [
            ("q", self.q.clone()),
            ("after", self.after.clone()),
            ("limit", self.limit.filter(|l| *l > 0).map(|l| l.to_string())),
            ("filter", self.filter.clone()),
            ("search", self.search.clone()),
            ("sortOrder", self.sort_order.clone()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
        .collect();

        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// Form-encoded query without the leading `?`
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.pairs() {
            serializer.append_pair(name, &value);
        }
        serializer.finish()
    }

    /// Canonical query string: `?` plus the encoded pairs, or empty
    pub fn to_query_string(&self) -> String {
        let encoded = self.encode();
        if encoded.is_empty() {
            encoded
        } else {
            format!("?{}", encoded)
        }
    }

    /// CRC-32 (IEEE) of the canonical query string, in decimal
    pub fn checksum(&self) -> String {
        crc32fast::hash(self.to_query_string().as_bytes()).to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_render_nothing() {
        let params = QueryParams::default();
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
    }

    #[test]
    fn test_keys_are_sorted_and_encoded() {
        let params = QueryParams {
            q: Some("Sample App".to_string()),
            limit: Some(1),
            filter: Some(r#"status eq "ACTIVE""#.to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.to_query_string(),
            "?filter=status+eq+%22ACTIVE%22&limit=1&q=Sample+App"
        );
    }

    #[test]
    fn test_zero_limit_is_omitted() {
        let params = QueryParams {
            limit: Some(0),
            sort_order: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(params.to_query_string(), "?sortOrder=0");
    }

    #[test]
    fn test_checksum_matches_crc32_of_query_string() {
        let params = QueryParams {
            search: Some(r#"profile.department eq "Engineering""#.to_string()),
            limit: Some(DEFAULT_PAGINATION_LIMIT),
            sort_order: Some("0".to_string()),
            ..Default::default()
        };
        let expected = crc32fast::hash(params.to_query_string().as_bytes());
        assert_eq!(params.checksum(), expected.to_string());
        assert_eq!(params.checksum(), params.clone().checksum());
    }

    #[test]
    fn test_crc32_is_ieee() {
        // Standard IEEE check value
        assert_eq!(crc32fast::hash(b"123456789"), 0xCBF4_3926);
    }
}
