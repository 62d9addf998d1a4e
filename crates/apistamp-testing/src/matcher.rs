use super::server::RecordedRequest;
use http::Method;
use serde_json::Value;

/// Matcher for recorded requests
///
/// All configured criteria must hold. An empty matcher matches everything.
#[derive(Debug, Clone, Default)]
pub struct RequestMatcher {
    pub(crate) method: Option<Method>,
    pub(crate) path: Option<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body_json: Option<Value>,
    pub(crate) body_string: Option<String>,
}

impl RequestMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Match the path, without the query string
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Require query parameter `name` with `value` among its values
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Require header `name` with `value` among its values
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body_json(mut self, body: impl serde::Serialize) -> Self {
        self.body_json =
            Some(serde_json::to_value(body).expect("Failed to serialize body matcher"));
        self
    }

    pub fn body_string(mut self, body: impl Into<String>) -> Self {
        self.body_string = Some(body.into());
        self
    }

    /// Check a recorded request against this matcher
    pub fn matches(&self, request: &RecordedRequest) -> bool {
        if self.method.as_ref().is_some_and(|m| *m != request.method) {
            return false;
        }
        if self.path.as_deref().is_some_and(|p| p != request.path_only()) {
            return false;
        }

        let pairs = request.query_pairs();
        let query_ok = self
            .query
            .iter()
            .all(|(k, v)| pairs.iter().any(|(pk, pv)| pk == k && pv == v));
        if !query_ok {
            return false;
        }

        let headers_ok = self.headers.iter().all(|(k, v)| {
            request
                .headers
                .get_all(k.as_str())
                .iter()
                .any(|value| value == v.as_str())
        });
        if !headers_ok {
            return false;
        }

        if let Some(expected) = &self.body_json {
            match serde_json::from_slice::<Value>(&request.body) {
                Ok(actual) if &actual == expected => {}
                _ => return false,
            }
        }

        if let Some(expected) = &self.body_string {
            if std::str::from_utf8(&request.body).ok() != Some(expected.as_str()) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use bytes::Bytes;
    use http::HeaderMap;
    use proptest::prelude::*;

    fn recorded(method: Method, target: &str, headers: HeaderMap, body: &[u8]) -> RecordedRequest {
        RecordedRequest {
            method,
            path: target.to_string(),
            headers,
            body: Bytes::copy_from_slice(body),
        }
    }

    fn method_strategy() -> impl Strategy<Value = Method> {
        prop_oneof![
            Just(Method::GET),
            Just(Method::POST),
            Just(Method::PUT),
            Just(Method::DELETE),
            Just(Method::PATCH),
        ]
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop::string::string_regex("/[a-z]{3,8}(/[0-9]{1,5})?").unwrap()
    }

    fn version_strategy() -> impl Strategy<Value = String> {
        prop::string::string_regex("v?[0-9]{1,2}(\\.[0-9]{1,2})?").unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Empty matcher matches all requests
        #[test]
        fn prop_empty_matcher_matches_all(
            method in method_strategy(),
            path in path_strategy(),
            body in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let request = recorded(method, &path, HeaderMap::new(), &body);
            prop_assert!(RequestMatcher::new().matches(&request));
        }

        /// Path matching ignores the query string but is otherwise exact
        #[test]
        fn prop_path_ignores_query(
            path in path_strategy(),
            other in path_strategy(),
            version in version_strategy(),
        ) {
            let request = recorded(
                Method::GET,
                &format!("{}?api-version={}", path, version),
                HeaderMap::new(),
                b"",
            );

            prop_assert!(RequestMatcher::new().path(path.clone()).matches(&request));
            if path != other {
                prop_assert!(!RequestMatcher::new().path(other).matches(&request));
            }
        }

        /// Query matching finds a value among repeated parameters
        #[test]
        fn prop_query_param_among_repeats(
            path in path_strategy(),
            first in version_strategy(),
            second in version_strategy(),
        ) {
            let request = recorded(
                Method::GET,
                &format!("{}?v={}&v={}", path, first, second),
                HeaderMap::new(),
                b"",
            );

            prop_assert!(RequestMatcher::new().query_param("v", first.clone()).matches(&request));
            prop_assert!(RequestMatcher::new().query_param("v", second.clone()).matches(&request));
            prop_assert!(!RequestMatcher::new().query_param("version", first).matches(&request));
        }

        /// Header matching requires an exact value
        #[test]
        fn prop_header_exact(
            path in path_strategy(),
            version in version_strategy(),
            other in version_strategy(),
        ) {
            let mut headers = HeaderMap::new();
            headers.insert("x-api-version", version.parse().unwrap());
            let request = recorded(Method::GET, &path, headers, b"");

            prop_assert!(RequestMatcher::new().header("X-API-Version", version.clone()).matches(&request));
            if version != other {
                prop_assert!(!RequestMatcher::new().header("x-api-version", other).matches(&request));
            }

            let bare = recorded(Method::GET, &path, HeaderMap::new(), b"");
            prop_assert!(!RequestMatcher::new().header("x-api-version", version).matches(&bare));
        }

        /// JSON bodies compare by value, not by formatting
        #[test]
        fn prop_json_semantic(method in method_strategy(), path in path_strategy()) {
            let value = serde_json::json!({"name": "test", "id": 123});
            let matcher = RequestMatcher::new().body_json(value.clone());

            let compact = serde_json::to_vec(&value).unwrap();
            let pretty = serde_json::to_vec_pretty(&value).unwrap();

            prop_assert!(matcher.matches(&recorded(method.clone(), &path, HeaderMap::new(), &compact)));
            prop_assert!(matcher.matches(&recorded(method, &path, HeaderMap::new(), &pretty)));
        }
    }
}
