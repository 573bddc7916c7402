//! Include/exclude scopes built from queries.

use rf_core::Record;
use serde::{Deserialize, Serialize};

use crate::criteria::Criteria;
use crate::error::ParseError;

/// Interception scope.
///
/// A record is in scope when the include list is empty or any include
/// query matches it, and no exclude query matches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scope {
    pub include: Vec<Criteria>,
    pub exclude: Vec<Criteria>,
}

impl Scope {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: include.into_iter().map(Criteria::new).collect(),
            exclude: exclude.into_iter().map(Criteria::new).collect(),
        }
    }

    pub fn includes<R: Record + ?Sized>(&self, record: &R) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|c| c.matches(record));
        included && !self.exclude.iter().any(|c| c.matches(record))
    }

    /// Parse errors of member queries, paired with their raw text.
    pub fn parse_errors(&self) -> Vec<(&str, &ParseError)> {
        self.include
            .iter()
            .chain(&self.exclude)
            .filter_map(|c| c.parse_error().map(|e| (c.raw(), e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rf_core::HttpRequest;

    use super::*;

    fn get(url: &str) -> HttpRequest {
        HttpRequest::from_url("GET", url)
    }

    #[test]
    fn empty_scope_includes_everything() {
        let scope = Scope::default();
        assert!(scope.includes(&get("https://example.com/")));
    }

    #[test]
    fn any_include_matches() {
        let scope = Scope::new(["host is a.test", "host is b.test"], Vec::<String>::new());
        assert!(scope.includes(&get("https://a.test/")));
        assert!(scope.includes(&get("https://b.test/")));
        assert!(!scope.includes(&get("https://c.test/")));
    }

    #[test]
    fn exclude_wins_over_include() {
        let scope = Scope::new(["host is a.test"], ["path contains /static"]);
        assert!(scope.includes(&get("https://a.test/api")));
        assert!(!scope.includes(&get("https://a.test/static/app.js")));
        let exclude_only = Scope::new(Vec::<String>::new(), ["scheme is http"]);
        assert!(!exclude_only.includes(&get("http://a.test/")));
        assert!(exclude_only.includes(&get("https://a.test/")));
    }

    #[test]
    fn reports_member_parse_errors() {
        let scope = Scope::new(["host is a.test", "bogus"], ["path =>"]);
        let errors = scope.parse_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].0, "bogus");
        assert_eq!(errors[1].1.to_string(), "invalid comparison '=>'");
    }

    #[test]
    fn serializes_as_query_lists() {
        let scope: Scope = serde_json::from_str(r#"{"include":["host is a.test"]}"#).expect("scope decodes");
        assert_eq!(scope.include.len(), 1);
        assert!(scope.exclude.is_empty());
        let json = serde_json::to_string(&scope).expect("scope encodes");
        assert_eq!(json, r#"{"include":["host is a.test"],"exclude":[]}"#);
    }
}
