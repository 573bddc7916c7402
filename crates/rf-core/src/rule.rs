//! Leaf predicate of a query tree.

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;

use crate::record::Record;
use crate::types::{Comparison, Target};

/// A single `<target> <comparison> <value>` predicate.
///
/// Rules are immutable once built. The regular expression behind a
/// `Matches` comparison is compiled on first use and cached, including
/// the outcome of a pattern that does not compile.
#[derive(Clone, Serialize)]
pub struct Rule {
    target: Target,
    comparison: Comparison,
    value: String,
    #[serde(skip)]
    pattern: OnceCell<Option<Regex>>,
}

impl Rule {
    pub fn new(target: Target, comparison: Comparison, value: impl Into<String>) -> Self {
        Self {
            target,
            comparison,
            value: value.into(),
            pattern: OnceCell::new(),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Evaluate the rule against one record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let field: Cow<'_, str> = match self.target {
            Target::Scheme => Cow::Borrowed(record.scheme()),
            Target::Host => Cow::Borrowed(record.host()),
            Target::Path => Cow::Borrowed(record.path()),
            Target::Query => Cow::Borrowed(record.query_string()),
            Target::Body => Cow::Borrowed(record.body()),
            Target::Method => Cow::Owned(record.method().to_lowercase()),
            Target::Status => match record.response() {
                Some(response) => Cow::Owned(response.status_code().to_string()),
                None => Cow::Borrowed(""),
            },
            Target::Tag => return self.matches_tag(record),
        };

        let value = self.comparable_value();
        match self.comparison {
            Comparison::Equal => field == value,
            Comparison::NotEqual => field != value,
            Comparison::Contains => field.contains(&*value),
            Comparison::Matches => match self.compiled_pattern() {
                Some(re) => re.is_match(&field),
                None => false,
            },
        }
    }

    /// Tag rules test membership of the value in the request tags, then
    /// in the response tags. Positive comparisons hold when the tag is
    /// present in either set; `NotEqual` holds when it is in neither.
    fn matches_tag<R: Record + ?Sized>(&self, record: &R) -> bool {
        let in_request = record.tags().iter().any(|tag| *tag == self.value);
        let present = in_request
            || record
                .response()
                .is_some_and(|response| response.tags().iter().any(|tag| *tag == self.value));
        present == self.comparison.is_positive()
    }

    fn comparable_value(&self) -> Cow<'_, str> {
        match self.target {
            Target::Method => Cow::Owned(self.value.to_lowercase()),
            _ => Cow::Borrowed(&self.value),
        }
    }

    fn compiled_pattern(&self) -> Option<&Regex> {
        self.pattern
            .get_or_init(|| match Regex::new(&self.comparable_value()) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::debug!("pattern '{}' does not compile, rule never matches: {}", self.value, e);
                    None
                }
            })
            .as_ref()
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.comparison == other.comparison && self.value == other.value
    }
}

impl Eq for Rule {}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("target", &self.target)
            .field("comparison", &self.comparison)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.target, self.comparison)?;
        write_value(f, &self.value)
    }
}

/// Write a value so the query reader reads it back unchanged.
///
/// Bare words end at whitespace or `)`, so only those, an empty value
/// and a leading quote force quoting. There is no escape syntax: a value
/// that needs quoting and holds both quote characters cannot come out of
/// the parser, and is written in single quotes as-is.
fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let needs_quotes = value.is_empty()
        || value.starts_with(['"', '\''])
        || value.chars().any(|c| c.is_whitespace() || c == ')');
    if !needs_quotes {
        return f.write_str(value);
    }
    let quote = if value.contains('"') { '\'' } else { '"' };
    write!(f, "{quote}{value}{quote}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{HttpRequest, HttpResponse};

    fn request() -> HttpRequest {
        HttpRequest::from_url("GET", "https://api.example.com/v1/users?id=7")
            .with_body("{\"name\":\"alice\"}")
    }

    #[test]
    fn compares_url_fields() {
        let req = request();
        assert!(Rule::new(Target::Scheme, Comparison::Equal, "https").matches(&req));
        assert!(Rule::new(Target::Host, Comparison::NotEqual, "example.com").matches(&req));
        assert!(Rule::new(Target::Path, Comparison::Contains, "users").matches(&req));
        assert!(Rule::new(Target::Query, Comparison::Equal, "id=7").matches(&req));
        assert!(Rule::new(Target::Body, Comparison::Contains, "alice").matches(&req));
        assert!(!Rule::new(Target::Path, Comparison::Equal, "/v1").matches(&req));
    }

    #[test]
    fn method_is_case_insensitive() {
        let req = request();
        assert!(Rule::new(Target::Method, Comparison::Equal, "get").matches(&req));
        assert!(Rule::new(Target::Method, Comparison::Equal, "Get").matches(&req));
        assert!(Rule::new(Target::Method, Comparison::Matches, "^G").matches(&req));
        assert!(!Rule::new(Target::Method, Comparison::NotEqual, "GET").matches(&req));
        // the stored value is never rewritten
        let rule = Rule::new(Target::Method, Comparison::Equal, "POST");
        assert!(!rule.matches(&req));
        assert_eq!(rule.value(), "POST");
    }

    #[test]
    fn status_reads_attached_response() {
        let req = request();
        assert!(!Rule::new(Target::Status, Comparison::Equal, "200").matches(&req));
        assert!(Rule::new(Target::Status, Comparison::Equal, "").matches(&req));

        let req = req.with_response(HttpResponse::new(404));
        assert!(Rule::new(Target::Status, Comparison::Equal, "404").matches(&req));
        assert!(Rule::new(Target::Status, Comparison::Matches, "^4\\d\\d$").matches(&req));
    }

    #[test]
    fn matches_searches_anywhere() {
        let req = request();
        assert!(Rule::new(Target::Path, Comparison::Matches, "v[0-9]").matches(&req));
        assert!(!Rule::new(Target::Path, Comparison::Matches, "^users").matches(&req));
    }

    #[test]
    fn invalid_pattern_never_matches() {
        let req = request();
        let rule = Rule::new(Target::Path, Comparison::Matches, "(unclosed");
        assert!(!rule.matches(&req));
        assert!(!rule.matches(&req));
    }

    #[test]
    fn tag_membership_across_request_and_response() {
        let req = request()
            .with_tags(["auth"])
            .with_response(HttpResponse::new(200).with_tags(["json"]));

        assert!(Rule::new(Target::Tag, Comparison::Equal, "auth").matches(&req));
        assert!(Rule::new(Target::Tag, Comparison::Contains, "json").matches(&req));
        assert!(!Rule::new(Target::Tag, Comparison::Equal, "xml").matches(&req));

        assert!(!Rule::new(Target::Tag, Comparison::NotEqual, "auth").matches(&req));
        assert!(!Rule::new(Target::Tag, Comparison::NotEqual, "json").matches(&req));
        assert!(Rule::new(Target::Tag, Comparison::NotEqual, "xml").matches(&req));
    }

    #[test]
    fn tag_without_response() {
        let req = request();
        assert!(!Rule::new(Target::Tag, Comparison::Equal, "auth").matches(&req));
        assert!(Rule::new(Target::Tag, Comparison::NotEqual, "auth").matches(&req));
    }

    #[test]
    fn equality_ignores_pattern_cache() {
        let a = Rule::new(Target::Path, Comparison::Matches, "a+");
        let b = a.clone();
        assert!(!a.matches(&request()));
        assert_eq!(a, b);
    }

    #[test]
    fn display_quotes_when_needed() {
        assert_eq!(Rule::new(Target::Host, Comparison::Equal, "example.com").to_string(), "host == example.com");
        assert_eq!(Rule::new(Target::Path, Comparison::Equal, "/a/b c").to_string(), "path == \"/a/b c\"");
        assert_eq!(Rule::new(Target::Body, Comparison::Contains, "say \"hi\"").to_string(), "body contains 'say \"hi\"'");
        assert_eq!(Rule::new(Target::Query, Comparison::NotEqual, "").to_string(), "query != \"\"");
        assert_eq!(Rule::new(Target::Path, Comparison::Equal, "/a)").to_string(), "path == \"/a)\"");
        assert_eq!(Rule::new(Target::Body, Comparison::Equal, "'x").to_string(), "body == \"'x\"");
    }

    #[test]
    fn inner_quotes_stay_bare() {
        assert_eq!(Rule::new(Target::Body, Comparison::Contains, "x\"y'z").to_string(), "body contains x\"y'z");
        assert_eq!(Rule::new(Target::Path, Comparison::Contains, "f(x)").to_string(), "path contains \"f(x)\"");
        assert_eq!(Rule::new(Target::Path, Comparison::Contains, "f(x").to_string(), "path contains f(x");
    }

    #[test]
    fn serializes_without_cache() {
        let rule = Rule::new(Target::Status, Comparison::NotEqual, "500");
        let json = serde_json::to_string(&rule).expect("rule serializes");
        assert_eq!(json, r#"{"target":"status","comparison":"notequal","value":"500"}"#);
    }
}
