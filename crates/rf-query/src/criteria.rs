//! Top-level query object.

use std::fmt;

use rf_core::{Comparison, JoinType, Record, Rule, Ruleset, Target};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::parser::parse_query;

/// A parsed query string.
///
/// Construction never fails. When the query does not parse, the tree is
/// replaced by a single rule matching the whole raw query as a body
/// substring, and the error is kept for the caller to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Criteria {
    raw: String,
    root: Ruleset,
    parse_error: Option<ParseError>,
}

impl Criteria {
    pub fn new(input: impl Into<String>) -> Self {
        let raw = input.into();
        match parse_query(&raw) {
            Ok(root) => Self {
                raw,
                root,
                parse_error: None,
            },
            Err(e) => {
                log::debug!("query '{}' did not parse ({}), matching it as raw text", raw, e);
                Self {
                    root: fallback_ruleset(&raw),
                    raw,
                    parse_error: Some(e),
                }
            }
        }
    }

    /// The query exactly as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn root(&self) -> &Ruleset {
        &self.root
    }

    /// Error captured while parsing, if the fallback tree is in use.
    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.parse_error.is_none()
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.root.matches(record)
    }
}

fn fallback_ruleset(raw: &str) -> Ruleset {
    Ruleset::new(vec![Rule::new(Target::Body, Comparison::Contains, raw)], vec![], JoinType::And)
}

impl Default for Criteria {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for Criteria {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl From<String> for Criteria {
    fn from(input: String) -> Self {
        Self::new(input)
    }
}

impl From<Criteria> for String {
    fn from(criteria: Criteria) -> Self {
        criteria.raw
    }
}

/// Canonical rendering of the parsed tree. Fallback trees render the raw
/// query unchanged.
impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parse_error.is_some() {
            return f.write_str(&self.raw);
        }
        write!(f, "{}", self.root)
    }
}
