//! Core type definitions for reaper-filter
//!
//! The three closed enumerations of the query language and the alias
//! tables that give each variant its human-writable spellings.

use std::fmt;

use serde::Serialize;

// =============================================================================
// Alias Tables
// =============================================================================

/// An enumeration whose variants can be written in a query under one or
/// more case-insensitive aliases.
pub trait Aliased: Copy + PartialEq + 'static {
    /// Variant to alias mapping, in resolution order.
    const ALIASES: &'static [(Self, &'static [&'static str])];

    /// Aliases accepted for this variant.
    fn aliases(self) -> &'static [&'static str] {
        Self::ALIASES
            .iter()
            .find(|(variant, _)| *variant == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }
}

// =============================================================================
// Target
// =============================================================================

/// Field of a traffic record inspected by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// URL scheme (http, https, ...)
    Scheme,
    /// Request host, without port
    Host,
    /// URL path
    Path,
    /// Query string, without the leading '?'
    Query,
    /// Raw request body
    Body,
    /// HTTP method, compared case-insensitively
    Method,
    /// Status code of the attached response
    Status,
    /// Membership in the request or response tag sets
    Tag,
}

impl Target {
    /// Canonical keyword for the target.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheme => "scheme",
            Self::Host => "host",
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
            Self::Method => "method",
            Self::Status => "status",
            Self::Tag => "tag",
        }
    }
}

impl Aliased for Target {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (Self::Scheme, &["scheme", "protocol", "proto"]),
        (Self::Host, &["hostname", "host", "domain"]),
        (Self::Path, &["path"]),
        (Self::Query, &["querystring", "query", "qs"]),
        (Self::Body, &["body", "raw", "content"]),
        (Self::Method, &["method", "verb"]),
        (Self::Status, &["statuscode", "status", "code"]),
        (Self::Tag, &["tags", "tag"]),
    ];
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// Operator applied between the selected field and a rule's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Exact string equality
    Equal,
    /// String inequality
    NotEqual,
    /// Substring test
    Contains,
    /// Regular expression search anywhere in the field
    Matches,
}

impl Comparison {
    /// Whether a hit on this comparison is a positive verdict.
    ///
    /// Only `NotEqual` is negative.
    pub fn is_positive(self) -> bool {
        !matches!(self, Self::NotEqual)
    }
}

impl Aliased for Comparison {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (Self::Equal, &["eq", "==", "is"]),
        (Self::NotEqual, &["neq", "!="]),
        (Self::Contains, &["contains", "includes", "has", "*="]),
        (Self::Matches, &["matches", "~"]),
    ];
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Contains => "contains",
            Self::Matches => "matches",
        })
    }
}

// =============================================================================
// Join Type
// =============================================================================

/// How sibling clauses of one grouping combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    /// Not yet established; evaluates as `And`
    #[default]
    None,
    And,
    Or,
}

impl JoinType {
    /// `None` normalized to `And`.
    pub fn normalized(self) -> Self {
        match self {
            Self::None => Self::And,
            other => other,
        }
    }
}

impl Aliased for JoinType {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (Self::And, &["and", "&&"]),
        (Self::Or, &["or", "||"]),
    ];
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}
