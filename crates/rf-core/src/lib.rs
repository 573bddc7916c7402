//! reaper-filter Core Library
//!
//! This crate provides the traffic record model and the rule tree that
//! query strings compile to. Parsing lives in `rf-query`; everything here
//! is a pure function of (tree, record) and never mutates the record.
//!
//! # Modules
//!
//! - `types`: Target, Comparison and JoinType with their alias tables
//! - `record`: Record traits and owned request/response records
//! - `url`: URL decomposition used to build records
//! - `rule`: Leaf predicate evaluation
//! - `ruleset`: AND/OR tree evaluation

pub mod types;
pub mod record;
pub mod url;
pub mod rule;
pub mod ruleset;

// Re-export commonly used types
pub use types::{Aliased, Comparison, JoinType, Target};
pub use record::{HttpRequest, HttpResponse, Record, ResponseRecord};
pub use rule::Rule;
pub use ruleset::Ruleset;
