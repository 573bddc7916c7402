//! reaper-filter Query Language
//!
//! This crate parses human-writable filter queries such as
//! `host is api.example.com AND (path contains api OR path contains auth)`
//! into `rf_core::Ruleset` trees.

pub mod reader;
pub mod alias;
pub mod parser;
pub mod error;
pub mod criteria;
pub mod scope;

pub use criteria::Criteria;
pub use error::ParseError;
pub use parser::parse_query;
pub use scope::Scope;
