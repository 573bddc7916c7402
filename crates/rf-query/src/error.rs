//! Query parse errors.

use rf_core::JoinType;

/// Error raised while parsing a query string.
///
/// Messages are stable; callers show them to users as-is.
///
/// `InvalidComparison` carries the word that failed to resolve as a
/// comparison. Older front ends reported the target word there instead,
/// so matching on the payload of that variant is not portable to them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid target '{0}'")]
    InvalidTarget(String),
    #[error("invalid comparison '{0}'")]
    InvalidComparison(String),
    #[error("Expected either 'AND' or 'OR', found '{0}'")]
    ExpectedJoin(String),
    #[error("Cannot mix {first} and {second} without using brackets to group rules")]
    MixedJoin { first: JoinType, second: JoinType },
    #[error("missing closing ')' for group")]
    UnterminatedGroup,
}
