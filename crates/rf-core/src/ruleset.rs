//! Boolean tree node combining rules and nested rulesets.

use std::fmt;

use serde::Serialize;

use crate::record::Record;
use crate::rule::Rule;
use crate::types::JoinType;

/// An n-ary AND/OR node.
///
/// Direct rules are evaluated before nested rulesets, each in
/// declaration order. An empty AND node is true, an empty OR node false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ruleset {
    rules: Vec<Rule>,
    rulesets: Vec<Ruleset>,
    join: JoinType,
}

impl Ruleset {
    pub fn new(rules: Vec<Rule>, rulesets: Vec<Ruleset>, join: JoinType) -> Self {
        Self { rules, rulesets, join }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rulesets(&self) -> &[Ruleset] {
        &self.rulesets
    }

    pub fn join(&self) -> JoinType {
        self.join
    }

    /// True when the node has no children at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.rulesets.is_empty()
    }

    /// Evaluate the tree against one record, short-circuiting on the
    /// first child that decides the outcome.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let mut verdicts = self
            .rules
            .iter()
            .map(|rule| rule.matches(record))
            .chain(self.rulesets.iter().map(|ruleset| ruleset.matches(record)));

        match self.join.normalized() {
            JoinType::Or => verdicts.any(|v| v),
            _ => verdicts.all(|v| v),
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = self.join.normalized();
        let mut first = true;
        for rule in &self.rules {
            if !first {
                write!(f, " {join} ")?;
            }
            first = false;
            write!(f, "{rule}")?;
        }
        for ruleset in &self.rulesets {
            if !first {
                write!(f, " {join} ")?;
            }
            first = false;
            write!(f, "({ruleset})")?;
        }
        Ok(())
    }
}
