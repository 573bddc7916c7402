//! Recursive-descent parser for the query language.
//!
//! ```text
//! ruleset    := (clause (join clause | group)*)?
//! clause     := rule | group
//! group      := '(' ruleset ')'
//! rule       := target comparison value
//! join       := alias of AND | OR
//! value      := quoted-string | unquoted-word
//! ```

use rf_core::{Comparison, JoinType, Rule, Ruleset, Target};

use crate::alias::{resolve, resolve_exact};
use crate::error::ParseError;
use crate::reader::Reader;

/// Parse a whole query string into a rule tree.
pub fn parse_query(query: &str) -> Result<Ruleset, ParseError> {
    let mut reader = Reader::new(query);
    parse_ruleset(&mut reader, false)
}

/// Parse clauses until the input runs out or, when `nested`, until the
/// closing `)` of the group is consumed.
pub fn parse_ruleset(reader: &mut Reader, nested: bool) -> Result<Ruleset, ParseError> {
    let mut rules = Vec::new();
    let mut rulesets = Vec::new();
    let mut join = JoinType::None;
    let mut expecting_rule = true;
    let mut closed = false;

    while !reader.complete() {
        if reader.skip_whitespace() {
            continue;
        }

        if nested && reader.peek() == Some(')') {
            reader.next();
            closed = true;
            break;
        }

        if reader.peek() == Some('(') {
            reader.next();
            rulesets.push(parse_ruleset(reader, true)?);
            expecting_rule = false;
            continue;
        }

        if expecting_rule {
            rules.push(parse_rule(reader)?);
            expecting_rule = false;
            continue;
        }

        let new_join = match resolve_exact::<JoinType>(reader) {
            Some(new_join) => new_join,
            None => return Err(ParseError::ExpectedJoin(reader.peek_word())),
        };
        if join != JoinType::None && join != new_join {
            return Err(ParseError::MixedJoin {
                first: join,
                second: new_join,
            });
        }
        join = new_join;
        expecting_rule = true;
    }

    if nested && !closed {
        return Err(ParseError::UnterminatedGroup);
    }

    // a lone child (`host == a OR`) evaluates the same under either join
    if rules.len() + rulesets.len() < 2 {
        join = JoinType::And;
    }

    Ok(Ruleset::new(rules, rulesets, join.normalized()))
}

/// Parse one `target comparison value` rule.
pub fn parse_rule(reader: &mut Reader) -> Result<Rule, ParseError> {
    reader.save();

    let target = match resolve::<Target>(reader) {
        Some(target) => target,
        None => {
            reader.restore();
            return Err(ParseError::InvalidTarget(reader.peek_word()));
        }
    };

    let comparison = match resolve::<Comparison>(reader) {
        Some(comparison) => comparison,
        None => {
            // report the word after the target, not the target itself
            let word = reader.peek_word();
            reader.restore();
            return Err(ParseError::InvalidComparison(word));
        }
    };

    reader.skip_whitespace();

    let value = match reader.peek() {
        Some(quote @ ('"' | '\'')) => {
            reader.next();
            let value = reader.read_until(quote);
            reader.next();
            value
        }
        _ => reader.read_word(),
    };

    Ok(Rule::new(target, comparison, value))
}
