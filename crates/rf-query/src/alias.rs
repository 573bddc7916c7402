//! Alias resolution shared by targets, comparisons and join keywords.

use rf_core::Aliased;

use crate::reader::Reader;

/// Resolve the next word only if it is exactly an alias of `T`
/// (case-insensitive). Consumes the word on success.
pub fn resolve_exact<T: Aliased>(reader: &mut Reader) -> Option<T> {
    let word = reader.peek_word().to_lowercase();
    if word.is_empty() {
        return None;
    }
    let variant = T::ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| alias.eq_ignore_ascii_case(&word)))
        .map(|(variant, _)| *variant)?;
    reader.read_word();
    Some(variant)
}

/// Resolve the next word as an alias of `T`, falling back to the longest
/// alias the word starts with. On a prefix hit the rest of the word is
/// put back, so `scheme==http` reads as `scheme`, `==`, `http`.
pub fn resolve<T: Aliased>(reader: &mut Reader) -> Option<T> {
    if let Some(variant) = resolve_exact::<T>(reader) {
        return Some(variant);
    }

    let word = reader.peek_word().to_lowercase();
    let (variant, alias) = T::ALIASES
        .iter()
        .flat_map(|(variant, aliases)| aliases.iter().map(move |alias| (*variant, *alias)))
        .filter(|(_, alias)| word.starts_with(alias))
        .max_by_key(|(_, alias)| alias.len())?;

    let entire_word = reader.read_word();
    let rest: String = entire_word.chars().skip(alias.chars().count()).collect();
    log::trace!("'{}' resolved by prefix '{}', re-reading '{}'", entire_word, alias, rest);
    reader.prepend(&rest);
    Some(variant)
}

#[cfg(test)]
mod tests {
    use rf_core::{Comparison, JoinType, Target};

    use super::*;

    #[test]
    fn exact_match_is_case_insensitive() {
        let mut reader = Reader::new("  HostName is x");
        assert_eq!(resolve::<Target>(&mut reader), Some(Target::Host));
        assert_eq!(resolve::<Comparison>(&mut reader), Some(Comparison::Equal));
        assert_eq!(reader.read_word(), "x");
    }

    #[test]
    fn prefix_match_puts_back_the_rest() {
        let mut reader = Reader::new("scheme==http");
        assert_eq!(resolve::<Target>(&mut reader), Some(Target::Scheme));
        assert_eq!(reader.remaining(), "==http");
        assert_eq!(resolve::<Comparison>(&mut reader), Some(Comparison::Equal));
        assert_eq!(reader.remaining(), "http");
    }

    #[test]
    fn prefix_match_prefers_longest_alias() {
        let mut reader = Reader::new("querystring*=a");
        assert_eq!(resolve::<Target>(&mut reader), Some(Target::Query));
        assert_eq!(reader.remaining(), "*=a");

        let mut reader = Reader::new("protocol!=ftp");
        assert_eq!(resolve::<Target>(&mut reader), Some(Target::Scheme));
        assert_eq!(reader.remaining(), "!=ftp");
    }

    #[test]
    fn prefix_match_stops_word_at_close_paren() {
        let mut reader = Reader::new("path~api) OR");
        assert_eq!(resolve::<Target>(&mut reader), Some(Target::Path));
        assert_eq!(resolve::<Comparison>(&mut reader), Some(Comparison::Matches));
        assert_eq!(reader.remaining(), "api) OR");
    }

    #[test]
    fn unknown_word_leaves_reader_untouched() {
        let mut reader = Reader::new("nothing here");
        assert_eq!(resolve::<Target>(&mut reader), None);
        assert_eq!(reader.remaining(), "nothing here");
    }

    #[test]
    fn join_keywords_are_exact_only() {
        let mut reader = Reader::new("&& b");
        assert_eq!(resolve_exact::<JoinType>(&mut reader), Some(JoinType::And));

        let mut reader = Reader::new("ORhost");
        assert_eq!(resolve_exact::<JoinType>(&mut reader), None);

        let mut reader = Reader::new("");
        assert_eq!(resolve_exact::<JoinType>(&mut reader), None);
    }
}
