//! Character classes and the per-call substitution map.
//!
//! Lists follow RFC 1738. A stand-in is only drawn from safe characters that do
//! not already occur in the input, so reversing the substitution is exact.

use super::error::DatabaseUrlError;

/// Characters a URL parser may reject or misinterpret, in processing order.
pub const UNSAFE_CHARACTERS: [char; 14] = [
    '"', '<', '>', '#', '%', '{', '}', '|', '\\', '^', '~', '[', ']', '`',
];

/// Punctuation head of the safe pool; ASCII letters follow (lower, then upper).
const SAFE_PUNCTUATION: [char; 11] = ['$', '-', '_', '.', '+', '!', '*', '(', ')', ',', '"'];

fn safe_pool() -> impl Iterator<Item = char> {
    SAFE_PUNCTUATION
        .into_iter()
        .chain('a'..='z')
        .chain('A'..='Z')
}

/// Unsafe characters present in `input`, in declaration order.
pub fn unsafe_characters_in(input: &str) -> Vec<char> {
    UNSAFE_CHARACTERS
        .into_iter()
        .filter(|c| input.contains(*c))
        .collect()
}

/// Safe characters absent from `input`, in pool order.
pub fn safe_characters_missing_from(input: &str) -> Vec<char> {
    safe_pool().filter(|c| !input.contains(*c)).collect()
}

/// Bijection between the unsafe characters of one input and their stand-ins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TranslationMap {
    /// `(unsafe, stand_in)` pairs in unsafe declaration order.
    pairs: Vec<(char, char)>,
}

impl TranslationMap {
    /// Builds the map for `input`, or fails when the safe pool is too small.
    pub(crate) fn for_input(input: &str) -> Result<Self, DatabaseUrlError> {
        let unsafe_characters = unsafe_characters_in(input);
        let safe_characters = safe_characters_missing_from(input);

        if unsafe_characters.len() > safe_characters.len() {
            return Err(DatabaseUrlError::Translation {
                unsafe_characters,
                safe_characters,
            });
        }

        let pairs = unsafe_characters
            .into_iter()
            .zip(safe_characters)
            .collect();
        Ok(Self { pairs })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replaces unsafe characters with their stand-ins.
    pub(crate) fn escape(&self, s: &str) -> String {
        s.chars()
            .map(|c| {
                self.pairs
                    .iter()
                    .find(|(unsafe_char, _)| *unsafe_char == c)
                    .map_or(c, |(_, stand_in)| *stand_in)
            })
            .collect()
    }

    /// Restores unsafe characters from their stand-ins.
    pub(crate) fn unescape(&self, s: &str) -> String {
        s.chars()
            .map(|c| {
                self.pairs
                    .iter()
                    .find(|(_, stand_in)| *stand_in == c)
                    .map_or(c, |(unsafe_char, _)| *unsafe_char)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsafe_characters_follow_declaration_order() {
        assert_eq!(unsafe_characters_in("a}b{c#"), vec!['#', '{', '}']);
        assert!(unsafe_characters_in("mysql://u:p@h:1/db").is_empty());
    }

    #[test]
    fn safe_pool_skips_characters_already_present() {
        let pool = safe_characters_missing_from("$-_");
        assert_eq!(pool[0], '.');
        assert_eq!(pool.len(), 63 - 3);
        assert!(!pool.contains(&'$'));
    }

    #[test]
    fn map_assigns_first_free_stand_in() {
        // '$' is taken by the input, so '{' gets '-' and '}' gets '_'.
        let map = TranslationMap::for_input("p$s{x}").unwrap();
        assert_eq!(map.escape("p$s{x}"), "p$s-x_");
        assert_eq!(map.unescape("p$s-x_"), "p$s{x}");
    }

    #[test]
    fn empty_map_is_identity() {
        let map = TranslationMap::for_input("sqlite3://na:na@/tmp/G2C.db").unwrap();
        assert!(map.is_empty());
        assert_eq!(map.escape("abc"), "abc");
    }

    #[test]
    fn exhausted_pool_is_an_error() {
        let mut input: String = ('a'..='z').chain('A'..='Z').collect();
        input.push_str("$-_.+!*(),");
        // Only '"' remains in the pool, but two unsafe characters need stand-ins.
        input.push_str("<>");
        match TranslationMap::for_input(&input) {
            Err(DatabaseUrlError::Translation {
                unsafe_characters,
                safe_characters,
            }) => {
                assert_eq!(unsafe_characters, vec!['<', '>']);
                assert_eq!(safe_characters, vec!['"']);
            }
            other => panic!("expected translation error, got {other:?}"),
        }
    }
}
