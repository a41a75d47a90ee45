//! Words, alphabets and the shared word pools.
//!
//! A [`WordPool`] is validated once at construction and never mutated
//! afterwards, so it can be shared between strategies and worker threads
//! behind an [`Arc`].

use crate::error::PoolError;
use log::debug;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Longest supported word. Feedback patterns are packed into a `u64` in base 3.
pub const MAX_WORD_LENGTH: usize = 40;

/// Accented letters accepted by [`Alphabet::german`].
pub const GERMAN_EXTRA: [char; 3] = ['Ä', 'Ö', 'Ü'];

/// The set of uppercase characters a word may contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    extra: Vec<char>,
}

impl Alphabet {
    /// Plain A-Z.
    pub fn latin() -> Self {
        Self { extra: Vec::new() }
    }

    /// A-Z plus Ä, Ö and Ü.
    pub fn german() -> Self {
        Self::with_extra(GERMAN_EXTRA)
    }

    /// A-Z plus the given letters, case-folded to uppercase.
    pub fn with_extra(chars: impl IntoIterator<Item = char>) -> Self {
        let mut extra: Vec<char> = chars
            .into_iter()
            .flat_map(char::to_uppercase)
            .filter(|c| !c.is_ascii_uppercase())
            .collect();
        extra.sort_unstable();
        extra.dedup();
        Self { extra }
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii_uppercase() || self.extra.contains(&c)
    }

    pub fn extra(&self) -> &[char] {
        &self.extra
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::latin()
    }
}

/// Word length and alphabet shared by every word of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpec {
    length: usize,
    alphabet: Alphabet,
}

impl WordSpec {
    pub fn new(length: usize, alphabet: Alphabet) -> Result<Self, PoolError> {
        if length == 0 || length > MAX_WORD_LENGTH {
            return Err(PoolError::InvalidLength {
                length,
                max: MAX_WORD_LENGTH,
            });
        }
        Ok(Self { length, alphabet })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Case-fold `text` and check it against this spec.
    pub fn parse_word(&self, text: &str) -> Result<Word, PoolError> {
        let folded = text.trim().to_uppercase();
        let chars: Vec<char> = folded.chars().collect();

        if chars.len() != self.length {
            return Err(PoolError::WrongLength {
                word: folded,
                expected: self.length,
                found: chars.len(),
            });
        }
        if let Some(&ch) = chars.iter().find(|&&c| !self.alphabet.contains(c)) {
            return Err(PoolError::DisallowedChar { word: folded, ch });
        }

        Ok(Word(chars.into_boxed_slice()))
    }
}

impl Default for WordSpec {
    fn default() -> Self {
        Self {
            length: 5,
            alphabet: Alphabet::latin(),
        }
    }
}

/// A validated, uppercase word.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(Box<[char]>);

impl Word {
    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parses a word of any supported length over the German alphabet, which is
/// a superset of the Latin one.
impl FromStr for Word {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.trim().to_uppercase().chars().count();
        WordSpec::new(length, Alphabet::german())?.parse_word(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({self})")
    }
}

/// An immutable, ordered collection of unique words.
#[derive(Debug, Clone)]
pub struct WordPool {
    spec: WordSpec,
    words: Vec<Word>,
}

impl WordPool {
    /// Build a pool from already-normalised words, keeping their order.
    /// Any malformed or repeated word rejects the whole pool.
    pub fn new<I, S>(words: I, spec: WordSpec) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut parsed = Vec::new();
        for text in words {
            let word = spec.parse_word(text.as_ref())?;
            if !seen.insert(word.clone()) {
                return Err(PoolError::Duplicate {
                    word: word.to_string(),
                });
            }
            parsed.push(word);
        }

        if parsed.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(Self {
            spec,
            words: parsed,
        })
    }

    /// Build a pool from free text: whitespace separated tokens are
    /// case-folded, tokens that don't fit `spec` are skipped, and the result
    /// is deduplicated and sorted.
    pub fn from_word_list(text: &str, spec: WordSpec) -> Result<Self, PoolError> {
        let mut words = BTreeSet::new();
        let mut skipped = 0usize;
        for token in text.split_whitespace() {
            match spec.parse_word(token) {
                Ok(word) => {
                    words.insert(word);
                }
                Err(_) => skipped += 1,
            }
        }
        debug!("word list: kept {} words, skipped {skipped} tokens", words.len());

        if words.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(Self {
            spec,
            words: words.into_iter().collect(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>, spec: WordSpec) -> Result<Self, PoolError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PoolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_word_list(&text, spec)
    }

    pub fn spec(&self) -> &WordSpec {
        &self.spec
    }

    pub fn word_length(&self) -> usize {
        self.spec.length
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn position(&self, word: &Word) -> Option<usize> {
        self.words.iter().position(|w| w == word)
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }
}

impl<'a> IntoIterator for &'a WordPool {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The guessing dictionary and the pool secrets are drawn from.
#[derive(Debug, Clone)]
pub struct Pools {
    dictionary: Arc<WordPool>,
    targets: Arc<WordPool>,
}

impl Pools {
    /// One pool serves as both dictionary and targets.
    pub fn single(pool: WordPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            dictionary: Arc::clone(&pool),
            targets: pool,
        }
    }

    pub fn split(dictionary: WordPool, targets: WordPool) -> Result<Self, PoolError> {
        if dictionary.word_length() != targets.word_length() {
            return Err(PoolError::WrongLength {
                word: targets.words[0].to_string(),
                expected: dictionary.word_length(),
                found: targets.word_length(),
            });
        }
        Ok(Self {
            dictionary: Arc::new(dictionary),
            targets: Arc::new(targets),
        })
    }

    pub fn dictionary(&self) -> &Arc<WordPool> {
        &self.dictionary
    }

    pub fn targets(&self) -> &Arc<WordPool> {
        &self.targets
    }

    pub fn word_length(&self) -> usize {
        self.dictionary.word_length()
    }

    /// True when dictionary and targets are the same pool.
    pub fn is_shared(&self) -> bool {
        Arc::ptr_eq(&self.dictionary, &self.targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_word_folds_case() {
        let spec = WordSpec::default();
        assert_eq!(spec.parse_word("crane").unwrap().to_string(), "CRANE");
    }

    #[test]
    fn parse_word_rejects_accents_outside_alphabet() {
        let latin = WordSpec::default();
        assert!(matches!(
            latin.parse_word("bären"),
            Err(PoolError::DisallowedChar { ch: 'Ä', .. })
        ));

        let german = WordSpec::new(5, Alphabet::german()).unwrap();
        assert_eq!(german.parse_word("bären").unwrap().to_string(), "BÄREN");
    }

    #[test]
    fn spec_length_bounds() {
        assert!(WordSpec::new(0, Alphabet::latin()).is_err());
        assert!(WordSpec::new(MAX_WORD_LENGTH + 1, Alphabet::latin()).is_err());
        assert!(WordSpec::new(MAX_WORD_LENGTH, Alphabet::latin()).is_ok());
    }

    #[test]
    fn strict_pool_rejects_malformed_words() {
        let spec = WordSpec::default();
        assert!(matches!(
            WordPool::new(["crane", "cran"], spec.clone()),
            Err(PoolError::WrongLength { found: 4, .. })
        ));
        assert!(matches!(
            WordPool::new(["crane", "cr4ne"], spec.clone()),
            Err(PoolError::DisallowedChar { ch: '4', .. })
        ));
        assert!(matches!(
            WordPool::new(["crane", "CRANE"], spec.clone()),
            Err(PoolError::Duplicate { .. })
        ));
        assert!(matches!(
            WordPool::new(Vec::<String>::new(), spec),
            Err(PoolError::Empty)
        ));
    }

    #[test]
    fn word_list_skips_and_dedups() {
        let pool = WordPool::from_word_list("slate crane\nCRANE toolong ab1cd\n", WordSpec::default())
            .unwrap();
        let words: Vec<String> = pool.iter().map(Word::to_string).collect();
        assert_eq!(words, vec!["CRANE", "SLATE"]);
    }

    #[test]
    fn single_pools_are_shared() {
        let pool = WordPool::new(["crane", "slate"], WordSpec::default()).unwrap();
        let pools = Pools::single(pool);
        assert!(pools.is_shared());
        assert_eq!(pools.word_length(), 5);
    }

    #[test]
    fn split_pools_must_agree_on_length() {
        let dictionary = WordPool::new(["crane"], WordSpec::default()).unwrap();
        let targets =
            WordPool::new(["cranes"], WordSpec::new(6, Alphabet::latin()).unwrap()).unwrap();
        assert!(Pools::split(dictionary, targets).is_err());
    }
}
