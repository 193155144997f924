//! The candidate words supplied by the host, interned so that domains can refer to them by id.

use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use std::ops::Index;

use smallvec::SmallVec;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given word, based on its index in the WordList's `words` field. Words are
/// stored in lexicographic order, so comparing ids compares the words.
pub type WordId = usize;

/// The chars of a word, one per cell.
pub type Glyphs = SmallVec<[char; MAX_SLOT_LENGTH]>;

/// A word that can be chosen for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: Glyphs,
}

impl Word {
    /// Length in cells, which is the number of chars rather than bytes.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// A deduplicated, sorted list of candidate words. Supplying the same word twice yields one
/// logical copy, which can be assigned to at most one slot.
#[derive(Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
}

impl Debug for WordList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordList")
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl WordList {
    /// Build a word list from already-normalized words. Empty strings are dropped; no case or
    /// charset normalization happens here.
    pub fn new<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = words
            .into_iter()
            .map(|word| word.as_ref().to_string())
            .filter(|word| !word.is_empty())
            .collect();

        WordList {
            words: unique
                .into_iter()
                .map(|string| Word { glyphs: string.chars().collect(), string })
                .collect(),
        }
    }

    /// Build a word list from text with one word per line. Surrounding whitespace and blank lines
    /// are ignored.
    pub fn parse(text: &str) -> WordList {
        WordList::new(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word_id: WordId) -> Option<&Word> {
        self.words.get(word_id)
    }

    /// Look up the id for a word string.
    pub fn id_of(&self, word: &str) -> Option<WordId> {
        self.words.binary_search_by(|candidate| candidate.string.as_str().cmp(word)).ok()
    }

    /// Ids of every word with exactly `length` chars, in id order.
    pub fn ids_with_length(&self, length: usize) -> impl Iterator<Item = WordId> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter(move |(_, word)| word.len() == length)
            .map(|(word_id, _)| word_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.words.iter().enumerate()
    }
}

impl Index<WordId> for WordList {
    type Output = Word;

    fn index(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_are_sorted_and_deduplicated() {
        let words = WordList::new(["dog", "cat", "", "dog", "ant"]);

        assert_eq!(words.len(), 3);
        assert_eq!(
            words.iter().map(|(_, word)| word.string.as_str()).collect::<Vec<_>>(),
            vec!["ant", "cat", "dog"],
        );
        assert_eq!(words.id_of("cat"), Some(1));
        assert_eq!(words.id_of("cow"), None);
    }

    #[test]
    fn test_length_counts_chars() {
        let words = WordList::new(["café", "cafe", "tea"]);

        assert_eq!(words.ids_with_length(4).count(), 2);
        assert_eq!(words[words.id_of("café").unwrap()].len(), 4);
        assert_eq!(words.ids_with_length(3).collect::<Vec<_>>(), vec![words.id_of("tea").unwrap()]);
    }

    #[test]
    fn test_parse_one_word_per_line() {
        let words = WordList::parse("ONE\r\n  TWO \n\nTHREE\n");

        assert_eq!(words.len(), 3);
        assert!(words.id_of("TWO").is_some());
        assert!(words.get(3).is_none());
    }
}
