//! Partial and complete assignments of words to slots.

use bit_set::BitSet;

use crate::grid::{Grid, Slot, SlotId};
use crate::word_list::{WordId, WordList};

/// A word chosen for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A mapping from slots to chosen words. The search never mutates an assignment that a sibling
/// branch can see: extending one with [`Assignment::with`] produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
    used_words: BitSet,
    assigned_count: usize,
}

impl Assignment {
    /// An assignment with no slots filled, for a grid with `slot_count` slots.
    pub fn empty(slot_count: usize) -> Assignment {
        Assignment { words: vec![None; slot_count], used_words: BitSet::new(), assigned_count: 0 }
    }

    /// Build an assignment from a list of choices.
    pub fn from_choices<I: IntoIterator<Item = Choice>>(slot_count: usize, choices: I) -> Assignment {
        let mut assignment = Assignment::empty(slot_count);
        for Choice { slot_id, word_id } in choices {
            assignment.insert(slot_id, word_id);
        }
        assignment
    }

    /// Copy this assignment and add one more choice to the copy.
    pub fn with(&self, choice: Choice) -> Assignment {
        let mut extended = self.clone();
        extended.insert(choice.slot_id, choice.word_id);
        extended
    }

    /// Set the word for a slot, returning the word it replaces.
    pub fn insert(&mut self, slot_id: SlotId, word_id: WordId) -> Option<WordId> {
        let previous = self.words[slot_id].replace(word_id);

        match previous {
            Some(previous_word_id) => {
                if !self.words.iter().any(|&word| word == Some(previous_word_id)) {
                    self.used_words.remove(previous_word_id);
                }
            }
            None => self.assigned_count += 1,
        }
        self.used_words.insert(word_id);

        previous
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.words[slot_id]
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.words[slot_id].is_some()
    }

    /// Is this word already assigned to any slot?
    pub fn uses_word(&self, word_id: WordId) -> bool {
        self.used_words.contains(word_id)
    }

    /// Number of slots with a word.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    pub fn slot_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.words.len()
    }

    /// Every assigned slot, in slot order.
    pub fn choices(&self) -> impl Iterator<Item = Choice> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word)| word.map(|word_id| Choice { slot_id, word_id }))
    }

    /// The word string assigned to a slot.
    pub fn word<'a>(&self, slot_id: SlotId, words: &'a WordList) -> Option<&'a str> {
        self.words[slot_id].map(|word_id| words[word_id].string.as_str())
    }

    /// Every assigned slot with its word string, in slot order.
    pub fn entries<'a>(
        &'a self,
        grid: &'a Grid,
        words: &'a WordList,
    ) -> impl Iterator<Item = (&'a Slot, &'a str)> + 'a {
        self.choices()
            .map(move |choice| (grid.slot(choice.slot_id), words[choice.word_id].string.as_str()))
    }
}
