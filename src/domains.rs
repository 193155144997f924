//! The domain store: the set of candidate words for each slot.

use bit_set::BitSet;

use crate::grid::{Grid, SlotId};
use crate::word_list::{WordId, WordList};

/// Candidate word ids for every slot, indexed by `SlotId`. Cloning a store gives the search an
/// independent working copy, so narrowing a branch's domains never affects its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    by_slot: Vec<BitSet>,
}

impl Domains {
    /// Populate each slot with every word of the slot's length. Length is the only unary
    /// constraint, so the result is node-consistent by construction.
    pub fn node_consistent(grid: &Grid, words: &WordList) -> Domains {
        Domains {
            by_slot: grid
                .slots()
                .iter()
                .map(|slot| {
                    let mut domain = BitSet::with_capacity(words.len());
                    for word_id in words.ids_with_length(slot.length) {
                        domain.insert(word_id);
                    }
                    domain
                })
                .collect(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.by_slot.len()
    }

    pub fn get(&self, slot_id: SlotId) -> &BitSet {
        &self.by_slot[slot_id]
    }

    /// Word ids remaining for a slot, in ascending (lexicographic) order.
    pub fn values(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.by_slot[slot_id].iter()
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.by_slot[slot_id].len()
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].contains(word_id)
    }

    /// Remove a word from a slot's domain, returning whether it was present.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        self.by_slot[slot_id].remove(word_id)
    }

    /// Narrow a slot's domain to the single word chosen for it.
    pub fn restrict_to(&mut self, slot_id: SlotId, word_id: WordId) {
        let domain = &mut self.by_slot[slot_id];
        domain.clear();
        domain.insert(word_id);
    }

    /// The first slot (in slot order) whose domain is empty, if any.
    pub fn empty_slot(&self) -> Option<SlotId> {
        self.by_slot.iter().position(BitSet::is_empty)
    }

    /// Sum of all domain sizes.
    pub fn total_len(&self) -> usize {
        self.by_slot.iter().map(BitSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domains_hold_words_of_slot_length() {
        // 3-across at the top, 2-down in the right column.
        let grid = Grid::from_rows(&["___", "##_"], '_').unwrap();
        let words = WordList::new(["at", "cat", "dog", "go", "goose"]);
        let domains = Domains::node_consistent(&grid, &words);

        let strings = |slot_id| {
            domains.values(slot_id).map(|word_id| words[word_id].string.as_str()).collect::<Vec<_>>()
        };
        assert_eq!(strings(0), vec!["cat", "dog"]);
        assert_eq!(strings(1), vec!["at", "go"]);
        assert_eq!(domains.total_len(), 4);
        assert_eq!(domains.empty_slot(), None);
    }

    #[test]
    fn test_missing_length_gives_empty_domain() {
        let grid = Grid::from_rows(&["_____"], '_').unwrap();
        let words = WordList::new(["cat", "bats"]);
        let domains = Domains::node_consistent(&grid, &words);

        assert_eq!(domains.len(0), 0);
        assert_eq!(domains.empty_slot(), Some(0));
    }

    #[test]
    fn test_restrict_and_remove() {
        let grid = Grid::from_rows(&["___"], '_').unwrap();
        let words = WordList::new(["ant", "cat", "dog"]);
        let mut domains = Domains::node_consistent(&grid, &words);
        let copy = domains.clone();

        assert!(domains.remove(0, 0));
        assert!(!domains.remove(0, 0));
        domains.restrict_to(0, 2);

        assert_eq!(domains.values(0).collect::<Vec<_>>(), vec![2]);
        assert!(domains.contains(0, 2));
        assert_eq!(copy.len(0), 3, "clones are independent");
    }
}
