//! Pure predicates deciding whether words are compatible with each other and with an assignment.

use std::collections::HashSet;

use crate::assignment::Assignment;
use crate::grid::{Grid, SlotId};
use crate::word_list::{Word, WordId, WordList};

/// Does `word` at `cell_idx` carry the same letter as `other` at `other_cell`?
#[inline]
pub fn crossing_agrees(word: &Word, cell_idx: usize, other: &Word, other_cell: usize) -> bool {
    match (word.glyphs.get(cell_idx), other.glyphs.get(other_cell)) {
        (Some(glyph), Some(other_glyph)) => glyph == other_glyph,
        _ => false,
    }
}

/// Could `word_id` be placed in `slot_id` given the slots already assigned? Checks the length,
/// that no other slot already uses the word, and that every assigned crossing agrees. Unassigned
/// crossings don't constrain anything yet.
pub fn is_consistent(
    grid: &Grid,
    words: &WordList,
    assignment: &Assignment,
    slot_id: SlotId,
    word_id: WordId,
) -> bool {
    let word = &words[word_id];

    if word.len() != grid.slot(slot_id).length {
        return false;
    }

    if assignment.uses_word(word_id) && assignment.get(slot_id) != Some(word_id) {
        return false;
    }

    grid.neighbors(slot_id).all(|(cell_idx, crossing)| {
        match assignment.get(crossing.other_slot_id) {
            Some(other_word_id) => crossing_agrees(
                word,
                cell_idx,
                &words[other_word_id],
                crossing.other_slot_cell,
            ),
            None => true,
        }
    })
}

/// Check every invariant over all assigned slots: lengths, distinctness, and crossing letters.
/// This holds for partial assignments too; it doesn't require completeness.
pub fn is_valid_fill(grid: &Grid, words: &WordList, assignment: &Assignment) -> bool {
    let mut seen: HashSet<WordId> = HashSet::with_capacity(assignment.len());

    assignment.choices().all(|choice| {
        let word = &words[choice.word_id];

        word.len() == grid.slot(choice.slot_id).length
            && seen.insert(choice.word_id)
            && grid.neighbors(choice.slot_id).all(|(cell_idx, crossing)| {
                assignment.get(crossing.other_slot_id).map_or(true, |other_word_id| {
                    crossing_agrees(word, cell_idx, &words[other_word_id], crossing.other_slot_cell)
                })
            })
    })
}
