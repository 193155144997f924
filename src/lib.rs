//! Crossword filling as a constraint satisfaction problem: each slot of the grid is a variable,
//! its domain is the set of candidate words of the right length, and every pair of crossing slots
//! must agree on the shared letter. Assigned words must also be distinct.
//!
//! A fill runs in three stages: node-consistent domains from the word list, an optional AC-3
//! pass, and a backtracking search (see [`backtracking_search`]).

pub mod arc_consistency;
pub mod assignment;
pub mod backtracking_search;
pub mod consistency;
pub mod domains;
pub mod errors;
pub mod grid;
pub mod letter_grid;
pub mod logging;
pub mod observer;
pub mod word_list;

pub use assignment::{Assignment, Choice};
pub use backtracking_search::{
    find_fill, FillFailure, FillOptions, FillResult, FillSuccess, Inference, Statistics,
    ValueOrdering,
};
pub use errors::{FillError, InvalidStructure};
pub use grid::{Direction, Grid, Slot, SlotId};
pub use letter_grid::LetterGrid;
pub use observer::{FillEvent, FillObserver, NoopObserver};
pub use word_list::{WordId, WordList};

/// The expected maximum length for a single slot. Longer slots work, they just spill onto the
/// heap.
pub const MAX_SLOT_LENGTH: usize = 21;

/// The char marking an open cell in structure layouts, unless the host picks another one.
pub const DEFAULT_OPEN_SYMBOL: char = '_';

/// Parse a structure layout using [`DEFAULT_OPEN_SYMBOL`] and fill it with default options.
///
/// Returns the grid alongside the fill result, since the assignment is only meaningful together
/// with the grid's slot ids.
pub fn fill_from_template(
    template: &str,
    words: &WordList,
) -> Result<(Grid, FillResult), FillError> {
    let grid = Grid::parse(template, DEFAULT_OPEN_SYMBOL)?;
    let result = find_fill(&grid, words, &FillOptions::default(), &mut NoopObserver);
    Ok((grid, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_from_template() {
        let words = WordList::new(["cats", "bats", "ants", "tree"]);
        let (grid, result) = fill_from_template("____\n#_##\n#_##\n#_##\n", &words).unwrap();

        let letters = LetterGrid::project(&grid, &words, &result.unwrap().assignment);
        assert_eq!(letters.to_string(), "bats\n#n##\n#t##\n#s##");
    }

    #[test]
    fn test_fill_from_template_rejects_ragged_rows() {
        let words = WordList::new(["cat"]);

        assert!(matches!(
            fill_from_template("___\n__\n", &words),
            Err(FillError::InvalidStructure(InvalidStructure::RaggedRow { row: 1, expected: 3, found: 2 }))
        ));
    }
}
