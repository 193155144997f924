//! A letter-per-cell view of an assignment, for hosts that want to display a fill in progress.

use std::fmt::{Display, Formatter};

use crate::assignment::Assignment;
use crate::grid::Grid;
use crate::word_list::WordList;

/// One cell of a projected grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Blocked,
    Open(Option<char>),
}

/// The letters an assignment places in each cell. This is derived data, not solver state: it can
/// be recomputed from a grid and an assignment at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl LetterGrid {
    /// Project an assignment onto the grid. Open cells not covered by any assigned slot stay
    /// empty. If an invalid assignment disagrees at a crossing, the later slot's letter wins.
    pub fn project(grid: &Grid, words: &WordList, assignment: &Assignment) -> LetterGrid {
        let width = grid.width();
        let mut cells: Vec<Cell> = (0..grid.height())
            .flat_map(|row| {
                (0..width).map(move |col| {
                    if grid.is_open(row, col) { Cell::Open(None) } else { Cell::Blocked }
                })
            })
            .collect();

        for choice in assignment.choices() {
            let word = &words[choice.word_id];

            for ((row, col), &glyph) in grid.slot(choice.slot_id).cells().zip(&word.glyphs) {
                cells[row * width + col] = Cell::Open(Some(glyph));
            }
        }

        LetterGrid { width, height: grid.height(), cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell at the given coords, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// The letter at the given coords; blocked and empty cells have none.
    pub fn letter(&self, row: usize, col: usize) -> Option<char> {
        match self.get(row, col) {
            Some(Cell::Open(letter)) => letter,
            _ => None,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Does every open cell have a letter?
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Open(None))
    }
}

/// Renders `#` for blocked cells, `.` for empty open cells and the letter otherwise, one line per
/// row.
impl Display for LetterGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (row_idx, row) in self.rows().enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let c = match cell {
                    Cell::Blocked => '#',
                    Cell::Open(None) => '.',
                    Cell::Open(Some(letter)) => *letter,
                };
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
