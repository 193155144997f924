//! The static model of a crossword grid: which cells are open, which slots (variables) the open
//! cells form, and where those slots cross each other.

use std::fmt::{Debug, Formatter};
use std::ops::Range;

use smallvec::SmallVec;

use crate::errors::InvalidStructure;
use crate::MAX_SLOT_LENGTH;

/// An identifier for a given slot, based on its index in the Grid's `slots` field. Slot ids follow
/// row-major order of the starting cell, with across slots before down slots sharing a start cell.
pub type SlotId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing. `Across` sorts before `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// A maximal run of open cells in one direction. Two slots are equal iff all four fields match,
/// and the derived ordering is the fixed slot order used for tie-breaking during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    /// The coords of the cell at the given index within this slot.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + cell_idx),
            Direction::Down => (self.row + cell_idx, self.col),
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(|cell_idx| self.cell(cell_idx))
    }

    /// If this slot shares a cell with `other`, return the index of that cell within each of
    /// them as `(index in self, index in other)`. Parallel slots never overlap.
    pub fn overlap(&self, other: &Slot) -> Option<(usize, usize)> {
        match (self.direction, other.direction) {
            (Direction::Across, Direction::Down) => {
                let within_across = other.col >= self.col && other.col < self.col + self.length;
                let within_down = self.row >= other.row && self.row < other.row + other.length;

                if within_across && within_down {
                    Some((other.col - self.col, self.row - other.row))
                } else {
                    None
                }
            }
            (Direction::Down, Direction::Across) => {
                other.overlap(self).map(|(other_cell, self_cell)| (self_cell, other_cell))
            }
            _ => None,
        }
    }
}

/// A crossing between one slot and another, referencing the other slot's id and the location of
/// the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// Per-cell crossing table for one slot.
pub type Crossings = SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>;

/// A rectangular grid of open and blocked cells, plus the slots and crossings derived from it.
/// Immutable once built.
#[derive(Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    slots: Vec<Slot>,
    crossings: Vec<Crossings>,
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("slots", &(["(", &self.slots.len().to_string(), " slots)"].join("")))
            .finish()
    }
}

impl Grid {
    /// Parse a structure layout, with `open_symbol` representing open cells and any other char
    /// representing a blocked cell. Empty lines before the first row and after the last one are
    /// ignored; every line in between is a row, including rows of spaces (which are all blocks).
    pub fn parse(template: &str, open_symbol: char) -> Result<Grid, InvalidStructure> {
        let lines: Vec<&str> = template.lines().collect();
        let first = lines.iter().position(|line| !line.is_empty()).unwrap_or(lines.len());
        let last = lines.iter().rposition(|line| !line.is_empty()).map_or(first, |idx| idx + 1);

        Grid::from_rows(&lines[first..last], open_symbol)
    }

    /// Build a grid from pre-split rows. Every row must have the same number of chars.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], open_symbol: char) -> Result<Grid, InvalidStructure> {
        let first_row = rows.first().ok_or(InvalidStructure::Empty)?;
        let width = first_row.as_ref().chars().count();

        let mut cells: Vec<bool> = Vec::with_capacity(width * rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let found = row.as_ref().chars().count();
            if found != width {
                return Err(InvalidStructure::RaggedRow { row: row_idx, expected: width, found });
            }

            cells.extend(row.as_ref().chars().map(|c| c == open_symbol));
        }

        Grid::from_cells(width, rows.len(), cells)
    }

    /// Build a grid from a row-major open/blocked matrix.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Grid, InvalidStructure> {
        if width == 0 || height == 0 {
            return Err(InvalidStructure::Empty);
        }
        if cells.len() != width * height {
            return Err(InvalidStructure::CellCountMismatch { width, height, found: cells.len() });
        }

        let slots = find_slots(width, height, &cells);
        let crossings = find_crossings(&slots);

        Ok(Grid { width, height, cells, slots, crossings })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Is the given cell open? Cells outside the grid count as blocked.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slots[slot_id]
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_ids(&self) -> Range<SlotId> {
        0..self.slots.len()
    }

    /// Look up the id of a slot by value.
    pub fn slot_id(&self, slot: &Slot) -> Option<SlotId> {
        self.slots.binary_search(slot).ok()
    }

    /// The crossing table for a slot, indexed by cell.
    pub fn crossings(&self, slot_id: SlotId) -> &Crossings {
        &self.crossings[slot_id]
    }

    /// Every crossing of the given slot, as `(cell index in this slot, crossing)`.
    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item = (usize, Crossing)> + '_ {
        self.crossings[slot_id]
            .iter()
            .enumerate()
            .filter_map(|(cell_idx, crossing)| crossing.map(|crossing| (cell_idx, crossing)))
    }

    /// The overlap between two slots as `(index in a, index in b)`, if they cross.
    pub fn overlap(&self, slot_a: SlotId, slot_b: SlotId) -> Option<(usize, usize)> {
        self.neighbors(slot_a)
            .find(|(_, crossing)| crossing.other_slot_id == slot_b)
            .map(|(cell_idx, crossing)| (cell_idx, crossing.other_slot_cell))
    }
}

/// Scan rows for across runs and columns for down runs. Only runs of two or more cells become
/// slots. Because we visit start cells row-major and check across first, the result is already in
/// slot order.
fn find_slots(width: usize, height: usize, cells: &[bool]) -> Vec<Slot> {
    let is_open = |row: usize, col: usize| cells[row * width + col];
    let mut slots = vec![];

    for row in 0..height {
        for col in 0..width {
            if !is_open(row, col) {
                continue;
            }

            if col == 0 || !is_open(row, col - 1) {
                let length = (col..width).take_while(|&c| is_open(row, c)).count();
                if length > 1 {
                    slots.push(Slot { row, col, direction: Direction::Across, length });
                }
            }

            if row == 0 || !is_open(row - 1, col) {
                let length = (row..height).take_while(|&r| is_open(r, col)).count();
                if length > 1 {
                    slots.push(Slot { row, col, direction: Direction::Down, length });
                }
            }
        }
    }

    slots
}

/// Compare every pair of slots and record each shared cell on both sides.
fn find_crossings(slots: &[Slot]) -> Vec<Crossings> {
    let mut crossings: Vec<Crossings> =
        slots.iter().map(|slot| (0..slot.length).map(|_| None).collect()).collect();

    for (slot_id, slot) in slots.iter().enumerate() {
        for (other_slot_id, other_slot) in slots.iter().enumerate().skip(slot_id + 1) {
            if let Some((cell_idx, other_slot_cell)) = slot.overlap(other_slot) {
                crossings[slot_id][cell_idx] = Some(Crossing { other_slot_id, other_slot_cell });
                crossings[other_slot_id][other_slot_cell] =
                    Some(Crossing { other_slot_id: slot_id, other_slot_cell: cell_idx });
            }
        }
    }

    crossings
}
