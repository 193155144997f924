//! Error types for building a grid from a structure layout.
//!
//! Note that failing to find a fill is *not* an error: that's reported as a
//! [`FillFailure`](crate::backtracking_search::FillFailure) value by the search.

/// A structure layout that can't be turned into a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStructure {
    /// The layout didn't contain any rows.
    #[error("structure has no rows")]
    Empty,

    /// One of the rows has a different number of cells than the first row.
    #[error("structure row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A flat cell list whose size doesn't match the declared dimensions.
    #[error("structure has {found} cells, expected {width}x{height}")]
    CellCountMismatch {
        width: usize,
        height: usize,
        found: usize,
    },
}

/// Errors from the one-shot [`fill_from_template`](crate::fill_from_template) entry point.
#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("invalid structure: {0}")]
    InvalidStructure(#[from] InvalidStructure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_row() {
        let err = InvalidStructure::RaggedRow { row: 2, expected: 5, found: 4 };
        assert_eq!(err.to_string(), "structure row 2 has 4 cells, expected 5");

        let wrapped: FillError = err.into();
        assert!(wrapped.to_string().starts_with("invalid structure: "));
    }
}
