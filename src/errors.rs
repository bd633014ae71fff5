//! Error types for building a puzzle from grid geometry.
//!
//! An unsatisfiable puzzle is not an error; see [`crate::FillFailure`] for that. The variants here
//! cover input that can't describe a crossword grid at all, and carry a stable code so the CLI can
//! report them consistently.

/// Malformed grid geometry, rejected before any slot is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("row {row} has {found} cells, expected {expected} (grid must be rectangular)")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl PuzzleError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PuzzleError::RaggedRow { .. } => "P001",
        }
    }

    /// Formats the error with its code
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format!("{} ({})", self, self.code())
    }
}
