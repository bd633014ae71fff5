//! Fill crossword grids from a word list.
//!
//! A [`Puzzle`] is built from a grid of fillable cells; every run of two or more fillable cells is
//! a slot. [`find_fill`] then assigns each slot a distinct word of the right length so that
//! crossing slots agree on their shared letters. It prunes each slot's candidates with node and
//! arc consistency before running a backtracking search.
//!
//! ```
//! use crossword_csp::{find_fill, render_grid, FillOptions, Puzzle, WordList};
//!
//! let puzzle = Puzzle::from_structure_str("_##\n___\n_##").unwrap();
//! let word_list = WordList::parse_from_str("cat\ncar\nart\n");
//!
//! let result = find_fill(&puzzle, &word_list, &FillOptions::default()).unwrap();
//! assert!(result.assignment.is_consistent(&puzzle, &word_list));
//! println!("{}", render_grid(&puzzle, &word_list, &result.assignment));
//! ```

pub mod arc_consistency;
pub mod assignment;
pub mod backtracking_search;
pub mod domains;
pub mod errors;
pub mod log;
pub mod puzzle;
pub mod word_list;

pub use assignment::{Assignment, Choice};
pub use backtracking_search::{find_fill, FillFailure, FillOptions, FillSuccess, Statistics};
pub use domains::Domains;
pub use errors::PuzzleError;
pub use puzzle::{Direction, Puzzle, Slot, SlotId};
pub use word_list::{WordId, WordList};

/// The expected maximum length for a single slot. Longer slots still work; their per-cell data
/// just moves to the heap.
pub const MAX_SLOT_LENGTH: usize = 21;

/// The expected maximum number of distinct characters in a word list.
pub const MAX_GLYPH_COUNT: usize = 32;

/// Character drawn for blocked cells by [`render_grid`].
pub const BLOCK_CHAR: char = '█';

/// Turn the given puzzle and (possibly partial) assignment into a rendered string. Blocks are
/// drawn as [`BLOCK_CHAR`] and unfilled cells as spaces.
pub fn render_grid(puzzle: &Puzzle, word_list: &WordList, assignment: &Assignment) -> String {
    let letters = assignment.letter_grid(puzzle, word_list);

    letters
        .iter()
        .enumerate()
        .map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(|(col, letter)| {
                    if puzzle.is_fillable(row, col) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK_CHAR
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
