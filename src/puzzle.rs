//! The immutable puzzle model: which cells are fillable, which slots they form, and how those
//! slots cross each other.
//!
//! Slots are derived purely from geometry. Every maximal horizontal run of at least two fillable
//! cells is an Across slot and every maximal vertical run is a Down slot. A slot's `SlotId` is its
//! index in scan order (Across slots row by row, then Down slots column by column), and that order
//! is what the solver falls back on whenever its heuristics tie.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use crate::errors::PuzzleError;
use crate::MAX_SLOT_LENGTH;

/// An identifier for a given slot, based on its index in the puzzle's slot list.
pub type SlotId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// A run of cells that takes one word. Two slots are the same variable iff every field matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub direction: Direction,
}

impl Slot {
    pub fn new(row: usize, col: usize, length: usize, direction: Direction) -> Slot {
        Slot {
            row,
            col,
            length,
            direction,
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item = GridCoord> {
        let Slot {
            row,
            col,
            length,
            direction,
        } = *self;

        (0..length).map(move |cell_idx| match direction {
            Direction::Across => (row, col + cell_idx),
            Direction::Down => (row + cell_idx, col),
        })
    }
}

/// A crossing between one slot and another, referencing the other slot's id and the location of
/// the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// The static facts about one slot, computed once when the puzzle is built.
#[derive(Clone)]
struct SlotConfig {
    slot: Slot,

    /// One entry per cell; `Some` if another slot passes through that cell.
    crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>,

    /// Ids of every crossing slot, ascending.
    neighbors: SmallVec<[SlotId; MAX_SLOT_LENGTH]>,
}

impl Debug for SlotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotConfig")
            .field("slot", &self.slot)
            .field("neighbors", &self.neighbors)
            .finish()
    }
}

/// A grid of fillable cells together with the slots it defines and their overlap relation.
#[derive(Debug, Clone)]
pub struct Puzzle {
    height: usize,
    width: usize,
    cells: Vec<Vec<bool>>,
    slot_configs: Vec<SlotConfig>,
    slot_ids_by_slot: HashMap<Slot, SlotId>,
}

/// Return `(start, length)` for each run of at least two consecutive fillable cells.
fn build_runs<I: IntoIterator<Item = bool>>(cells: I) -> Vec<(usize, usize)> {
    let mut result = vec![];
    let mut current_start: Option<usize> = None;
    let mut idx = 0;

    for fillable in cells {
        match (fillable, current_start) {
            (true, None) => current_start = Some(idx),
            (false, Some(start)) => {
                if idx - start > 1 {
                    result.push((start, idx - start));
                }
                current_start = None;
            }
            _ => {}
        }
        idx += 1;
    }

    if let Some(start) = current_start {
        if idx - start > 1 {
            result.push((start, idx - start));
        }
    }

    result
}

impl Puzzle {
    /// Build a puzzle from a fillable-cell matrix, indexed `cells[row][col]`. Every row must have
    /// the same length.
    pub fn new(cells: Vec<Vec<bool>>) -> Result<Puzzle, PuzzleError> {
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);

        for (row, line) in cells.iter().enumerate() {
            if line.len() != width {
                return Err(PuzzleError::RaggedRow {
                    row,
                    expected: width,
                    found: line.len(),
                });
            }
        }

        let mut slots: Vec<Slot> = vec![];

        for (row, line) in cells.iter().enumerate() {
            for (col, length) in build_runs(line.iter().copied()) {
                slots.push(Slot::new(row, col, length, Direction::Across));
            }
        }
        for col in 0..width {
            for (row, length) in build_runs(cells.iter().map(|line| line[col])) {
                slots.push(Slot::new(row, col, length, Direction::Down));
            }
        }

        // Build a map from cell location to the slots passing through it, which we can then use
        // to calculate crossings.
        let mut entries_by_loc: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> =
            HashMap::new();
        for (slot_id, slot) in slots.iter().enumerate() {
            for (cell_idx, loc) in slot.cell_coords().enumerate() {
                entries_by_loc.entry(loc).or_default().push((slot_id, cell_idx));
            }
        }

        let slot_configs: Vec<SlotConfig> = slots
            .iter()
            .enumerate()
            .map(|(slot_id, &slot)| {
                let crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]> = slot
                    .cell_coords()
                    .map(|loc| {
                        entries_by_loc[&loc]
                            .iter()
                            .find(|&&(other_slot_id, _)| other_slot_id != slot_id)
                            .map(|&(other_slot_id, other_slot_cell)| Crossing {
                                other_slot_id,
                                other_slot_cell,
                            })
                    })
                    .collect();

                let mut neighbors: SmallVec<[SlotId; MAX_SLOT_LENGTH]> = crossings
                    .iter()
                    .flatten()
                    .map(|crossing| crossing.other_slot_id)
                    .collect();
                neighbors.sort_unstable();
                neighbors.dedup();

                SlotConfig {
                    slot,
                    crossings,
                    neighbors,
                }
            })
            .collect();

        let slot_ids_by_slot = slots
            .iter()
            .enumerate()
            .map(|(slot_id, &slot)| (slot, slot_id))
            .collect();

        log::debug!(
            "Built {}x{} puzzle with {} slots",
            height,
            width,
            slot_configs.len()
        );

        Ok(Puzzle {
            height,
            width,
            cells,
            slot_configs,
            slot_ids_by_slot,
        })
    }

    /// Parse a structure string, with `_` representing fillable cells and anything else
    /// (including spaces) representing blocks. Every line is a row; only blank lines before the
    /// first row and after the last one are dropped. Lines shorter than the widest one are padded
    /// with blocks.
    pub fn from_structure_str(structure: &str) -> Result<Puzzle, PuzzleError> {
        let lines: Vec<&str> = structure.lines().map(str::trim_end).collect();
        let first = lines.iter().position(|line| !line.is_empty()).unwrap_or(lines.len());
        let last = lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(first, |index| index + 1);

        let rows: Vec<Vec<bool>> = lines[first..last]
            .iter()
            .map(|line| line.chars().map(|c| c == '_').collect())
            .collect();

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, false);
                row
            })
            .collect();

        Puzzle::new(cells)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_fillable(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|line| line.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn slot_count(&self) -> usize {
        self.slot_configs.len()
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slot_configs[slot_id].slot
    }

    /// All slots, in `SlotId` order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slot_configs.iter().map(|slot_config| &slot_config.slot)
    }

    pub fn slot_id(&self, slot: &Slot) -> Option<SlotId> {
        self.slot_ids_by_slot.get(slot).copied()
    }

    /// The crossing (if any) at each cell of the given slot.
    pub fn crossings(&self, slot_id: SlotId) -> &[Option<Crossing>] {
        &self.slot_configs[slot_id].crossings
    }

    /// If slots `x` and `y` share a cell, return `(i, j)` such that character `i` of `x`'s word
    /// must equal character `j` of `y`'s word.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<(usize, usize)> {
        if x == y {
            return None;
        }

        self.slot_configs[x]
            .crossings
            .iter()
            .enumerate()
            .find_map(|(cell_idx, crossing_opt)| match crossing_opt {
                Some(crossing) if crossing.other_slot_id == y => {
                    Some((cell_idx, crossing.other_slot_cell))
                }
                _ => None,
            })
    }

    /// Every slot crossing `slot_id`, ascending.
    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        self.slot_configs[slot_id].neighbors.iter().copied()
    }

    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.slot_configs[slot_id].neighbors.len()
    }
}
