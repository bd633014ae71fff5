//! Partial and complete solutions: which word each slot holds so far.

use bit_set::BitSet;
use std::collections::BTreeMap;

use crate::puzzle::{Puzzle, Slot, SlotId};
use crate::word_list::{WordId, WordList};

/// A struct recording a slot assignment made during the filling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A mapping from some subset of a puzzle's slots to words.
///
/// Only the search in this crate fills or clears slots, so outside code can't assign a slot twice
/// or name a slot that isn't part of the puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    word_ids: Vec<Option<WordId>>,
    filled_slot_ids: BitSet,
}

impl Assignment {
    /// An empty assignment for a puzzle with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            word_ids: vec![None; slot_count],
            filled_slot_ids: BitSet::with_capacity(slot_count),
        }
    }

    pub(crate) fn assign(&mut self, choice: Choice) {
        debug_assert!(
            self.word_ids[choice.slot_id].is_none(),
            "slot {} is already filled",
            choice.slot_id
        );
        self.word_ids[choice.slot_id] = Some(choice.word_id);
        self.filled_slot_ids.insert(choice.slot_id);
    }

    pub(crate) fn unassign(&mut self, slot_id: SlotId) -> Option<WordId> {
        self.filled_slot_ids.remove(slot_id);
        self.word_ids[slot_id].take()
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.word_ids.get(slot_id).copied().flatten()
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.filled_slot_ids.contains(slot_id)
    }

    pub fn word<'a>(&self, slot_id: SlotId, word_list: &'a WordList) -> Option<&'a str> {
        self.get(slot_id)
            .map(|word_id| word_list.word(word_id).string.as_str())
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.filled_slot_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_slot_ids.is_empty()
    }

    /// Every slot has a word. Vacuously true for a puzzle without slots.
    pub fn is_complete(&self) -> bool {
        self.len() == self.word_ids.len()
    }

    /// The filled slots, in `SlotId` order.
    pub fn choices(&self) -> impl Iterator<Item = Choice> + '_ {
        self.filled_slot_ids.iter().filter_map(|slot_id| {
            self.word_ids[slot_id].map(|word_id| Choice { slot_id, word_id })
        })
    }

    /// Check a single filled slot against everything else in the assignment: its word has the
    /// slot's length, no other slot holds the same word, and it agrees with every filled crossing.
    pub(crate) fn is_choice_consistent(
        &self,
        puzzle: &Puzzle,
        word_list: &WordList,
        choice: Choice,
    ) -> bool {
        let word = word_list.word(choice.word_id);

        if word.len() != puzzle.slot(choice.slot_id).length {
            return false;
        }

        if self
            .choices()
            .any(|other| other.slot_id != choice.slot_id && other.word_id == choice.word_id)
        {
            return false;
        }

        puzzle
            .crossings(choice.slot_id)
            .iter()
            .enumerate()
            .all(|(cell_idx, crossing_opt)| match crossing_opt {
                Some(crossing) => match self.get(crossing.other_slot_id) {
                    Some(other_word_id) => word_list
                        .word(other_word_id)
                        .glyphs
                        .get(crossing.other_slot_cell)
                        .is_some_and(|&glyph| glyph == word.glyphs[cell_idx]),
                    None => true,
                },
                None => true,
            })
    }

    /// Check the whole assignment from scratch: words are pairwise distinct, each fits its slot's
    /// length, and every pair of filled crossing slots agrees on the shared letter.
    pub fn is_consistent(&self, puzzle: &Puzzle, word_list: &WordList) -> bool {
        if self.word_ids.len() != puzzle.slot_count() {
            return false;
        }

        let mut seen = BitSet::with_capacity(word_list.len());
        for choice in self.choices() {
            if !seen.insert(choice.word_id) {
                return false;
            }
            if word_list.word(choice.word_id).len() != puzzle.slot(choice.slot_id).length {
                return false;
            }
        }

        self.choices().all(|choice| {
            let word = word_list.word(choice.word_id);

            puzzle.neighbors(choice.slot_id).all(|other_slot_id| {
                match (self.get(other_slot_id), puzzle.overlap(choice.slot_id, other_slot_id)) {
                    (Some(other_word_id), Some((i, j))) => {
                        word.glyphs[i] == word_list.word(other_word_id).glyphs[j]
                    }
                    _ => true,
                }
            })
        })
    }

    /// The filled slots and their words, keyed by slot.
    pub fn to_map(&self, puzzle: &Puzzle, word_list: &WordList) -> BTreeMap<Slot, String> {
        self.choices()
            .map(|choice| {
                (
                    *puzzle.slot(choice.slot_id),
                    word_list.word(choice.word_id).string.clone(),
                )
            })
            .collect()
    }

    /// The letter in each grid cell, or `None` for blocks and unfilled cells.
    pub fn letter_grid(&self, puzzle: &Puzzle, word_list: &WordList) -> Vec<Vec<Option<char>>> {
        let mut letters = vec![vec![None; puzzle.width()]; puzzle.height()];

        for choice in self.choices() {
            let word = word_list.word(choice.word_id);
            let cells = puzzle.slot(choice.slot_id).cell_coords();
            for ((row, col), &glyph) in cells.zip(&word.glyphs) {
                letters[row][col] = Some(word_list.glyphs[glyph]);
            }
        }

        letters
    }
}
