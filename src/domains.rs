//! The domain store: the set of words each slot could still take.
//!
//! Domains start out as the whole word list and only ever shrink, first through node consistency
//! (length filtering) and then through `revise` calls made by the arc-consistency pass. Once that
//! pass finishes, the search only reads them.

use bit_set::BitSet;
use smallvec::SmallVec;

use crate::puzzle::{Puzzle, SlotId};
use crate::word_list::{WordId, WordList};
use crate::MAX_GLYPH_COUNT;

/// For each cell of a slot, how many of the slot's remaining options put each glyph there.
pub type GlyphCountsByCell = Vec<SmallVec<[u32; MAX_GLYPH_COUNT]>>;

/// Candidate words per slot, indexed by `SlotId`. Each list is kept in ascending `WordId` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    options: Vec<Vec<WordId>>,
}

impl Domains {
    /// Give every slot the whole word list as its initial domain.
    pub fn new(puzzle: &Puzzle, word_list: &WordList) -> Domains {
        Domains {
            options: (0..puzzle.slot_count())
                .map(|_| (0..word_list.len()).collect())
                .collect(),
        }
    }

    /// Remove every word whose length differs from its slot's length.
    pub fn enforce_node_consistency(&mut self, puzzle: &Puzzle, word_list: &WordList) {
        for (slot_id, options) in self.options.iter_mut().enumerate() {
            let length = puzzle.slot(slot_id).length;
            options.retain(|&word_id| word_list.word(word_id).len() == length);
        }
    }

    /// Make `x` arc consistent with `y`: remove each word from `x`'s domain that has no word in
    /// `y`'s domain agreeing with it at their shared cell. Returns whether anything was removed.
    /// Slots that don't cross are unconstrained, so nothing is removed.
    pub fn revise(&mut self, puzzle: &Puzzle, word_list: &WordList, x: SlotId, y: SlotId) -> bool {
        let Some((x_cell, y_cell)) = puzzle.overlap(x, y) else {
            return false;
        };

        // Which glyphs can `y` still place in the shared cell?
        let mut supported_glyphs = BitSet::with_capacity(word_list.glyph_count());
        for &word_id in &self.options[y] {
            if let Some(&glyph) = word_list.word(word_id).glyphs.get(y_cell) {
                supported_glyphs.insert(glyph);
            }
        }

        let before = self.options[x].len();
        self.options[x].retain(|&word_id| {
            word_list
                .word(word_id)
                .glyphs
                .get(x_cell)
                .is_some_and(|&glyph| supported_glyphs.contains(glyph))
        });

        self.options[x].len() != before
    }

    pub fn options(&self, slot_id: SlotId) -> &[WordId] {
        &self.options[slot_id]
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.options[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.options[slot_id].is_empty()
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.options[slot_id].binary_search(&word_id).is_ok()
    }

    /// The lowest-numbered slot with no options left, if any.
    pub fn first_empty_slot(&self) -> Option<SlotId> {
        self.options.iter().position(Vec::is_empty)
    }

    /// Total number of (slot, word) pairs still possible.
    pub fn total_options(&self) -> usize {
        self.options.iter().map(Vec::len).sum()
    }

    /// Count the glyphs placed in each cell by the slot's remaining options.
    pub(crate) fn build_glyph_counts_by_cell(
        &self,
        puzzle: &Puzzle,
        word_list: &WordList,
        slot_id: SlotId,
    ) -> GlyphCountsByCell {
        let mut result: GlyphCountsByCell = (0..puzzle.slot(slot_id).length)
            .map(|_| (0..word_list.glyph_count()).map(|_| 0).collect())
            .collect();

        for &word_id in &self.options[slot_id] {
            for (cell_idx, &glyph) in word_list.word(word_id).glyphs.iter().enumerate() {
                if let Some(counts) = result.get_mut(cell_idx) {
                    counts[glyph] += 1;
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Domains;
    use crate::puzzle::Puzzle;
    use crate::word_list::WordList;

    /// _##
    /// ___
    /// _##
    fn crossing_pair() -> Puzzle {
        Puzzle::from_structure_str("_##\n___\n_##").unwrap()
    }

    fn strings(word_list: &WordList, options: &[usize]) -> Vec<String> {
        options.iter().map(|&word_id| word_list.word(word_id).string.clone()).collect()
    }

    #[test]
    fn test_node_consistency_filters_by_length() {
        let puzzle = crossing_pair();
        let word_list = WordList::new(["at", "cat", "car", "cart", "art"]);
        let mut domains = Domains::new(&puzzle, &word_list);

        assert_eq!(domains.len(0), 5);

        domains.enforce_node_consistency(&puzzle, &word_list);

        for slot_id in 0..puzzle.slot_count() {
            assert_eq!(strings(&word_list, domains.options(slot_id)), vec!["ART", "CAR", "CAT"]);
            for &word_id in domains.options(slot_id) {
                assert_eq!(word_list.word(word_id).len(), puzzle.slot(slot_id).length);
            }
        }
    }

    #[test]
    fn test_node_consistency_is_idempotent() {
        let puzzle = crossing_pair();
        let word_list = WordList::new(["at", "cat", "car", "cart", "art"]);
        let mut domains = Domains::new(&puzzle, &word_list);

        domains.enforce_node_consistency(&puzzle, &word_list);
        let once = domains.clone();
        domains.enforce_node_consistency(&puzzle, &word_list);

        assert_eq!(domains, once);
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        let puzzle = crossing_pair();
        let word_list = WordList::new(["art", "car", "cat"]);
        let mut domains = Domains::new(&puzzle, &word_list);
        domains.enforce_node_consistency(&puzzle, &word_list);

        // The across slot's first letter must match the down slot's second letter (A or R).
        assert!(domains.revise(&puzzle, &word_list, 0, 1));
        assert_eq!(strings(&word_list, domains.options(0)), vec!["ART"]);

        // Nothing left to remove.
        assert!(!domains.revise(&puzzle, &word_list, 0, 1));

        assert!(domains.revise(&puzzle, &word_list, 1, 0));
        assert_eq!(strings(&word_list, domains.options(1)), vec!["CAR", "CAT"]);
    }

    #[test]
    fn test_revise_without_overlap_is_a_no_op() {
        let puzzle = Puzzle::from_structure_str("__#__").unwrap();
        let word_list = WordList::new(["ab", "cd"]);
        let mut domains = Domains::new(&puzzle, &word_list);
        domains.enforce_node_consistency(&puzzle, &word_list);

        assert!(!domains.revise(&puzzle, &word_list, 0, 1));
        assert_eq!(domains.len(0), 2);
    }

    #[test]
    fn test_revise_against_empty_domain_empties_target() {
        let puzzle = Puzzle::from_structure_str("_##\n____\n_##").unwrap();
        let word_list = WordList::new(["art", "car", "cat"]);
        let mut domains = Domains::new(&puzzle, &word_list);
        domains.enforce_node_consistency(&puzzle, &word_list);

        // The across slot is four long, so nothing fits it.
        assert!(domains.is_empty(0));
        assert_eq!(domains.first_empty_slot(), Some(0));

        assert!(domains.revise(&puzzle, &word_list, 1, 0));
        assert!(domains.is_empty(1));
    }

    #[test]
    fn test_glyph_counts() {
        let puzzle = crossing_pair();
        let word_list = WordList::new(["art", "car", "cat"]);
        let mut domains = Domains::new(&puzzle, &word_list);
        domains.enforce_node_consistency(&puzzle, &word_list);

        let counts = domains.build_glyph_counts_by_cell(&puzzle, &word_list, 1);
        let a = word_list.glyphs.iter().position(|&c| c == 'A').unwrap();
        let c = word_list.glyphs.iter().position(|&c| c == 'C').unwrap();

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0][c], 2);
        assert_eq!(counts[0][a], 1);
        assert_eq!(counts[1][a], 2);
        assert!(domains.contains(1, 0));
    }
}
