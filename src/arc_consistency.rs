//! AC-3 over the binary crossing constraints.
//!
//! Each arc `(x, y)` says "every word left for `x` needs a partner left for `y`". We revise arcs
//! until none of them changes anything, re-checking the arcs pointing at any slot that just lost
//! words. If a slot runs out of words we stop right away, since no assignment can exist.

use bit_set::BitSet;
use std::collections::VecDeque;

use crate::domains::Domains;
use crate::puzzle::{Puzzle, SlotId};
use crate::word_list::WordList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConsistencyQueueItem {
    slot_id: SlotId,
    other_slot_id: SlotId,
}

/// Worklist of arcs still to revise. An arc that's already waiting isn't added twice; `pending`
/// tracks waiting arcs by `slot_id * slot_count + other_slot_id`.
#[derive(Debug)]
struct ConsistencyQueue {
    slot_count: usize,
    queue: VecDeque<ConsistencyQueueItem>,
    pending: BitSet,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(slot_count: usize, items: Items) -> ConsistencyQueue
    where
        Items: IntoIterator<Item = (SlotId, SlotId)>,
    {
        let mut queue = ConsistencyQueue {
            slot_count,
            queue: VecDeque::new(),
            pending: BitSet::with_capacity(slot_count * slot_count),
        };
        for (slot_id, other_slot_id) in items {
            queue.enqueue(slot_id, other_slot_id);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<ConsistencyQueueItem> {
        let item = self.queue.pop_front()?;
        self.pending.remove(item.slot_id * self.slot_count + item.other_slot_id);
        Some(item)
    }

    fn enqueue(&mut self, slot_id: SlotId, other_slot_id: SlotId) {
        if self.pending.insert(slot_id * self.slot_count + other_slot_id) {
            self.queue.push_back(ConsistencyQueueItem {
                slot_id,
                other_slot_id,
            });
        }
    }
}

/// Every ordered pair of crossing slots, in `SlotId` order.
pub fn all_arcs(puzzle: &Puzzle) -> Vec<(SlotId, SlotId)> {
    (0..puzzle.slot_count())
        .flat_map(|slot_id| puzzle.neighbors(slot_id).map(move |other| (slot_id, other)))
        .collect()
}

/// Results from a call to `establish_arc_consistency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArcConsistencySuccess {
    /// How many arcs were revised.
    pub revisions: usize,
    /// How many words were removed across all domains.
    pub eliminations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    /// The slot whose domain ran dry.
    pub slot_id: SlotId,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Revise arcs until every crossing constraint is locally satisfiable. `arcs` gives the initial
/// worklist; `None` means every arc in the puzzle.
///
/// A slot that is already empty on entry counts as a failure too: no assignment could fill it.
pub fn establish_arc_consistency(
    puzzle: &Puzzle,
    word_list: &WordList,
    domains: &mut Domains,
    arcs: Option<&[(SlotId, SlotId)]>,
) -> ArcConsistencyResult {
    if let Some(slot_id) = domains.first_empty_slot() {
        log::debug!("Slot {slot_id} has no options before arc consistency");
        return Err(ArcConsistencyFailure { slot_id });
    }

    let slot_count = puzzle.slot_count();
    let mut queue = match arcs {
        Some(arcs) => ConsistencyQueue::with_initial_queue(slot_count, arcs.iter().copied()),
        None => ConsistencyQueue::with_initial_queue(slot_count, all_arcs(puzzle)),
    };

    let options_before = domains.total_options();
    let mut revisions = 0;

    while let Some(item) = queue.pop_front() {
        let (slot_id, other_slot_id) = (item.slot_id, item.other_slot_id);
        revisions += 1;

        if !domains.revise(puzzle, word_list, slot_id, other_slot_id) {
            continue;
        }

        if domains.is_empty(slot_id) {
            log::debug!(
                "Arc consistency emptied slot {slot_id} (revising against {other_slot_id})"
            );
            return Err(ArcConsistencyFailure { slot_id });
        }

        // Anything crossing `slot_id` may have just lost its support.
        for neighbor_id in puzzle.neighbors(slot_id) {
            if neighbor_id != other_slot_id {
                queue.enqueue(neighbor_id, slot_id);
            }
        }
    }

    let eliminations = options_before - domains.total_options();
    log::debug!(
        "Arc consistency reached after {revisions} revisions ({eliminations} words eliminated)"
    );

    Ok(ArcConsistencySuccess {
        revisions,
        eliminations,
    })
}

#[cfg(test)]
mod tests {
    use super::{all_arcs, establish_arc_consistency, ArcConsistencyFailure, ConsistencyQueue};
    use crate::domains::Domains;
    use crate::puzzle::Puzzle;
    use crate::word_list::WordList;

    fn node_consistent(puzzle: &Puzzle, word_list: &WordList) -> Domains {
        let mut domains = Domains::new(puzzle, word_list);
        domains.enforce_node_consistency(puzzle, word_list);
        domains
    }

    /// Every word left in each domain has a partner in every crossing slot's domain.
    fn assert_arc_consistent(puzzle: &Puzzle, word_list: &WordList, domains: &Domains) {
        for (x, y) in all_arcs(puzzle) {
            let (i, j) = puzzle.overlap(x, y).unwrap();
            for &wx in domains.options(x) {
                let glyph = word_list.word(wx).glyphs[i];
                assert!(
                    domains.options(y).iter().any(|&wy| word_list.word(wy).glyphs[j] == glyph),
                    "{} in slot {} has no support in slot {}",
                    word_list.word(wx).string,
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_queue_skips_pending_duplicates() {
        let mut queue = ConsistencyQueue::with_initial_queue(3, [(0, 1), (1, 0), (0, 1)]);
        queue.enqueue(1, 0);
        queue.enqueue(2, 0);

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_front())
            .map(|item| (item.slot_id, item.other_slot_id))
            .collect();
        assert_eq!(order, vec![(0, 1), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_queue_accepts_an_arc_again_once_popped() {
        let mut queue = ConsistencyQueue::with_initial_queue(3, [(0, 1), (2, 1)]);

        let first = queue.pop_front().unwrap();
        assert_eq!((first.slot_id, first.other_slot_id), (0, 1));

        // (2, 1) is still waiting; (0, 1) and (1, 2) are not.
        queue.enqueue(2, 1);
        queue.enqueue(0, 1);
        queue.enqueue(1, 2);

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_front())
            .map(|item| (item.slot_id, item.other_slot_id))
            .collect();
        assert_eq!(order, vec![(2, 1), (0, 1), (1, 2)]);
        assert!(queue.pending.is_empty());
    }

    #[test]
    fn test_all_arcs() {
        let puzzle = Puzzle::from_structure_str("_##\n___\n_##").unwrap();

        assert_eq!(all_arcs(&puzzle), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_crossing_pair_becomes_arc_consistent() {
        let puzzle = Puzzle::from_structure_str("_##\n___\n_##").unwrap();
        let word_list = WordList::new(["art", "car", "cat"]);
        let mut domains = node_consistent(&puzzle, &word_list);

        let success = establish_arc_consistency(&puzzle, &word_list, &mut domains, None).unwrap();

        assert_eq!(success.eliminations, 3);
        assert_eq!(domains.options(0), &[0]);
        assert_eq!(domains.options(1), &[1, 2]);
        assert_arc_consistent(&puzzle, &word_list, &domains);
    }

    #[test]
    fn test_propagation_reaches_slots_beyond_the_first_arc() {
        // #___#
        // #_##_
        // #_##_
        // #_##_
        // #____
        let puzzle = Puzzle::from_structure_str("#___#\n#_##_\n#_##_\n#_##_\n#____").unwrap();
        let word_list = WordList::new([
            "one", "two", "six", "ten", "other", "three", "seven", "eight", "rose", "nine", "four",
            "five", "tone",
        ]);
        let mut domains = node_consistent(&puzzle, &word_list);

        establish_arc_consistency(&puzzle, &word_list, &mut domains, None).unwrap();

        assert_arc_consistent(&puzzle, &word_list, &domains);
        for slot_id in 0..puzzle.slot_count() {
            assert!(!domains.is_empty(slot_id));
        }
    }

    #[test]
    fn test_wipeout_is_reported() {
        // ___
        // _##
        let puzzle = Puzzle::from_structure_str("___\n_##").unwrap();
        let word_list = WordList::new(["abc", "xy"]);
        let mut domains = node_consistent(&puzzle, &word_list);

        // The only across word starts with A; the only down word starts with X.
        let result = establish_arc_consistency(&puzzle, &word_list, &mut domains, None);

        assert_eq!(result, Err(ArcConsistencyFailure { slot_id: 0 }));
        assert!(domains.is_empty(0));
    }

    #[test]
    fn test_empty_domain_fails_before_revising() {
        let puzzle = Puzzle::from_structure_str("____\n_###\n_###").unwrap();
        let word_list = WordList::new(["cat", "car"]);
        let mut domains = node_consistent(&puzzle, &word_list);

        let result = establish_arc_consistency(&puzzle, &word_list, &mut domains, None);

        assert_eq!(result, Err(ArcConsistencyFailure { slot_id: 0 }));
    }

    #[test]
    fn test_explicit_arcs_limit_the_initial_worklist() {
        let puzzle = Puzzle::from_structure_str("_##\n___\n_##").unwrap();
        let word_list = WordList::new(["art", "car", "cat"]);
        let mut domains = node_consistent(&puzzle, &word_list);

        // Only the down slot gets revised. Its middle letter has to start an across word, which
        // rules out ART; the across slot is never revised, so it keeps all three.
        let arcs: &[(usize, usize)] = &[(1, 0)];
        let success =
            establish_arc_consistency(&puzzle, &word_list, &mut domains, Some(arcs)).unwrap();

        assert_eq!(success.revisions, 1);
        assert_eq!(domains.options(1), &[1, 2]);
        assert_eq!(domains.len(0), 3);
    }

    #[test]
    fn test_isolated_slots_are_trivially_consistent() {
        let puzzle = Puzzle::from_structure_str("__#__").unwrap();
        let word_list = WordList::new(["ab"]);
        let mut domains = node_consistent(&puzzle, &word_list);

        let success = establish_arc_consistency(&puzzle, &word_list, &mut domains, None).unwrap();

        assert_eq!(success.revisions, 0);
        assert_eq!(domains.len(0), 1);
        assert_eq!(domains.len(1), 1);
    }
}
