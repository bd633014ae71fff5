//! Grid filling: node consistency, one global arc-consistency pass, then a recursive backtracking
//! search over the frozen domains.
//!
//! Slots are chosen by minimum remaining values, then by highest degree, then by lowest `SlotId`.
//! Words are tried in least-constraining-value order, then by lowest `WordId`. Both orders are
//! total, so the same input always produces the same fill.

use instant::{Duration, Instant};
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::arc_consistency::{establish_arc_consistency, ArcConsistencyFailure};
use crate::assignment::{Assignment, Choice};
use crate::domains::{Domains, GlyphCountsByCell};
use crate::puzzle::{Crossing, Puzzle, SlotId};
use crate::word_list::{WordId, WordList};
use crate::MAX_SLOT_LENGTH;

/// Runtime knobs for a fill. The defaults impose no limits.
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    /// Give up once this much time has passed since the fill started.
    pub time_limit: Option<Duration>,

    /// Give up as soon as this flag is set, e.g. from another thread.
    pub abort: Option<Arc<AtomicBool>>,
}

impl FillOptions {
    pub fn with_time_limit(mut self, time_limit: Duration) -> FillOptions {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_abort(mut self, abort: Arc<AtomicBool>) -> FillOptions {
        self.abort = Some(abort);
        self
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Search states visited (one per slot selection).
    pub states: u64,
    /// Search states that ran out of candidates.
    pub backtracks: u64,
    /// Arcs revised by the initial arc-consistency pass.
    pub revisions: usize,
    /// Words removed by the initial arc-consistency pass.
    pub eliminations: usize,
    pub arc_consistency_duration: Duration,
    pub duration: Duration,
}

/// A struct representing the results of a successful fill.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,

    /// The domains the search ran against, after node and arc consistency.
    pub domains: Domains,
}

/// Why a fill produced no assignment. `DomainWipeout` and `HardFailure` both mean the puzzle has
/// no solution; `Abort` and `Timeout` mean the search stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillFailure {
    /// Arc consistency left this slot with no options, so search never started.
    DomainWipeout { slot_id: SlotId },
    /// Search tried every candidate without finding a complete fill.
    HardFailure,
    Abort,
    Timeout,
}

impl FillFailure {
    /// Did we prove that no fill exists (as opposed to stopping early)?
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, FillFailure::DomainWipeout { .. } | FillFailure::HardFailure)
    }
}

/// State shared by every frame of one backtracking search. Domains are read-only here.
struct Search<'a> {
    puzzle: &'a Puzzle,
    word_list: &'a WordList,
    domains: &'a Domains,
    glyph_counts_by_slot: Vec<GlyphCountsByCell>,
    abort: Option<&'a AtomicBool>,
    deadline: Option<Instant>,
    statistics: Statistics,
}

impl<'a> Search<'a> {
    fn new(
        puzzle: &'a Puzzle,
        word_list: &'a WordList,
        domains: &'a Domains,
        options: &'a FillOptions,
        start: Instant,
    ) -> Search<'a> {
        Search {
            puzzle,
            word_list,
            domains,
            glyph_counts_by_slot: (0..puzzle.slot_count())
                .map(|slot_id| domains.build_glyph_counts_by_cell(puzzle, word_list, slot_id))
                .collect(),
            abort: options.abort.as_deref(),
            deadline: options.time_limit.map(|time_limit| start + time_limit),
            statistics: Statistics::default(),
        }
    }

    fn check_interrupts(&self) -> Result<(), FillFailure> {
        if self.abort.is_some_and(|abort| abort.load(Ordering::Relaxed)) {
            return Err(FillFailure::Abort);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(FillFailure::Timeout);
        }
        Ok(())
    }

    /// Pick the unassigned slot with the fewest options, preferring slots that cross more others.
    fn select_unassigned_slot(&self, assignment: &Assignment) -> Option<SlotId> {
        (0..self.puzzle.slot_count())
            .filter(|&slot_id| !assignment.is_assigned(slot_id))
            .min_by_key(|&slot_id| {
                (
                    self.domains.len(slot_id),
                    Reverse(self.puzzle.degree(slot_id)),
                    slot_id,
                )
            })
    }

    /// How many options would choosing `word_id` for `slot_id` rule out across the given
    /// crossings? A crossing word is ruled out if it disagrees at the shared cell, or if it's the
    /// very same word.
    fn count_ruled_out(&self, word_id: WordId, crossings: &[(usize, Crossing)]) -> usize {
        let word = self.word_list.word(word_id);

        crossings
            .iter()
            .map(|&(cell_idx, crossing)| {
                let Crossing {
                    other_slot_id,
                    other_slot_cell,
                } = crossing;
                let glyph = word.glyphs[cell_idx];

                let mut compatible =
                    self.glyph_counts_by_slot[other_slot_id][other_slot_cell][glyph] as usize;
                if word.glyphs.get(other_slot_cell) == Some(&glyph)
                    && self.domains.contains(other_slot_id, word_id)
                {
                    compatible -= 1;
                }

                self.domains.len(other_slot_id) - compatible
            })
            .sum()
    }

    /// The slot's options, least constraining first.
    fn order_domain_values(&self, slot_id: SlotId, assignment: &Assignment) -> Vec<WordId> {
        let open_crossings: SmallVec<[(usize, Crossing); MAX_SLOT_LENGTH]> = self
            .puzzle
            .crossings(slot_id)
            .iter()
            .enumerate()
            .filter_map(|(cell_idx, crossing_opt)| {
                crossing_opt
                    .filter(|crossing| !assignment.is_assigned(crossing.other_slot_id))
                    .map(|crossing| (cell_idx, crossing))
            })
            .collect();

        let mut ranked: Vec<(usize, WordId)> = self
            .domains
            .options(slot_id)
            .iter()
            .map(|&word_id| (self.count_ruled_out(word_id, &open_crossings), word_id))
            .collect();
        ranked.sort_unstable();

        ranked.into_iter().map(|(_, word_id)| word_id).collect()
    }

    /// Extend `assignment` to a complete, consistent fill. Returns `Ok(true)` with the assignment
    /// complete, or `Ok(false)` with the assignment restored to how it was passed in.
    fn backtrack(&mut self, assignment: &mut Assignment) -> Result<bool, FillFailure> {
        self.check_interrupts()?;

        let Some(slot_id) = self.select_unassigned_slot(assignment) else {
            return Ok(true);
        };

        self.statistics.states += 1;
        log::trace!(
            "State {}: filling slot {} ({} options, {} of {} slots filled)",
            self.statistics.states,
            slot_id,
            self.domains.len(slot_id),
            assignment.len(),
            self.puzzle.slot_count()
        );

        for word_id in self.order_domain_values(slot_id, assignment) {
            let choice = Choice { slot_id, word_id };

            assignment.assign(choice);
            if assignment.is_choice_consistent(self.puzzle, self.word_list, choice)
                && self.backtrack(assignment)?
            {
                return Ok(true);
            }
            assignment.unassign(slot_id);
        }

        self.statistics.backtracks += 1;
        Ok(false)
    }
}

/// Search for a complete fill of `puzzle` using words from `word_list`.
pub fn find_fill(
    puzzle: &Puzzle,
    word_list: &WordList,
    options: &FillOptions,
) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();

    let mut domains = Domains::new(puzzle, word_list);
    domains.enforce_node_consistency(puzzle, word_list);

    let arc_consistency = match establish_arc_consistency(puzzle, word_list, &mut domains, None) {
        Ok(success) => success,
        Err(ArcConsistencyFailure { slot_id }) => {
            log::info!("No fill: slot {slot_id} has no options after arc consistency");
            return Err(FillFailure::DomainWipeout { slot_id });
        }
    };
    let arc_consistency_duration = start.elapsed();

    let mut assignment = Assignment::new(puzzle.slot_count());
    let mut search = Search::new(puzzle, word_list, &domains, options, start);
    let result = search.backtrack(&mut assignment);

    let mut statistics = search.statistics;
    statistics.revisions = arc_consistency.revisions;
    statistics.eliminations = arc_consistency.eliminations;
    statistics.arc_consistency_duration = arc_consistency_duration;
    statistics.duration = start.elapsed();

    match result {
        Ok(true) => {
            debug_assert!(assignment.is_complete());
            debug_assert!(assignment.is_consistent(puzzle, word_list));
            log::info!(
                "Filled {} slots in {:?} ({} states, {} backtracks)",
                puzzle.slot_count(),
                statistics.duration,
                statistics.states,
                statistics.backtracks
            );
            Ok(FillSuccess {
                statistics,
                assignment,
                domains,
            })
        }
        Ok(false) => {
            log::info!(
                "No fill: search exhausted after {} states in {:?}",
                statistics.states,
                statistics.duration
            );
            Err(FillFailure::HardFailure)
        }
        Err(failure) => {
            log::info!("Search stopped early ({failure:?}) after {} states", statistics.states);
            Err(failure)
        }
    }
}
