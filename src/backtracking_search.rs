//! This module implements grid-filling using a depth-first backtracking search. Slots are chosen
//! with the minimum-remaining-values heuristic, ties going to the slot that crosses the most
//! unfilled slots and then to the lowest slot id; words are tried in least-constraining-value
//! order (or plain lexicographic order, if requested).
//!
//! Every branch works on its own copy of the assignment and of the domains, so backtracking is
//! just a matter of dropping the copies.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use instant::{Duration, Instant};
use log::{debug, info};

use crate::arc_consistency::{establish_arc_consistency, revise, ConstraintArc};
use crate::assignment::{Assignment, Choice};
use crate::consistency::{crossing_agrees, is_consistent, is_valid_fill};
use crate::domains::Domains;
use crate::grid::{Grid, SlotId};
use crate::observer::{FillEvent, FillObserver, RejectionReason};
use crate::word_list::{WordId, WordList};

/// How many search states we visit between checks of the deadline and abort flag.
pub const INTERRUPT_FREQUENCY: u64 = 10;

/// The order in which candidate words are tried for a slot. This decides which fill is found
/// when there's more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueOrdering {
    /// Words that rule out the fewest options in unfilled slots go first; ties go to the
    /// lexicographically smaller word.
    #[default]
    LeastConstraining,

    /// Lexicographic order.
    Lexicographic,
}

/// What we do to the remaining domains after tentatively placing a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inference {
    /// Nothing: every candidate is checked against the assignment as it's tried, and slot
    /// selection counts the candidates that would pass.
    None,

    /// Remove incompatible options from each unfilled crossing slot and remove the word from
    /// every other unfilled slot. A word that empties any slot is rejected.
    #[default]
    ForwardChecking,

    /// Like forward checking, then restore arc consistency across the whole grid.
    MaintainArcConsistency,
}

/// Settings for a fill attempt.
#[derive(Debug, Clone)]
pub struct FillOptions {
    pub value_ordering: ValueOrdering,
    pub inference: Inference,

    /// Run AC-3 over the whole grid before searching.
    pub initial_arc_consistency: bool,

    /// Give up with `FillFailure::Timeout` once this passes.
    pub deadline: Option<Instant>,

    /// Give up with `FillFailure::Abort` once this is set.
    pub abort: Option<Arc<AtomicBool>>,
}

impl Default for FillOptions {
    fn default() -> Self {
        FillOptions {
            value_ordering: ValueOrdering::default(),
            inference: Inference::default(),
            initial_arc_consistency: true,
            deadline: None,
            abort: None,
        }
    }
}

impl FillOptions {
    /// Set the deadline to `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Number of times we chose a slot to fill.
    pub states: u64,

    /// Number of words tried across all slots.
    pub attempts: u64,

    /// Number of accepted words we later had to take back.
    pub backtracks: u64,

    /// Options removed by the initial arc consistency pass.
    pub initial_eliminations: usize,

    pub duration: Duration,
}

/// A struct representing the results of a successful fill.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillFailure {
    /// No assignment satisfies every constraint with the given word list.
    NoSolution,
    Timeout,
    Abort,
}

pub type FillResult = Result<FillSuccess, FillFailure>;

/// Search for a valid fill for the given grid and word list: build node-consistent domains,
/// optionally make them arc-consistent, then search.
///
/// Only a successful fill carries [`Statistics`]. A `FillFailure` says why the fill stopped but not
/// how much work it took; hosts that need that for failed fills can count the observer's events,
/// which arrive the same way whether or not a fill is found.
pub fn find_fill<O: FillObserver>(
    grid: &Grid,
    words: &WordList,
    options: &FillOptions,
    observer: &mut O,
) -> FillResult {
    let start = Instant::now();

    info!("Filling {} slots from {} words", grid.slot_count(), words.len());

    let mut domains = Domains::node_consistent(grid, words);
    if let Some(slot_id) = domains.empty_slot() {
        info!("No fill: no words of length {} for slot {}", grid.slot(slot_id).length, slot_id);
        return Err(FillFailure::NoSolution);
    }

    let mut initial_eliminations = 0;
    if options.initial_arc_consistency {
        match establish_arc_consistency(grid, words, &mut domains, None) {
            Ok(success) => {
                debug!(
                    "Initial arc consistency removed {} options in {} revisions",
                    success.eliminations, success.revisions
                );
                initial_eliminations = success.eliminations;
            }
            Err(failure) => {
                info!("No fill: arc consistency wiped out slot {}", failure.wiped_out_slot_id);
                return Err(FillFailure::NoSolution);
            }
        }
    }

    let mut result = find_fill_from_domains(grid, words, domains, options, observer);
    if let Ok(success) = &mut result {
        success.statistics.initial_eliminations = initial_eliminations;
        success.statistics.duration = start.elapsed();
    }
    result
}

/// Search for a valid fill starting from caller-supplied domains, which must hold only words of
/// the right length for each slot (as `Domains::node_consistent` builds them). No preprocessing
/// happens here.
pub fn find_fill_from_domains<O: FillObserver>(
    grid: &Grid,
    words: &WordList,
    domains: Domains,
    options: &FillOptions,
    observer: &mut O,
) -> FillResult {
    let start = Instant::now();

    let mut search = Search {
        grid,
        words,
        options,
        observer,
        statistics: Statistics::default(),
    };
    let outcome = search.backtrack(&Assignment::empty(grid.slot_count()), &domains);

    let mut statistics = search.statistics;
    statistics.duration = start.elapsed();

    match outcome {
        Ok(Some(assignment)) => {
            debug_assert!(is_valid_fill(grid, words, &assignment));
            info!("Found a fill: {:?}", statistics);
            Ok(FillSuccess { statistics, assignment })
        }
        Ok(None) => {
            info!("No fill: search exhausted ({:?})", statistics);
            Err(FillFailure::NoSolution)
        }
        Err(failure) => {
            info!("Fill interrupted: {:?} ({:?})", failure, statistics);
            Err(failure)
        }
    }
}

/// State shared across one recursive search.
struct Search<'a, O: FillObserver> {
    grid: &'a Grid,
    words: &'a WordList,
    options: &'a FillOptions,
    observer: &'a mut O,
    statistics: Statistics,
}

impl<'a, O: FillObserver> Search<'a, O> {
    /// Extend `assignment` to a complete one, returning `Ok(None)` once every option below this
    /// point has been exhausted. `domains` holds the options still open for each slot on this
    /// branch.
    fn backtrack(
        &mut self,
        assignment: &Assignment,
        domains: &Domains,
    ) -> Result<Option<Assignment>, FillFailure> {
        if assignment.is_complete() {
            return Ok(Some(assignment.clone()));
        }

        self.check_interrupt()?;
        self.statistics.states += 1;

        let Some((slot_id, remaining_values)) = self.select_unassigned_slot(assignment, domains)
        else {
            return Ok(Some(assignment.clone()));
        };
        let slot = self.grid.slot(slot_id);

        self.observer.on_event(&FillEvent::SlotSelected {
            slot_id,
            slot,
            remaining_values,
            assignment,
        });

        for word_id in self.order_values(slot_id, assignment, domains) {
            let word = self.words[word_id].string.as_str();
            let extended = assignment.with(Choice { slot_id, word_id });
            self.statistics.attempts += 1;

            self.observer.on_event(&FillEvent::ValueAttempted {
                slot_id,
                slot,
                word,
                assignment: &extended,
            });

            if !is_consistent(self.grid, self.words, assignment, slot_id, word_id) {
                self.observer.on_event(&FillEvent::ValueRejected {
                    slot_id,
                    slot,
                    word,
                    reason: RejectionReason::Inconsistent,
                    assignment,
                });
                continue;
            }

            let narrowed = match self.narrow_domains(&extended, domains, slot_id, word_id) {
                Ok(narrowed) => narrowed,
                Err(wiped_out_slot_id) => {
                    self.observer.on_event(&FillEvent::ValueRejected {
                        slot_id,
                        slot,
                        word,
                        reason: RejectionReason::DomainWipeout { slot_id: wiped_out_slot_id },
                        assignment,
                    });
                    continue;
                }
            };

            self.observer.on_event(&FillEvent::ValueAccepted {
                slot_id,
                slot,
                word,
                assignment: &extended,
            });

            if let Some(solution) = self.backtrack(&extended, &narrowed)? {
                return Ok(Some(solution));
            }

            self.statistics.backtracks += 1;
            self.observer.on_event(&FillEvent::Backtracked { slot_id, slot, word, assignment });
        }

        Ok(None)
    }

    fn check_interrupt(&self) -> Result<(), FillFailure> {
        if self.statistics.states % INTERRUPT_FREQUENCY != 0 {
            return Ok(());
        }

        if let Some(deadline) = self.options.deadline {
            if Instant::now() > deadline {
                return Err(FillFailure::Timeout);
            }
        }
        if let Some(abort) = &self.options.abort {
            if abort.load(Ordering::Relaxed) {
                return Err(FillFailure::Abort);
            }
        }

        Ok(())
    }

    /// How many options for this slot are still compatible with the assignment? With inference
    /// enabled, the branch's domains already only hold compatible options.
    fn remaining_values(&self, slot_id: SlotId, assignment: &Assignment, domains: &Domains) -> usize {
        match self.options.inference {
            Inference::None => domains
                .values(slot_id)
                .filter(|&word_id| is_consistent(self.grid, self.words, assignment, slot_id, word_id))
                .count(),
            Inference::ForwardChecking | Inference::MaintainArcConsistency => domains.len(slot_id),
        }
    }

    /// How many unfilled slots does this slot cross?
    fn degree(&self, slot_id: SlotId, assignment: &Assignment) -> usize {
        self.grid
            .neighbors(slot_id)
            .filter(|(_, crossing)| !assignment.is_assigned(crossing.other_slot_id))
            .count()
    }

    /// Choose the unfilled slot with the fewest remaining options, preferring slots with more
    /// unfilled crossings and then lower slot ids. Returns the slot and its option count.
    fn select_unassigned_slot(
        &self,
        assignment: &Assignment,
        domains: &Domains,
    ) -> Option<(SlotId, usize)> {
        self.grid
            .slot_ids()
            .filter(|&slot_id| !assignment.is_assigned(slot_id))
            .map(|slot_id| (slot_id, self.remaining_values(slot_id, assignment, domains)))
            .min_by_key(|&(slot_id, remaining_values)| {
                (remaining_values, Reverse(self.degree(slot_id, assignment)), slot_id)
            })
    }

    /// The slot's options in the order we should try them. Least-constraining order counts every
    /// option the word would remove from unfilled slots exactly once: crossing options with the
    /// wrong letter in the shared cell, plus copies of the word itself.
    fn order_values(
        &self,
        slot_id: SlotId,
        assignment: &Assignment,
        domains: &Domains,
    ) -> Vec<WordId> {
        let mut values: Vec<WordId> = domains.values(slot_id).collect();

        if self.options.value_ordering == ValueOrdering::Lexicographic {
            return values;
        }

        // For each unfilled crossing, count how many of its options place each letter in the
        // shared cell. A word rules out every crossing option that doesn't match its letter.
        let crossing_counts: Vec<(usize, usize, HashMap<char, usize>)> = self
            .grid
            .neighbors(slot_id)
            .filter(|(_, crossing)| !assignment.is_assigned(crossing.other_slot_id))
            .map(|(cell_idx, crossing)| {
                let mut glyph_counts: HashMap<char, usize> = HashMap::new();
                for other_word_id in domains.values(crossing.other_slot_id) {
                    if let Some(&glyph) = self.words[other_word_id].glyphs.get(crossing.other_slot_cell) {
                        *glyph_counts.entry(glyph).or_insert(0) += 1;
                    }
                }
                (cell_idx, domains.len(crossing.other_slot_id), glyph_counts)
            })
            .collect();

        // A word also rules itself out of every other unfilled slot that still offers it. In a
        // crossing slot that copy is only counted when its letter matches, since otherwise the
        // crossing count above already covers it.
        let other_unfilled_slots: Vec<(SlotId, Option<(usize, usize)>)> = self
            .grid
            .slot_ids()
            .filter(|&other_slot_id| {
                other_slot_id != slot_id
                    && !assignment.is_assigned(other_slot_id)
                    && self.grid.slot(other_slot_id).length == self.grid.slot(slot_id).length
            })
            .map(|other_slot_id| (other_slot_id, self.grid.overlap(slot_id, other_slot_id)))
            .collect();

        values.sort_by_cached_key(|&word_id| {
            let word = &self.words[word_id];

            let crossing_eliminations: usize = crossing_counts
                .iter()
                .map(|(cell_idx, option_count, glyph_counts)| {
                    let compatible = word
                        .glyphs
                        .get(*cell_idx)
                        .and_then(|glyph| glyph_counts.get(glyph))
                        .copied()
                        .unwrap_or(0);
                    option_count - compatible
                })
                .sum();

            let dupe_eliminations = other_unfilled_slots
                .iter()
                .filter(|(other_slot_id, overlap)| {
                    domains.contains(*other_slot_id, word_id)
                        && overlap.map_or(true, |(cell_idx, other_cell)| {
                            crossing_agrees(word, cell_idx, word, other_cell)
                        })
                })
                .count();

            (crossing_eliminations + dupe_eliminations, word_id)
        });

        values
    }

    /// Copy the domains and apply the configured inference for a newly placed word. Returns the
    /// id of a slot left without options if the word can't work.
    fn narrow_domains(
        &self,
        extended: &Assignment,
        domains: &Domains,
        slot_id: SlotId,
        word_id: WordId,
    ) -> Result<Domains, SlotId> {
        let mut narrowed = domains.clone();
        narrowed.restrict_to(slot_id, word_id);

        if self.options.inference == Inference::None {
            return Ok(narrowed);
        }

        let mut changed_slot_ids: Vec<SlotId> = vec![slot_id];

        for other_slot_id in self.grid.slot_ids() {
            if other_slot_id == slot_id || extended.is_assigned(other_slot_id) {
                continue;
            }
            if narrowed.remove(other_slot_id, word_id) {
                if narrowed.len(other_slot_id) == 0 {
                    return Err(other_slot_id);
                }
                changed_slot_ids.push(other_slot_id);
            }
        }

        match self.options.inference {
            Inference::ForwardChecking => {
                for (_, crossing) in self.grid.neighbors(slot_id) {
                    if extended.is_assigned(crossing.other_slot_id) {
                        continue;
                    }

                    let arc = ConstraintArc { slot_id: crossing.other_slot_id, neighbor_id: slot_id };
                    if revise(self.grid, self.words, &mut narrowed, arc)
                        && narrowed.len(crossing.other_slot_id) == 0
                    {
                        return Err(crossing.other_slot_id);
                    }
                }
            }
            Inference::MaintainArcConsistency => {
                let arcs: Vec<ConstraintArc> = changed_slot_ids
                    .iter()
                    .flat_map(|&changed_slot_id| {
                        self.grid.neighbors(changed_slot_id).map(move |(_, crossing)| ConstraintArc {
                            slot_id: crossing.other_slot_id,
                            neighbor_id: changed_slot_id,
                        })
                    })
                    .collect();

                establish_arc_consistency(self.grid, self.words, &mut narrowed, Some(arcs))
                    .map_err(|failure| failure.wiped_out_slot_id)?;
            }
            Inference::None => {}
        }

        Ok(narrowed)
    }
}
