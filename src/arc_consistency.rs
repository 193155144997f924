//! This module contains a crossword-specific implementation of the AC-3 algorithm. For our
//! purposes, a grid is arc-consistent when every remaining option for every slot places a letter
//! in each crossed cell that at least one remaining option of the crossing slot also places there.
//! For example, if 1D doesn't have any options starting with the letter A, we remove any options
//! for 1A that start with the letter A.
//!
//! We keep revising arcs until no more eliminations are possible or some slot runs out of options.
//! Distinctness isn't a crossing constraint, so it's left to the search.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::domains::Domains;
use crate::grid::{Grid, SlotId};
use crate::word_list::{WordId, WordList};

/// A directed constraint arc: revising it removes options from `slot_id` that have no support in
/// `neighbor_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintArc {
    pub slot_id: SlotId,
    pub neighbor_id: SlotId,
}

/// Result from a successful call to `establish_arc_consistency`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many arcs were revised.
    pub revisions: usize,

    /// How many (slot, word) options were removed in total.
    pub eliminations: usize,
}

/// Result from a failed call to `establish_arc_consistency`: some slot lost all of its options,
/// so no assignment extending the current domains exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub wiped_out_slot_id: SlotId,
    pub revisions: usize,
    pub eliminations: usize,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Worklist of arcs waiting to be revised. An arc that's already waiting isn't added twice.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<ConstraintArc>,
    queued: HashSet<ConstraintArc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
    where
        Items: IntoIterator<Item = ConstraintArc>,
    {
        let mut queue = ConsistencyQueue { queue: VecDeque::new(), queued: HashSet::new() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<ConstraintArc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: ConstraintArc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Both directed arcs for every crossing in the grid, in slot order.
pub fn all_arcs(grid: &Grid) -> Vec<ConstraintArc> {
    grid.slot_ids()
        .flat_map(|slot_id| {
            grid.neighbors(slot_id).map(move |(_, crossing)| ConstraintArc {
                slot_id,
                neighbor_id: crossing.other_slot_id,
            })
        })
        .collect()
}

/// Remove every option of `arc.slot_id` with no supporting option in `arc.neighbor_id`, returning
/// how many were removed.
fn eliminate_unsupported(
    grid: &Grid,
    words: &WordList,
    domains: &mut Domains,
    arc: ConstraintArc,
) -> usize {
    let Some((cell_idx, neighbor_cell)) = grid.overlap(arc.slot_id, arc.neighbor_id) else {
        return 0;
    };

    // Which letters can the neighbor still place in the shared cell? An option is supported iff
    // its own letter for that cell is one of them.
    let supported_glyphs: HashSet<char> = domains
        .values(arc.neighbor_id)
        .filter_map(|word_id| words[word_id].glyphs.get(neighbor_cell).copied())
        .collect();

    let unsupported: Vec<WordId> = domains
        .values(arc.slot_id)
        .filter(|&word_id| {
            words[word_id]
                .glyphs
                .get(cell_idx)
                .map_or(true, |glyph| !supported_glyphs.contains(glyph))
        })
        .collect();

    for &word_id in &unsupported {
        domains.remove(arc.slot_id, word_id);
    }

    unsupported.len()
}

/// Revise a single arc without propagating. Returns whether the slot's domain changed.
pub fn revise(grid: &Grid, words: &WordList, domains: &mut Domains, arc: ConstraintArc) -> bool {
    eliminate_unsupported(grid, words, domains, arc) > 0
}

/// Run AC-3 over the domains in place. With `initial_arcs` of `None`, every arc in the grid is
/// checked; otherwise only the given arcs are queued at first, which is enough when the domains
/// were arc-consistent before some slots were narrowed. Whenever a slot loses options, the arcs
/// pointing into it from its other neighbors are queued again.
///
/// Fails as soon as any slot's domain becomes empty, leaving the remaining queue unprocessed.
pub fn establish_arc_consistency(
    grid: &Grid,
    words: &WordList,
    domains: &mut Domains,
    initial_arcs: Option<Vec<ConstraintArc>>,
) -> ArcConsistencyResult {
    let mut queue = match initial_arcs {
        Some(arcs) => ConsistencyQueue::with_initial_queue(arcs),
        None => ConsistencyQueue::with_initial_queue(all_arcs(grid)),
    };

    let mut success = ArcConsistencySuccess::default();

    while let Some(arc) = queue.pop_front() {
        success.revisions += 1;

        let eliminated = eliminate_unsupported(grid, words, domains, arc);
        if eliminated == 0 {
            continue;
        }
        success.eliminations += eliminated;

        if domains.len(arc.slot_id) == 0 {
            debug!(
                "Slot {} wiped out by slot {} after {} revisions",
                arc.slot_id, arc.neighbor_id, success.revisions
            );
            return Err(ArcConsistencyFailure {
                wiped_out_slot_id: arc.slot_id,
                revisions: success.revisions,
                eliminations: success.eliminations,
            });
        }

        for (_, crossing) in grid.neighbors(arc.slot_id) {
            if crossing.other_slot_id != arc.neighbor_id {
                queue.enqueue(ConstraintArc {
                    slot_id: crossing.other_slot_id,
                    neighbor_id: arc.slot_id,
                });
            }
        }
    }

    Ok(success)
}
