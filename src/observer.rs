//! Hooks for watching the search as it runs. The search emits the same events in the same order
//! whether or not anything is listening, and the default [`NoopObserver`] discards them.

use log::trace;

use crate::assignment::Assignment;
use crate::grid::{Grid, Slot, SlotId};
use crate::letter_grid::LetterGrid;
use crate::word_list::WordList;

/// Why a candidate word was turned down for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The word repeats an assigned word or disagrees with an assigned crossing.
    Inconsistent,

    /// Choosing the word would leave the given unassigned slot without any options.
    DomainWipeout { slot_id: SlotId },
}

/// A single step of the search.
///
/// `assignment` is the partial assignment the step leaves behind: it includes the word for
/// `ValueAttempted` and `ValueAccepted`, and excludes it for `ValueRejected` and `Backtracked`.
#[derive(Debug, Clone, Copy)]
pub enum FillEvent<'a> {
    SlotSelected {
        slot_id: SlotId,
        slot: &'a Slot,
        remaining_values: usize,
        assignment: &'a Assignment,
    },
    ValueAttempted {
        slot_id: SlotId,
        slot: &'a Slot,
        word: &'a str,
        assignment: &'a Assignment,
    },
    ValueAccepted {
        slot_id: SlotId,
        slot: &'a Slot,
        word: &'a str,
        assignment: &'a Assignment,
    },
    ValueRejected {
        slot_id: SlotId,
        slot: &'a Slot,
        word: &'a str,
        reason: RejectionReason,
        assignment: &'a Assignment,
    },
    Backtracked {
        slot_id: SlotId,
        slot: &'a Slot,
        word: &'a str,
        assignment: &'a Assignment,
    },
}

impl<'a> FillEvent<'a> {
    /// A stable snake_case name for the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            FillEvent::SlotSelected { .. } => "slot_selected",
            FillEvent::ValueAttempted { .. } => "value_attempted",
            FillEvent::ValueAccepted { .. } => "value_accepted",
            FillEvent::ValueRejected { .. } => "value_rejected",
            FillEvent::Backtracked { .. } => "backtracked",
        }
    }

    pub fn slot_id(&self) -> SlotId {
        match *self {
            FillEvent::SlotSelected { slot_id, .. }
            | FillEvent::ValueAttempted { slot_id, .. }
            | FillEvent::ValueAccepted { slot_id, .. }
            | FillEvent::ValueRejected { slot_id, .. }
            | FillEvent::Backtracked { slot_id, .. } => slot_id,
        }
    }

    pub fn slot(&self) -> &'a Slot {
        match *self {
            FillEvent::SlotSelected { slot, .. }
            | FillEvent::ValueAttempted { slot, .. }
            | FillEvent::ValueAccepted { slot, .. }
            | FillEvent::ValueRejected { slot, .. }
            | FillEvent::Backtracked { slot, .. } => slot,
        }
    }

    /// The word involved, for every event except `SlotSelected`.
    pub fn word(&self) -> Option<&'a str> {
        match *self {
            FillEvent::SlotSelected { .. } => None,
            FillEvent::ValueAttempted { word, .. }
            | FillEvent::ValueAccepted { word, .. }
            | FillEvent::ValueRejected { word, .. }
            | FillEvent::Backtracked { word, .. } => Some(word),
        }
    }

    pub fn assignment(&self) -> &'a Assignment {
        match *self {
            FillEvent::SlotSelected { assignment, .. }
            | FillEvent::ValueAttempted { assignment, .. }
            | FillEvent::ValueAccepted { assignment, .. }
            | FillEvent::ValueRejected { assignment, .. }
            | FillEvent::Backtracked { assignment, .. } => assignment,
        }
    }
}

/// Receives search events. Observers can't influence the search; they only see it.
pub trait FillObserver {
    fn on_event(&mut self, event: &FillEvent<'_>);
}

impl<O: FillObserver + ?Sized> FillObserver for &mut O {
    fn on_event(&mut self, event: &FillEvent<'_>) {
        (**self).on_event(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FillObserver for NoopObserver {
    #[inline(always)]
    fn on_event(&mut self, _event: &FillEvent<'_>) {}
}

/// Forwards every event to the `log` facade at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl FillObserver for LoggingObserver {
    fn on_event(&mut self, event: &FillEvent<'_>) {
        let slot = event.slot();

        match event {
            FillEvent::SlotSelected { remaining_values, assignment, .. } => trace!(
                "{} {:?} at ({}, {}) with {} options, {} slots filled",
                event.name(),
                slot.direction,
                slot.row,
                slot.col,
                remaining_values,
                assignment.len(),
            ),
            FillEvent::ValueRejected { word, reason, .. } => trace!(
                "{} {:?} at ({}, {}): {} ({:?})",
                event.name(),
                slot.direction,
                slot.row,
                slot.col,
                word,
                reason,
            ),
            _ => trace!(
                "{} {:?} at ({}, {}): {}",
                event.name(),
                slot.direction,
                slot.row,
                slot.col,
                event.word().unwrap_or_default(),
            ),
        }
    }
}

/// A recorded search step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 1-based position in the event sequence.
    pub number: usize,
    pub kind: &'static str,
    pub slot: Slot,
    pub word: Option<String>,
    pub reason: Option<RejectionReason>,

    /// Snapshot of the grid for attempts, placements and backtracks.
    pub letters: Option<LetterGrid>,
}

/// Records every event as a numbered [`Step`], with a letter grid snapshot where the grid
/// changed. Intended for hosts that replay the search visually after (or while) it runs.
#[derive(Debug)]
pub struct StepRecorder<'a> {
    grid: &'a Grid,
    words: &'a WordList,
    steps: Vec<Step>,
    recorded: usize,
}

impl<'a> StepRecorder<'a> {
    pub fn new(grid: &'a Grid, words: &'a WordList) -> StepRecorder<'a> {
        StepRecorder { grid, words, steps: vec![], recorded: 0 }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Hand over the steps recorded so far, leaving the recorder empty but still numbering
    /// from where it left off.
    pub fn drain(&mut self) -> Vec<Step> {
        std::mem::take(&mut self.steps)
    }
}

impl<'a> FillObserver for StepRecorder<'a> {
    fn on_event(&mut self, event: &FillEvent<'_>) {
        let letters = match event {
            FillEvent::ValueAttempted { assignment, .. }
            | FillEvent::ValueAccepted { assignment, .. }
            | FillEvent::Backtracked { assignment, .. } => {
                Some(LetterGrid::project(self.grid, self.words, assignment))
            }
            FillEvent::SlotSelected { .. } | FillEvent::ValueRejected { .. } => None,
        };
        let reason = match event {
            FillEvent::ValueRejected { reason, .. } => Some(*reason),
            _ => None,
        };

        self.recorded += 1;
        self.steps.push(Step {
            number: self.recorded,
            kind: event.name(),
            slot: *event.slot(),
            word: event.word().map(str::to_string),
            reason,
            letters,
        });
    }
}
