//! Integration tests for crossfill.
//!
//! These run the whole pipeline (structure parsing, domains, arc consistency and search) through
//! the public API, on small inline grids whose fills can be checked by hand.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossfill::arc_consistency::establish_arc_consistency;
use crossfill::consistency::is_valid_fill;
use crossfill::domains::Domains;
use crossfill::observer::{LoggingObserver, StepRecorder};
use crossfill::{
    find_fill, Assignment, FillFailure, FillOptions, FillResult, Grid, Inference, LetterGrid,
    NoopObserver, ValueOrdering, WordList,
};

fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(rows, '_').expect("Fixture grids are rectangular")
}

fn fill(grid: &Grid, words: &WordList, options: &FillOptions) -> FillResult {
    find_fill(grid, words, options, &mut NoopObserver)
}

/// The word in each slot, in slot order, with unassigned slots as empty strings.
fn slot_words(grid: &Grid, words: &WordList, assignment: &Assignment) -> Vec<String> {
    grid.slot_ids()
        .map(|slot_id| assignment.word(slot_id, words).unwrap_or_default().to_string())
        .collect()
}

/// Every combination of ordering, inference and preprocessing.
fn all_options() -> Vec<FillOptions> {
    let mut all = vec![];
    for value_ordering in [ValueOrdering::LeastConstraining, ValueOrdering::Lexicographic] {
        for inference in [Inference::None, Inference::ForwardChecking, Inference::MaintainArcConsistency] {
            for initial_arc_consistency in [true, false] {
                all.push(FillOptions {
                    value_ordering,
                    inference,
                    initial_arc_consistency,
                    ..FillOptions::default()
                });
            }
        }
    }
    all
}

/// cat
/// ore
/// wet
fn word_square() -> (Grid, WordList) {
    let grid = grid(&["___", "___", "___"]);
    let words = WordList::new(["cat", "ore", "wet", "cow", "are", "tet", "dog", "ear", "cab"]);
    (grid, words)
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn test_single_slot_takes_lowest_word() {
        let grid = grid(&["___"]);
        let words = WordList::new(["cat", "dog"]);

        let result = fill(&grid, &words, &FillOptions::default()).unwrap();
        assert_eq!(slot_words(&grid, &words, &result.assignment), vec!["cat"]);
    }

    #[test]
    fn test_crossing_slots_share_a_letter() {
        let grid = grid(&["____", "#_##", "#_##", "#_##"]);
        let words = WordList::new(["cats", "bats", "ants", "tree"]);

        assert_eq!(grid.overlap(0, 1), Some((1, 0)));

        for options in all_options() {
            let result = fill(&grid, &words, &options).unwrap();
            let across = result.assignment.word(0, &words).unwrap();
            let down = result.assignment.word(1, &words).unwrap();

            assert_eq!(across.chars().nth(1), down.chars().next(), "{options:?}");
        }
    }

    #[test]
    fn test_no_words_of_slot_length() {
        let grid = grid(&["_____"]);
        let words = WordList::new(["cat", "dog", "tree"]);
        let mut recorder = StepRecorder::new(&grid, &words);

        let result = find_fill(&grid, &words, &FillOptions::default(), &mut recorder);

        assert_eq!(result.unwrap_err(), FillFailure::NoSolution);
        assert!(recorder.steps().is_empty(), "no search happens when a domain starts empty");
    }

    #[test]
    fn test_disjoint_slots_use_distinct_words() {
        let grid = grid(&["___", "###", "___"]);
        let words = WordList::new(["dog", "cat"]);

        let result = fill(&grid, &words, &FillOptions::default()).unwrap();
        assert_eq!(slot_words(&grid, &words, &result.assignment), vec!["cat", "dog"]);
    }

    #[test]
    fn test_grid_without_slots() {
        let grid = grid(&["_#_", "#_#"]);
        let words = WordList::new(["cat"]);

        // Even an aborted fill succeeds when there's nothing to fill.
        let options = FillOptions { abort: Some(Arc::new(AtomicBool::new(true))), ..FillOptions::default() };
        let result = fill(&grid, &words, &options).unwrap();

        assert_eq!(grid.slot_count(), 0);
        assert!(result.assignment.is_complete());
    }

    #[test]
    fn test_structure_file_with_blank_lines() {
        let grid = Grid::parse("\n___\n_#_\n___\n\n", '_').unwrap();

        assert_eq!((grid.width(), grid.height()), (3, 3));
        assert_eq!(grid.slot_count(), 4);
    }
}

#[cfg(test)]
mod invariants {
    use super::*;

    #[test]
    fn test_every_fill_is_valid() {
        let (grid, words) = word_square();

        for options in all_options() {
            let result = fill(&grid, &words, &options)
                .unwrap_or_else(|failure| panic!("{options:?} failed: {failure:?}"));
            let assignment = &result.assignment;

            assert!(assignment.is_complete(), "{options:?}");
            assert!(is_valid_fill(&grid, &words, assignment), "{options:?}");

            for slot_id in grid.slot_ids() {
                let word = assignment.word(slot_id, &words).unwrap();
                assert_eq!(word.chars().count(), grid.slot(slot_id).length);
            }

            let letters = LetterGrid::project(&grid, &words, assignment);
            assert!(letters.is_filled());
        }
    }

    #[test]
    fn test_duplicate_words_count_once() {
        // Two parallel slots, one word supplied twice.
        let grid = grid(&["__", "##", "__"]);
        let words = WordList::new(["ab", "ab"]);

        assert_eq!(words.len(), 1);
        assert_eq!(fill(&grid, &words, &FillOptions::default()).unwrap_err(), FillFailure::NoSolution);
    }

    #[test]
    fn test_fills_are_deterministic() {
        let (grid, words) = word_square();

        for options in all_options() {
            let first = fill(&grid, &words, &options).unwrap();
            let second = fill(&grid, &words, &options).unwrap();

            assert_eq!(first.assignment, second.assignment, "{options:?}");
            assert_eq!(first.statistics.attempts, second.statistics.attempts, "{options:?}");
        }
    }
}

#[cfg(test)]
mod arc_consistency {
    use super::*;

    fn satisfiable(grid: &Grid, words: &WordList, initial_arc_consistency: bool) -> bool {
        let options = FillOptions { initial_arc_consistency, ..FillOptions::default() };
        match fill(grid, words, &options) {
            Ok(_) => true,
            Err(FillFailure::NoSolution) => false,
            Err(failure) => panic!("unexpected {failure:?}"),
        }
    }

    #[test]
    fn test_preprocessing_preserves_satisfiability() {
        let (square, square_words) = word_square();
        let cases = vec![
            (square, square_words),
            (grid(&["__", "__"]), WordList::new(["ab", "ba", "aa"])),
            (grid(&["____", "#_##", "#_##", "#_##"]), WordList::new(["abcd", "wxyz"])),
            (grid(&["___", "_#_", "___"]), WordList::new(["abc", "ade", "cfe", "bdx", "ebc", "aaa", "cab"])),
        ];

        for (grid, words) in &cases {
            assert_eq!(
                satisfiable(grid, words, true),
                satisfiable(grid, words, false),
                "{grid:?}",
            );
        }
    }

    #[test]
    fn test_wipeout_skips_search() {
        let grid = grid(&["____", "#_##", "#_##", "#_##"]);
        let words = WordList::new(["abcd", "wxyz"]);
        let mut recorder = StepRecorder::new(&grid, &words);

        let result = find_fill(&grid, &words, &FillOptions::default(), &mut recorder);

        assert_eq!(result.unwrap_err(), FillFailure::NoSolution);
        assert!(recorder.steps().is_empty());
    }

    #[test]
    fn test_idempotent_on_word_square() {
        let (grid, words) = word_square();
        let mut domains = Domains::node_consistent(&grid, &words);

        establish_arc_consistency(&grid, &words, &mut domains, None).unwrap();
        let settled = domains.clone();
        let again = establish_arc_consistency(&grid, &words, &mut domains, None).unwrap();

        assert_eq!(again.eliminations, 0);
        assert_eq!(domains, settled);
    }
}

#[cfg(test)]
mod observation {
    use super::*;

    #[test]
    fn test_observers_do_not_change_the_search() {
        let (grid, words) = word_square();

        for options in all_options() {
            let quiet = fill(&grid, &words, &options).unwrap();

            let mut recorder = StepRecorder::new(&grid, &words);
            let recorded = find_fill(&grid, &words, &options, &mut recorder).unwrap();
            let logged = find_fill(&grid, &words, &options, &mut LoggingObserver).unwrap();

            for other in [&recorded, &logged] {
                assert_eq!(quiet.assignment, other.assignment, "{options:?}");
                assert_eq!(quiet.statistics.states, other.statistics.states, "{options:?}");
                assert_eq!(quiet.statistics.attempts, other.statistics.attempts, "{options:?}");
                assert_eq!(quiet.statistics.backtracks, other.statistics.backtracks, "{options:?}");
            }
        }
    }

    #[test]
    fn test_recorded_steps_match_statistics() {
        let (grid, words) = word_square();
        let options = FillOptions { inference: Inference::None, ..FillOptions::default() };
        let mut recorder = StepRecorder::new(&grid, &words);

        let result = find_fill(&grid, &words, &options, &mut recorder).unwrap();
        let steps = recorder.steps();
        let count = |kind: &str| steps.iter().filter(|step| step.kind == kind).count() as u64;

        assert_eq!(count("slot_selected"), result.statistics.states);
        assert_eq!(count("value_attempted"), result.statistics.attempts);
        assert_eq!(count("backtracked"), result.statistics.backtracks);
        assert_eq!(
            count("value_accepted") + count("value_rejected"),
            count("value_attempted"),
        );

        for (idx, step) in steps.iter().enumerate() {
            assert_eq!(step.number, idx + 1);

            if step.kind == "value_accepted" || step.kind == "value_rejected" {
                let attempt = &steps[idx - 1];
                assert_eq!(attempt.kind, "value_attempted");
                assert_eq!((attempt.slot, &attempt.word), (step.slot, &step.word));
            }
            if step.kind == "value_rejected" {
                assert!(step.reason.is_some());
                assert!(step.letters.is_none());
            }
        }

        let last_accepted = steps.iter().rev().find(|step| step.kind == "value_accepted").unwrap();
        assert_eq!(
            last_accepted.letters.as_ref(),
            Some(&LetterGrid::project(&grid, &words, &result.assignment)),
        );
    }

    #[test]
    fn test_drain_keeps_numbering() {
        let grid = grid(&["___", "###", "___"]);
        let words = WordList::new(["cat", "dog"]);
        let mut recorder = StepRecorder::new(&grid, &words);

        find_fill(&grid, &words, &FillOptions::default(), &mut recorder).unwrap();
        let drained = recorder.drain();
        assert!(!drained.is_empty());
        assert!(recorder.steps().is_empty());

        find_fill(&grid, &words, &FillOptions::default(), &mut recorder).unwrap();
        assert_eq!(recorder.steps()[0].number, drained.len() + 1);
    }
}

#[cfg(test)]
mod cancellation {
    use super::*;

    #[test]
    fn test_abort_flag_stops_the_search() {
        let (grid, words) = word_square();
        let abort = Arc::new(AtomicBool::new(true));
        let options = FillOptions { abort: Some(abort), ..FillOptions::default() };

        assert_eq!(fill(&grid, &words, &options).unwrap_err(), FillFailure::Abort);
    }

    #[test]
    fn test_expired_deadline_times_out() {
        let (grid, words) = word_square();
        let options = FillOptions::default().with_timeout(instant::Duration::from_millis(0));
        std::thread::sleep(std::time::Duration::from_millis(2));

        assert_eq!(fill(&grid, &words, &options).unwrap_err(), FillFailure::Timeout);
    }

    #[test]
    fn test_generous_deadline_finds_fill() {
        let (grid, words) = word_square();
        let options = FillOptions::default().with_timeout(instant::Duration::from_secs(60));

        assert!(fill(&grid, &words, &options).is_ok());
    }
}
