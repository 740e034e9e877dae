//! The search loop
//!
//! [`Search`] owns all mutable search state: the cursor, the discoveries and
//! the stopwatch. Operator interaction is cooperative: before each candidate
//! the loop polls a [`ControlSource`] without blocking and hands any pending
//! command to an [`Operator`], so the latency of a request is bounded by a
//! single perfection test.

use tracing::{debug, info};

use super::position::{self, SearchPosition};
use super::records::PerfectRecords;
use super::stopwatch::Stopwatch;
use super::tester::is_perfect;
use crate::checkpoints::{Checkpoint, Progress};
use crate::control::{Command, ControlSource};
use crate::error::SearchError;

/// A perfect number reported for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discovery {
    /// 1-based rank among the recorded perfect numbers.
    pub ordinal: usize,
    pub value: u32,
    pub position: SearchPosition,
}

/// Result of testing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The candidate was not perfect.
    Tested(u32),
    Found(Discovery),
    /// Perfect, but already recorded by an earlier session.
    Rediscovered(u32),
    /// No candidates remain.
    Exhausted,
}

/// How a call to [`Search::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every candidate below 2^32 was tested.
    Exhausted,
    /// The operator saved a checkpoint and stopped.
    Suspended,
    /// The operator stopped without saving.
    Cancelled,
}

/// What the loop should do after an operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop(Outcome),
}

/// Receives operator commands and discoveries while the search runs.
pub trait Operator {
    fn on_command(&mut self, command: Command, search: &Search) -> Flow;

    fn on_discovery(&mut self, discovery: &Discovery, search: &Search);
}

/// Search state plus the loop that drives it.
#[derive(Debug, Clone)]
pub struct Search {
    position: Option<SearchPosition>,
    records: PerfectRecords,
    stopwatch: Stopwatch,
}

impl Search {
    /// A search starting at the first candidate with no history.
    pub fn new() -> Self {
        Self {
            position: Some(position::initialize(None)),
            records: PerfectRecords::new(),
            stopwatch: Stopwatch::default(),
        }
    }

    /// Continue from a checkpoint. Files without a stored position restart
    /// the cursor at the beginning but keep their records.
    pub fn restore(checkpoint: &Checkpoint) -> Self {
        let position = match checkpoint.progress {
            Progress::Legacy => Some(position::initialize(None)),
            Progress::At(saved) => Some(position::initialize(Some(saved))),
            Progress::Complete => None,
        };
        Self {
            position,
            records: checkpoint.records.clone(),
            stopwatch: Stopwatch::resume(checkpoint.elapsed_secs),
        }
    }

    /// Snapshot of everything a checkpoint needs. Does not disturb the search.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            elapsed_secs: self.elapsed_secs(),
            records: self.records.clone(),
            progress: match self.position {
                Some(position) => Progress::At(position),
                None => Progress::Complete,
            },
        }
    }

    /// Next untested candidate, or `None` once exhausted.
    pub fn position(&self) -> Option<SearchPosition> {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position.is_none()
    }

    pub fn records(&self) -> &PerfectRecords {
        &self.records
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.stopwatch.elapsed_secs()
    }

    /// Ordinal the next new discovery will get.
    pub fn next_ordinal(&self) -> usize {
        self.records.len() + 1
    }

    /// Test the candidate under the cursor and advance past it.
    pub fn step(&mut self) -> Result<Step, SearchError> {
        let Some(current) = self.position else {
            return Ok(Step::Exhausted);
        };

        let value = current.value();
        let step = if is_perfect(value, current.max_divisor()) {
            if self.records.insert(value)? {
                let ordinal = self
                    .records
                    .as_slice()
                    .binary_search(&value)
                    .map_or(self.records.len(), |index| index + 1);
                info!(value, ordinal, "perfect number found");
                Step::Found(Discovery {
                    ordinal,
                    value,
                    position: current,
                })
            } else {
                debug!(value, "perfect number already recorded");
                Step::Rediscovered(value)
            }
        } else {
            Step::Tested(value)
        };

        self.position = current.advance();
        match self.position {
            Some(next) if next.hi_power() != current.hi_power() => {
                debug!(hi_power = next.hi_power(), "entering band");
            }
            None => info!("candidate space exhausted"),
            _ => {}
        }

        Ok(step)
    }

    /// Run until the candidates run out or the operator stops the search.
    pub fn run(
        &mut self,
        control: &mut dyn ControlSource,
        operator: &mut dyn Operator,
    ) -> Result<Outcome, SearchError> {
        loop {
            if let Some(command) = control.poll() {
                debug!(?command, "operator command");
                if let Flow::Stop(outcome) = operator.on_command(command, self) {
                    return Ok(outcome);
                }
            }

            match self.step()? {
                Step::Found(discovery) => operator.on_discovery(&discovery, self),
                Step::Exhausted => return Ok(Outcome::Exhausted),
                Step::Tested(_) | Step::Rediscovered(_) => {}
            }
        }
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ChannelControl;
    use crate::search::MAX_PERFECTS;

    #[derive(Default)]
    struct Recorder {
        found: Vec<u32>,
        commands: Vec<Command>,
    }

    impl Operator for Recorder {
        fn on_command(&mut self, command: Command, _search: &Search) -> Flow {
            self.commands.push(command);
            match command {
                Command::Quit => Flow::Stop(Outcome::Cancelled),
                _ => Flow::Continue,
            }
        }

        fn on_discovery(&mut self, discovery: &Discovery, _search: &Search) {
            self.found.push(discovery.value);
        }
    }

    #[test]
    fn test_step_reports_first_perfect_number() {
        let mut search = Search::new();
        assert_eq!(search.step().unwrap(), Step::Tested(4));
        match search.step().unwrap() {
            Step::Found(discovery) => {
                assert_eq!(discovery.value, 6);
                assert_eq!(discovery.ordinal, 1);
                assert_eq!(discovery.position, SearchPosition::new(3, 1).unwrap());
            }
            other => panic!("expected discovery, got {other:?}"),
        }
        assert_eq!(search.next_ordinal(), 2);
    }

    #[test]
    fn test_run_to_exhaustion_finds_all_five() {
        let (mut control, _handle) = ChannelControl::new();
        let mut recorder = Recorder::default();
        let mut search = Search::new();

        let outcome = search.run(&mut control, &mut recorder).unwrap();

        assert_eq!(outcome, Outcome::Exhausted);
        assert_eq!(recorder.found, vec![6, 28, 496, 8128, 33_550_336]);
        assert_eq!(search.records().as_slice(), &[6, 28, 496, 8128, 33_550_336]);
        assert!(search.is_exhausted());
        assert_eq!(search.step().unwrap(), Step::Exhausted);
    }

    #[test]
    fn test_command_is_handled_before_next_candidate() {
        let (mut control, handle) = ChannelControl::new();
        handle.send(Command::Status);
        handle.send(Command::Quit);
        let mut recorder = Recorder::default();
        let mut search = Search::new();

        let outcome = search.run(&mut control, &mut recorder).unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(recorder.commands, vec![Command::Status, Command::Quit]);
        // Status was handled before 4, quit before 6.
        assert_eq!(search.position(), SearchPosition::new(3, 1));
        assert!(recorder.found.is_empty());
    }

    #[test]
    fn test_checkpoint_snapshot_does_not_move_cursor() {
        let mut search = Search::new();
        search.step().unwrap();
        let before = search.position();
        let checkpoint = search.checkpoint();
        assert_eq!(checkpoint.progress, Progress::At(before.unwrap()));
        assert_eq!(search.position(), before);
    }

    #[test]
    fn test_restore_legacy_restarts_cursor_without_rereporting() {
        let checkpoint = Checkpoint {
            elapsed_secs: 12.5,
            records: PerfectRecords::from_values(&[6, 28]).unwrap(),
            progress: Progress::Legacy,
        };
        let mut search = Search::restore(&checkpoint);
        assert_eq!(search.position(), Some(SearchPosition::FIRST));
        assert!(search.elapsed_secs() >= 12.5);

        let (mut control, _handle) = ChannelControl::new();
        let mut recorder = Recorder::default();
        search.run(&mut control, &mut recorder).unwrap();
        assert_eq!(recorder.found, vec![496, 8128, 33_550_336]);
    }

    #[test]
    fn test_full_record_store_stops_run_with_error() {
        let full: Vec<u32> = (1..=MAX_PERFECTS as u32).map(|k| k * 100).collect();
        let mut search = Search::restore(&Checkpoint {
            elapsed_secs: 0.0,
            records: PerfectRecords::from_values(&full).unwrap(),
            progress: Progress::At(SearchPosition::FIRST),
        });
        let (mut control, _handle) = ChannelControl::new();
        let mut recorder = Recorder::default();

        let err = search.run(&mut control, &mut recorder).unwrap_err();

        assert_eq!(
            err,
            SearchError::CapacityExceeded {
                capacity: MAX_PERFECTS,
                value: 6
            }
        );
        assert!(recorder.found.is_empty());
        // The failing candidate stays under the cursor.
        assert_eq!(search.position(), SearchPosition::new(3, 1));
        assert_eq!(search.records().as_slice(), full.as_slice());
    }

    #[test]
    fn test_restore_complete_is_exhausted() {
        let checkpoint = Checkpoint {
            elapsed_secs: 1.0,
            records: PerfectRecords::new(),
            progress: Progress::Complete,
        };
        let search = Search::restore(&checkpoint);
        assert!(search.is_exhausted());
        assert_eq!(search.checkpoint().progress, Progress::Complete);
    }
}
