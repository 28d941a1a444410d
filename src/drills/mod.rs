//! # Drill Strategies
//!
//! Four interchangeable drills share the [`DrillStrategy`] contract: produce
//! a question, judge a set of pressed notes, keep score, and project the
//! current target to notation keys and playback names.
//!
//! ## Answer Outcomes
//! `check_answer` returns `Option<DrillResult>`:
//! - `None` - nothing to judge (empty input, or a sequential question that
//!   is already complete)
//! - `Some(Correct)` - question answered; score incremented
//! - `Some(Continue)` - partial progress, keep going
//! - `Some(Incorrect)` - wrong, or no question has been asked yet
//!
//! Matching is always enharmonic: pressing `B` answers a `Cb`.
//!
//! ## Sequential drills
//! Interval and melody drills walk a cursor through an ordered target. A
//! batch of input notes is consumed in order; a note that matches the note
//! under the cursor advances it, other notes are skipped.
//!
//! ## Related Modules
//! - `manager` - owns one strategy at a time
//! - `chords`, `patterns`, `keys` - question material

mod chord;
mod interval;
mod melody;
mod speed;


pub use chord::ChordDrill;
pub use interval::{interval_name, IntervalDrill, INTERVAL_NAMES};
pub use melody::MelodyDrill;
pub use speed::SpeedDrill;

use crate::error::DrillError;
use crate::keys::KeyContext;
use crate::note::{NoteName, VoicedNote};
use crate::patterns::Difficulty;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question name used when the key context yields no material.
pub const INVALID_QUESTION: &str = "Invalid Key/Mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillResult {
    Correct,
    Incorrect,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillQuestion {
    pub name: String,
}

impl DrillQuestion {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn invalid() -> Self {
        Self::new(INVALID_QUESTION)
    }

    pub fn is_invalid(&self) -> bool {
        self.name == INVALID_QUESTION
    }
}

/// Running tally. Both fields move together on a correct answer; wrong
/// answers are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub(crate) fn record_correct(&mut self) {
        self.correct += 1;
        self.total += 1;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

/// Register for generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Range {
    #[default]
    Default,
    Low,
    High,
    Wide,
}

impl Range {
    /// Octave offset for the next question. `Wide` draws from {-1, 0, 1}.
    pub fn octave_shift(self, rng: &mut dyn RngCore) -> i8 {
        match self {
            Range::Default => 0,
            Range::Low => -1,
            Range::High => 1,
            Range::Wide => rng.gen_range(-1..=1),
        }
    }
}

impl FromStr for Range {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "normal" => Ok(Range::Default),
            "low" => Ok(Range::Low),
            "high" => Ok(Range::High),
            "wide" => Ok(Range::Wide),
            _ => Err(DrillError::InvalidOption {
                option: "range".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Options shared by all drills. Each drill reads the fields it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrillOptions {
    pub inversions: bool,
    pub range: Range,
    /// Fixed melody difficulty; `None` adapts to the score.
    pub difficulty: Option<Difficulty>,
}

/// Contract shared by the chord, speed, interval and melody drills.
pub trait DrillStrategy {
    /// Whether answers are entered one note at a time against an ordered target.
    fn is_sequential(&self) -> bool;

    fn next_question(&mut self) -> DrillQuestion;

    fn check_answer(&mut self, input: &[NoteName]) -> Option<DrillResult>;

    fn score(&self) -> Score;

    fn reset_score(&mut self);

    /// Notes of the current target, placed relative to the base octave.
    fn target_notes(&self) -> &[VoicedNote];

    /// VexFlow keys (`"C#/4"`) for the current target.
    fn vexflow_notes(&self, base_octave: i8) -> Vec<String> {
        self.target_notes()
            .iter()
            .map(|note| note.vexflow(base_octave))
            .collect()
    }

    /// Playback names (`"C#4"`) for the current target.
    fn playback_notes(&self, base_octave: i8) -> Vec<String> {
        self.target_notes()
            .iter()
            .map(|note| note.playback(base_octave))
            .collect()
    }

    fn set_key_context(&mut self, _key: KeyContext) {}

    fn set_options(&mut self, _options: DrillOptions) {}

    /// Playback name of the most recently matched note, for audio feedback.
    fn last_correct_note(&self, _base_octave: i8) -> Option<String> {
        None
    }

    /// Cursor position for sequential drills.
    fn current_index(&self) -> Option<usize> {
        None
    }
}

/// Ordered target with a cursor, shared by the sequential drills.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Sequence {
    notes: Vec<VoicedNote>,
    cursor: usize,
}

impl Sequence {
    pub(crate) fn load(&mut self, notes: Vec<VoicedNote>) {
        self.notes = notes;
        self.cursor = 0;
    }

    pub(crate) fn clear(&mut self) {
        self.load(Vec::new());
    }

    pub(crate) fn notes(&self) -> &[VoicedNote] {
        &self.notes
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.notes.is_empty() && self.cursor >= self.notes.len()
    }

    /// Last note the cursor moved past.
    pub(crate) fn last_matched(&self) -> Option<&VoicedNote> {
        self.cursor.checked_sub(1).and_then(|i| self.notes.get(i))
    }

    pub(crate) fn check(&mut self, input: &[NoteName], score: &mut Score) -> Option<DrillResult> {
        if input.is_empty() {
            return None;
        }
        if self.notes.is_empty() {
            return Some(DrillResult::Incorrect);
        }
        if self.is_complete() {
            return None;
        }

        let mut advanced = false;
        for note in input {
            let Some(expected) = self.notes.get(self.cursor) else {
                break;
            };
            if note.is_enharmonic(expected.name) {
                self.cursor += 1;
                advanced = true;
            }
        }

        if self.is_complete() {
            score.record_correct();
            Some(DrillResult::Correct)
        } else if advanced {
            Some(DrillResult::Continue)
        } else {
            Some(DrillResult::Incorrect)
        }
    }
}
