//! Interval drill: play two notes in order, the start note then the note a
//! named interval above it.

use super::{DrillOptions, DrillQuestion, DrillResult, DrillStrategy, Score, Sequence};
use crate::keys::{KeyContext, Mode};
use crate::note::{NoteName, VoicedNote};
use crate::random::{self, DrillRng};
use log::{debug, warn};
use rand::Rng;

/// Interval names indexed by semitone distance.
pub const INTERVAL_NAMES: [&str; 13] = [
    "Unison",
    "Minor 2nd",
    "Major 2nd",
    "Minor 3rd",
    "Major 3rd",
    "Perfect 4th",
    "Tritone",
    "Perfect 5th",
    "Minor 6th",
    "Major 6th",
    "Minor 7th",
    "Major 7th",
    "Octave",
];

/// Name of an interval of `semitones` (0..=12).
pub fn interval_name(semitones: i32) -> &'static str {
    usize::try_from(semitones)
        .ok()
        .and_then(|i| INTERVAL_NAMES.get(i))
        .copied()
        .unwrap_or("Compound Interval")
}

pub struct IntervalDrill {
    key: KeyContext,
    options: DrillOptions,
    sequence: Sequence,
    score: Score,
    rng: DrillRng,
}

impl IntervalDrill {
    pub fn new() -> Self {
        Self::with_rng(random::from_entropy())
    }

    pub fn with_rng(rng: DrillRng) -> Self {
        Self {
            key: KeyContext::default(),
            options: DrillOptions::default(),
            sequence: Sequence::default(),
            score: Score::default(),
            rng,
        }
    }
}

impl Default for IntervalDrill {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillStrategy for IntervalDrill {
    fn is_sequential(&self) -> bool {
        true
    }

    fn next_question(&mut self) -> DrillQuestion {
        let scale = self.key.scale();
        if scale.is_empty() {
            warn!("No interval material in {}", self.key);
            self.sequence.clear();
            return DrillQuestion::invalid();
        }

        let start = self.rng.gen_range(0..scale.len() as i32);
        let max_steps = if self.key.mode == Mode::Chromatic { 12 } else { 7 };
        let steps = self.rng.gen_range(1..=max_steps);
        let shift = self.options.range.octave_shift(&mut *self.rng);

        let (Some(first), Some(second)) = (scale.note_at(start), scale.note_at(start + steps))
        else {
            self.sequence.clear();
            return DrillQuestion::invalid();
        };
        let (first, second) = (first.shifted(shift), second.shifted(shift));
        let name = interval_name(second.midi(0) - first.midi(0));

        debug!("Interval question: {} from {} to {}", name, first.name, second.name);
        self.sequence.load(vec![first, second]);
        DrillQuestion::new(format!("Interval: {} from {}", name, first.name))
    }

    fn check_answer(&mut self, input: &[NoteName]) -> Option<DrillResult> {
        self.sequence.check(input, &mut self.score)
    }

    fn score(&self) -> Score {
        self.score
    }

    fn reset_score(&mut self) {
        self.score = Score::default();
    }

    fn target_notes(&self) -> &[VoicedNote] {
        self.sequence.notes()
    }

    fn set_key_context(&mut self, key: KeyContext) {
        self.key = key;
    }

    fn set_options(&mut self, options: DrillOptions) {
        self.options = options;
    }

    fn last_correct_note(&self, base_octave: i8) -> Option<String> {
        self.sequence
            .last_matched()
            .map(|note| note.playback(base_octave))
    }

    fn current_index(&self) -> Option<usize> {
        Some(self.sequence.cursor())
    }
}
