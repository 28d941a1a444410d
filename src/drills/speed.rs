//! Single-note speed drill: name or press one random scale note.

use super::{DrillOptions, DrillQuestion, DrillResult, DrillStrategy, Score};
use crate::keys::KeyContext;
use crate::note::{NoteName, VoicedNote};
use crate::random::{self, DrillRng};
use log::{debug, warn};
use rand::seq::SliceRandom;

pub struct SpeedDrill {
    key: KeyContext,
    options: DrillOptions,
    current: Option<VoicedNote>,
    last_correct: Option<VoicedNote>,
    score: Score,
    rng: DrillRng,
}

impl SpeedDrill {
    pub fn new() -> Self {
        Self::with_rng(random::from_entropy())
    }

    pub fn with_rng(rng: DrillRng) -> Self {
        Self {
            key: KeyContext::default(),
            options: DrillOptions::default(),
            current: None,
            last_correct: None,
            score: Score::default(),
            rng,
        }
    }

    pub fn current_note(&self) -> Option<VoicedNote> {
        self.current
    }
}

impl Default for SpeedDrill {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillStrategy for SpeedDrill {
    fn is_sequential(&self) -> bool {
        false
    }

    fn next_question(&mut self) -> DrillQuestion {
        let scale = self.key.scale_notes();
        let Some(&name) = scale.choose(&mut *self.rng) else {
            warn!("No notes available in {}", self.key);
            self.current = None;
            return DrillQuestion::invalid();
        };

        let shift = self.options.range.octave_shift(&mut *self.rng);
        let note = VoicedNote::new(name, shift);
        debug!("Speed question: {} (shift {})", name, shift);
        self.current = Some(note);
        self.last_correct = None;
        DrillQuestion::new(name.to_string())
    }

    fn check_answer(&mut self, input: &[NoteName]) -> Option<DrillResult> {
        if input.is_empty() {
            return None;
        }
        let target = match self.current {
            Some(note) => note,
            None => return Some(DrillResult::Incorrect),
        };

        if input.iter().any(|note| note.is_enharmonic(target.name)) {
            self.score.record_correct();
            self.last_correct = Some(target);
            Some(DrillResult::Correct)
        } else {
            Some(DrillResult::Incorrect)
        }
    }

    fn score(&self) -> Score {
        self.score
    }

    fn reset_score(&mut self) {
        self.score = Score::default();
    }

    fn target_notes(&self) -> &[VoicedNote] {
        match &self.current {
            Some(note) => std::slice::from_ref(note),
            None => &[],
        }
    }

    fn set_key_context(&mut self, key: KeyContext) {
        self.key = key;
    }

    fn set_options(&mut self, options: DrillOptions) {
        self.options = options;
    }

    fn last_correct_note(&self, base_octave: i8) -> Option<String> {
        self.last_correct.map(|note| note.playback(base_octave))
    }
}
