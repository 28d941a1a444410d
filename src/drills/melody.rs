//! Melody sight-reading drill: play a generated pattern note by note.

use super::{DrillOptions, DrillQuestion, DrillResult, DrillStrategy, Score, Sequence};
use crate::keys::KeyContext;
use crate::note::{NoteName, VoicedNote};
use crate::patterns::{generate_pattern, Difficulty, MelodicPattern};
use crate::random::{self, DrillRng};
use log::debug;

pub struct MelodyDrill {
    key: KeyContext,
    options: DrillOptions,
    sequence: Sequence,
    score: Score,
    rng: DrillRng,
}

impl MelodyDrill {
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

    /// Difficulty of the next pattern: the fixed option, or adaptive from
    /// the score.
    pub fn difficulty(&self) -> Difficulty {
        self.options
            .difficulty
            .unwrap_or_else(|| Difficulty::for_score(self.score.correct))
    }

    /// Replace the current target with a given pattern and rewind the cursor.
    pub fn set_pattern(&mut self, pattern: MelodicPattern) {
        self.sequence.load(pattern.notes);
    }
}

impl Default for MelodyDrill {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillStrategy for MelodyDrill {
    fn is_sequential(&self) -> bool {
        true
    }

    fn next_question(&mut self) -> DrillQuestion {
        let difficulty = self.difficulty();
        let pattern = generate_pattern(&self.key, difficulty, &mut *self.rng);
        let shift = self.options.range.octave_shift(&mut *self.rng);

        debug!("Melody question: {} ({})", pattern.name, difficulty);
        self.sequence
            .load(pattern.notes.iter().map(|note| note.shifted(shift)).collect());
        DrillQuestion::new(pattern.name)
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
