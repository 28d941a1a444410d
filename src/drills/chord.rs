//! Chord identification drill (triads or seventh chords).

use super::{DrillOptions, DrillQuestion, DrillResult, DrillStrategy, Score};
use crate::chords::{chords_for_context, voice, Chord, ChordType};
use crate::keys::KeyContext;
use crate::note::{NoteName, VoicedNote};
use crate::random::{self, DrillRng};
use log::{debug, trace, warn};
use rand::Rng;

pub struct ChordDrill {
    chord_type: ChordType,
    key: KeyContext,
    options: DrillOptions,
    current: Option<Chord>,
    voicing: Vec<VoicedNote>,
    inversion: usize,
    previous_input: Vec<NoteName>,
    last_correct: Option<VoicedNote>,
    score: Score,
    rng: DrillRng,
}

impl ChordDrill {
    pub fn new(chord_type: ChordType) -> Self {
        Self::with_rng(chord_type, random::from_entropy())
    }

    pub fn with_rng(chord_type: ChordType, rng: DrillRng) -> Self {
        Self {
            chord_type,
            key: KeyContext::default(),
            options: DrillOptions::default(),
            current: None,
            voicing: Vec::new(),
            inversion: 0,
            previous_input: Vec::new(),
            last_correct: None,
            score: Score::default(),
            rng,
        }
    }

    pub fn chord_type(&self) -> ChordType {
        self.chord_type
    }

    pub fn current_chord(&self) -> Option<&Chord> {
        self.current.as_ref()
    }

    pub fn current_voicing(&self) -> &[VoicedNote] {
        &self.voicing
    }

    /// Inversion of the current voicing (0 = root position).
    pub fn inversion(&self) -> usize {
        self.inversion
    }
}

impl DrillStrategy for ChordDrill {
    fn is_sequential(&self) -> bool {
        false
    }

    fn next_question(&mut self) -> DrillQuestion {
        let pool = chords_for_context(&self.key, self.chord_type);
        if pool.is_empty() {
            warn!("No {:?} available in {}", self.chord_type, self.key);
            self.current = None;
            self.voicing.clear();
            return DrillQuestion::invalid();
        }

        let previous = self.current.as_ref().map(|chord| chord.name.clone());
        let mut index = self.rng.gen_range(0..pool.len());
        while pool.len() > 1 && previous.as_deref() == Some(pool[index].name.as_str()) {
            index = self.rng.gen_range(0..pool.len());
        }
        let chord = pool[index].clone();

        self.inversion = if self.options.inversions {
            self.rng.gen_range(0..chord.notes.len())
        } else {
            0
        };
        let shift = self.options.range.octave_shift(&mut *self.rng);
        self.voicing = voice(&chord, self.inversion, shift);
        self.previous_input.clear();
        self.last_correct = None;

        debug!(
            "Chord question: {} (inversion {}, shift {})",
            chord.name, self.inversion, shift
        );
        let question = DrillQuestion::new(chord.name.clone());
        self.current = Some(chord);
        question
    }

    fn check_answer(&mut self, input: &[NoteName]) -> Option<DrillResult> {
        if input.is_empty() {
            return None;
        }
        let targets = match &self.current {
            Some(chord) => chord.notes.clone(),
            None => return Some(DrillResult::Incorrect),
        };

        let in_chord = |note: &NoteName| targets.iter().any(|t| t.is_enharmonic(*note));
        let all_pressed = targets
            .iter()
            .all(|target| input.iter().any(|note| note.is_enharmonic(*target)));
        let no_extras = input.iter().all(in_chord);

        let fresh = input
            .iter()
            .filter(|note| in_chord(*note))
            .filter(|note| !self.previous_input.iter().any(|p| p.is_enharmonic(**note)))
            .last();
        if let Some(fresh) = fresh {
            self.last_correct = self
                .voicing
                .iter()
                .find(|voiced| voiced.name.is_enharmonic(*fresh))
                .copied();
        }
        self.previous_input = input.to_vec();

        let result = if all_pressed && no_extras {
            self.score.record_correct();
            DrillResult::Correct
        } else if no_extras {
            DrillResult::Continue
        } else {
            DrillResult::Incorrect
        };
        trace!("Chord answer {:?} -> {:?}", input, result);
        Some(result)
    }

    fn score(&self) -> Score {
        self.score
    }

    fn reset_score(&mut self) {
        self.score = Score::default();
    }

    fn target_notes(&self) -> &[VoicedNote] {
        &self.voicing
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
