//! Lesson browser: step through the diatonic chords of the current key one
//! at a time, wrapping at either end.

use crate::chords::{chords_for_context, Chord, ChordType};
use crate::keys::KeyContext;

#[derive(Debug, Clone)]
pub struct LessonManager {
    chord_type: ChordType,
    key: KeyContext,
    chords: Vec<Chord>,
    index: usize,
}

impl LessonManager {
    pub fn new(key: KeyContext, chord_type: ChordType) -> Self {
        Self {
            chord_type,
            key,
            chords: chords_for_context(&key, chord_type),
            index: 0,
        }
    }

    /// Switch between triads and sevenths; restarts at the first chord.
    pub fn set_chord_type(&mut self, chord_type: ChordType) {
        self.chord_type = chord_type;
        self.reload();
    }

    /// Change key; restarts at the first chord.
    pub fn set_key_context(&mut self, key: KeyContext) {
        self.key = key;
        self.reload();
    }

    fn reload(&mut self) {
        self.chords = chords_for_context(&self.key, self.chord_type);
        self.index = 0;
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Chord> {
        self.chords.get(self.index)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Chord> {
        if self.chords.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.chords.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<&Chord> {
        if self.chords.is_empty() {
            return None;
        }
        self.index = (self.index + self.chords.len() - 1) % self.chords.len();
        self.current()
    }
}

impl Default for LessonManager {
    fn default() -> Self {
        Self::new(KeyContext::default(), ChordType::Triads)
    }
}
