//! # Note/Pitch Model
//!
//! Note spellings, the canonical chromatic-index resolver, and enharmonic
//! equivalence.
//!
//! ## Key Concepts
//!
//! ### Spelling vs. pitch
//! A [`NoteName`] is a *spelling*: a letter plus an accidental. Two spellings
//! are enharmonically equivalent when they land on the same chromatic index
//! (0 = C ... 11 = B), e.g. `Cb`/`B`, `B#`/`C`, `E#`/`F`, `Fb`/`E`.
//! Equivalence is a relation, not identity: `Cb` and `B` compare unequal with
//! `==` but match with [`NoteName::is_enharmonic`].
//!
//! ### One resolver
//! [`NoteName::chromatic_index`] is the only place that turns a spelling into
//! a pitch class. The rare spellings need no override tables because the
//! accidental offset is applied arithmetically to the letter's semitone.
//!
//! ### Octaves (CRITICAL)
//! Octave numbers belong to the written letter, as in scientific pitch
//! notation: `Cb4` sounds as B3 (MIDI 59) and `B#3` sounds as C4 (MIDI 60).
//! [`VoicedNote::midi`] follows this rule so that voicings ascend the way
//! they are written on the staff.
//!
//! ## Related Modules
//! - `keys` - builds scales out of these spellings
//! - `chords` - measures intervals with [`interval_semitones`]
//! - `drills` - answer checking via [`NoteName::is_enharmonic`]

use crate::error::DrillError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Natural note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Letters in staff order starting from C.
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitone offset of the natural letter above C.
    pub fn semitones(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Position on the staff within an octave (C = 0 ... B = 6).
    pub fn index(self) -> usize {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// The letter `steps` staff positions above this one (wrapping at B).
    pub fn offset(self, steps: usize) -> Letter {
        Self::ALL[(self.index() + steps) % 7]
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

/// Accidental attached to a letter.
///
/// Double accidentals only appear in scales of theoretical keys
/// (e.g. Gb Minor needs Bbb and Ebb to keep one note per letter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    #[default]
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// Semitone offset applied to the letter.
    pub fn offset(self) -> i8 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    pub fn from_offset(offset: i8) -> Option<Accidental> {
        match offset {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    /// Text used in note names ("" for natural).
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }

    fn parse(text: &str) -> Option<Accidental> {
        match text {
            "" => Some(Accidental::Natural),
            "#" | "♯" => Some(Accidental::Sharp),
            "b" | "♭" => Some(Accidental::Flat),
            "##" | "x" | "𝄪" => Some(Accidental::DoubleSharp),
            "bb" | "𝄫" => Some(Accidental::DoubleFlat),
            _ => None,
        }
    }
}

/// A pitch-class spelling such as `C`, `F#`, `Eb` or `Cb`.
///
/// Serialized as its text form (`"F#"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: Accidental,
}

const fn spelled(letter: Letter, accidental: Accidental) -> NoteName {
    NoteName { letter, accidental }
}

/// Sharp-preferring chromatic reference spelling, indexed by chromatic index.
pub const NOTES_SHARP: [NoteName; 12] = [
    spelled(Letter::C, Accidental::Natural),
    spelled(Letter::C, Accidental::Sharp),
    spelled(Letter::D, Accidental::Natural),
    spelled(Letter::D, Accidental::Sharp),
    spelled(Letter::E, Accidental::Natural),
    spelled(Letter::F, Accidental::Natural),
    spelled(Letter::F, Accidental::Sharp),
    spelled(Letter::G, Accidental::Natural),
    spelled(Letter::G, Accidental::Sharp),
    spelled(Letter::A, Accidental::Natural),
    spelled(Letter::A, Accidental::Sharp),
    spelled(Letter::B, Accidental::Natural),
];

/// Flat-preferring chromatic reference spelling, indexed by chromatic index.
pub const NOTES_FLAT: [NoteName; 12] = [
    spelled(Letter::C, Accidental::Natural),
    spelled(Letter::D, Accidental::Flat),
    spelled(Letter::D, Accidental::Natural),
    spelled(Letter::E, Accidental::Flat),
    spelled(Letter::E, Accidental::Natural),
    spelled(Letter::F, Accidental::Natural),
    spelled(Letter::G, Accidental::Flat),
    spelled(Letter::G, Accidental::Natural),
    spelled(Letter::A, Accidental::Flat),
    spelled(Letter::A, Accidental::Natural),
    spelled(Letter::B, Accidental::Flat),
    spelled(Letter::B, Accidental::Natural),
];

impl NoteName {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        spelled(letter, accidental)
    }

    pub const fn natural(letter: Letter) -> Self {
        spelled(letter, Accidental::Natural)
    }

    /// Chromatic index 0..=11 (C = 0).
    ///
    /// # Examples
    /// ```
    /// use pianodrill::NoteName;
    ///
    /// let cb: NoteName = "Cb".parse().unwrap();
    /// let e_sharp: NoteName = "E#".parse().unwrap();
    /// assert_eq!(cb.chromatic_index(), 11);
    /// assert_eq!(e_sharp.chromatic_index(), 5);
    /// ```
    pub fn chromatic_index(self) -> u8 {
        (self.letter.semitones() as i8 + self.accidental.offset()).rem_euclid(12) as u8
    }

    /// True when both spellings sound the same pitch class.
    pub fn is_enharmonic(self, other: NoteName) -> bool {
        self == other || self.chromatic_index() == other.chromatic_index()
    }

    /// Spell `pitch_class` on `letter`, if that needs at most a double accidental.
    ///
    /// `NoteName::respell(11, Letter::C)` is `Cb`; `NoteName::respell(1, Letter::E)`
    /// would need a triple flat and returns `None`.
    pub fn respell(pitch_class: u8, letter: Letter) -> Option<NoteName> {
        let diff = (pitch_class as i8 - letter.semitones() as i8).rem_euclid(12);
        let offset = if diff > 6 { diff - 12 } else { diff };
        Accidental::from_offset(offset).map(|accidental| NoteName { letter, accidental })
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.symbol())
    }
}

impl FromStr for NoteName {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| DrillError::InvalidNote(s.to_string()))?;
        let accidental = Accidental::parse(chars.as_str())
            .ok_or_else(|| DrillError::InvalidNote(s.to_string()))?;
        Ok(NoteName { letter, accidental })
    }
}

impl TryFrom<String> for NoteName {
    type Error = DrillError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteName> for String {
    fn from(note: NoteName) -> Self {
        note.to_string()
    }
}

/// Chromatic index of a textual note name, or `None` when the text is not a note.
pub fn chromatic_index(text: &str) -> Option<u8> {
    text.parse::<NoteName>().ok().map(NoteName::chromatic_index)
}

/// Enharmonic match on raw text.
///
/// True iff the strings are equal, or both parse and resolve to the same
/// chromatic index. Unparseable text only ever matches itself.
pub fn are_enharmonic(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (chromatic_index(a), chromatic_index(b)) {
        (Some(i), Some(j)) => i == j,
        _ => false,
    }
}

/// Upward distance in semitones from `from` to `to`, in 0..=11.
pub fn interval_semitones(from: NoteName, to: NoteName) -> u8 {
    (to.chromatic_index() + 12 - from.chromatic_index()) % 12
}

/// Parse free text typed by the user into note names.
///
/// Scans for letters A-G (either case). A `#` right after a letter is a
/// sharp and `##` or `x` a double sharp. A lowercase `b` right after a
/// letter is a flat and `bb` a double flat, so `"Eb"` and `"eb"` are
/// E-flat, `"Ebb"` is E double-flat, and `"EB"` is E followed by B.
/// Anything else is a separator.
///
/// # Examples
/// ```
/// use pianodrill::note::parse_note_list;
///
/// let notes: Vec<String> = parse_note_list("c eb, G#").iter().map(|n| n.to_string()).collect();
/// assert_eq!(notes, vec!["C", "Eb", "G#"]);
/// ```
pub fn parse_note_list(text: &str) -> Vec<NoteName> {
    let chars: Vec<char> = text.chars().collect();
    let mut notes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let Some(letter) = Letter::from_char(chars[i]) else {
            i += 1;
            continue;
        };
        let (accidental, width) = match (chars.get(i + 1), chars.get(i + 2)) {
            (Some('#'), Some('#')) => (Accidental::DoubleSharp, 2),
            (Some('b'), Some('b')) => (Accidental::DoubleFlat, 2),
            (Some('x'), _) => (Accidental::DoubleSharp, 1),
            (Some('#'), _) => (Accidental::Sharp, 1),
            (Some('b'), _) => (Accidental::Flat, 1),
            _ => (Accidental::Natural, 0),
        };
        i += 1 + width;
        notes.push(NoteName { letter, accidental });
    }

    notes
}

/// A note placed in a register, relative to a caller-supplied base octave.
///
/// Used for chord voicings, melodic sequences and the rendering/audio
/// projections (`"C#/4"` for VexFlow, `"C#4"` for playback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicedNote {
    pub name: NoteName,
    pub octave_offset: i8,
}

impl VoicedNote {
    pub fn new(name: NoteName, octave_offset: i8) -> Self {
        Self { name, octave_offset }
    }

    /// Place `name` so that it sounds `pitch` semitones above C of the base
    /// octave. `pitch` must belong to the same pitch class as `name`.
    pub(crate) fn at_pitch(name: NoteName, pitch: i32) -> Self {
        let written = name.letter.semitones() as i32 + name.accidental.offset() as i32;
        let octave_offset = (pitch - written).div_euclid(12) as i8;
        Self { name, octave_offset }
    }

    /// Written octave number for a given base octave.
    pub fn octave(&self, base_octave: i8) -> i32 {
        base_octave as i32 + self.octave_offset as i32
    }

    /// MIDI note number (C4 = 60), following written-octave semantics.
    pub fn midi(&self, base_octave: i8) -> i32 {
        (self.octave(base_octave) + 1) * 12
            + self.name.letter.semitones() as i32
            + self.name.accidental.offset() as i32
    }

    /// The same note moved by whole octaves.
    pub fn shifted(self, octaves: i8) -> Self {
        Self {
            name: self.name,
            octave_offset: self.octave_offset + octaves,
        }
    }

    /// VexFlow key, e.g. `"Eb/4"`.
    pub fn vexflow(&self, base_octave: i8) -> String {
        format!("{}/{}", self.name, self.octave(base_octave))
    }

    /// Scientific pitch name for audio playback, e.g. `"Eb4"`.
    pub fn playback(&self, base_octave: i8) -> String {
        format!("{}{}", self.name, self.octave(base_octave))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> NoteName {
        text.parse().unwrap()
    }

    #[test]
    fn test_chromatic_index_rare_spellings() {
        assert_eq!(n("Cb").chromatic_index(), 11);
        assert_eq!(n("B#").chromatic_index(), 0);
        assert_eq!(n("Fb").chromatic_index(), 4);
        assert_eq!(n("E#").chromatic_index(), 5);
        assert_eq!(n("Bbb").chromatic_index(), 9);
        assert_eq!(n("F##").chromatic_index(), 7);
    }

    #[test]
    fn test_reference_arrays_match_resolver() {
        for (i, note) in NOTES_SHARP.iter().enumerate() {
            assert_eq!(note.chromatic_index() as usize, i);
        }
        for (i, note) in NOTES_FLAT.iter().enumerate() {
            assert_eq!(note.chromatic_index() as usize, i);
        }
    }

    #[test]
    fn test_enharmonic_pairs() {
        let pairs = [
            ("B", "Cb", true),
            ("C", "B#", true),
            ("F", "E#", true),
            ("E", "Fb", true),
            ("C#", "Db", true),
            ("A#", "Bb", true),
            ("C", "D", false),
            ("E", "F", false),
            ("G#", "Ab", true),
        ];
        for (a, b, expected) in pairs {
            assert_eq!(are_enharmonic(a, b), expected, "{} vs {}", a, b);
            assert_eq!(are_enharmonic(b, a), expected, "{} vs {}", b, a);
            assert_eq!(n(a).is_enharmonic(n(b)), expected);
        }
    }

    #[test]
    fn test_enharmonic_unknown_text() {
        assert_eq!(chromatic_index("H"), None);
        assert!(are_enharmonic("H", "H"));
        assert!(!are_enharmonic("H", "B"));
        assert!(!are_enharmonic("B", "H"));
    }

    #[test]
    fn test_parse_and_display() {
        for text in ["C", "C#", "Db", "Cb", "B#", "E#", "Fb", "Bbb", "F##"] {
            assert_eq!(n(text).to_string(), text);
        }
        assert!("H".parse::<NoteName>().is_err());
        assert!("C###".parse::<NoteName>().is_err());
        assert!("".parse::<NoteName>().is_err());
    }

    #[test]
    fn test_respell() {
        assert_eq!(NoteName::respell(11, Letter::C), Some(n("Cb")));
        assert_eq!(NoteName::respell(0, Letter::B), Some(n("B#")));
        assert_eq!(NoteName::respell(9, Letter::B), Some(n("Bbb")));
        assert_eq!(NoteName::respell(1, Letter::E), None);
    }

    #[test]
    fn test_interval_semitones() {
        assert_eq!(interval_semitones(n("C"), n("G")), 7);
        assert_eq!(interval_semitones(n("B"), n("D")), 3);
        assert_eq!(interval_semitones(n("Eb"), n("Cb")), 8);
        assert_eq!(interval_semitones(n("C"), n("C")), 0);
    }

    #[test]
    fn test_parse_note_list() {
        let notes = parse_note_list("C E G");
        assert_eq!(notes, vec![n("C"), n("E"), n("G")]);

        let notes = parse_note_list("ceg");
        assert_eq!(notes, vec![n("C"), n("E"), n("G")]);

        let notes = parse_note_list("Eb,f# bb");
        assert_eq!(notes, vec![n("Eb"), n("F#"), n("Bb")]);

        let notes = parse_note_list("EB");
        assert_eq!(notes, vec![n("E"), n("B")]);

        let notes = parse_note_list("Bbb F## gx Ebb");
        assert_eq!(notes, vec![n("Bbb"), n("F##"), n("G##"), n("Ebb")]);

        assert!(parse_note_list("  123 ").is_empty());
    }

    #[test]
    fn test_voiced_note_projections() {
        let note = VoicedNote::new(n("Eb"), 1);
        assert_eq!(note.vexflow(4), "Eb/5");
        assert_eq!(note.playback(3), "Eb4");
        assert_eq!(VoicedNote::new(n("C"), 0).midi(4), 60);
        assert_eq!(VoicedNote::new(n("Cb"), 0).midi(4), 59);
        assert_eq!(VoicedNote::new(n("B#"), 0).midi(3), 60);
    }

    #[test]
    fn test_voiced_note_extreme_base_octave() {
        let note = VoicedNote::new(n("C"), 1);
        assert_eq!(note.octave(i8::MAX), 128);
        assert_eq!(note.vexflow(i8::MAX), "C/128");
        assert_eq!(VoicedNote::new(n("C"), -1).playback(i8::MIN), "C-129");
        assert_eq!(VoicedNote::new(n("C"), 1).midi(i8::MAX), 129 * 12);
    }

    #[test]
    fn test_at_pitch_places_written_octave() {
        // 11 semitones above C: B in the base octave, Cb one written octave up.
        assert_eq!(VoicedNote::at_pitch(n("B"), 11).octave_offset, 0);
        assert_eq!(VoicedNote::at_pitch(n("Cb"), 11).octave_offset, 1);
        assert_eq!(VoicedNote::at_pitch(n("B#"), 12).octave_offset, 0);
        assert_eq!(VoicedNote::at_pitch(n("D"), -10).octave_offset, -1);
    }

    #[test]
    fn test_serde_as_text() {
        let json = serde_json::to_string(&n("F#")).unwrap();
        assert_eq!(json, "\"F#\"");
        let back: NoteName = serde_json::from_str("\"Cb\"").unwrap();
        assert_eq!(back, n("Cb"));
    }
}
