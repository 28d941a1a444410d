//! # Key/Scale Engine
//!
//! Produces correctly spelled 7-note scales (or the 12-note chromatic scale)
//! for the 15 selectable key roots and 7 modes.
//!
//! ## Spelling Pipeline
//! 1. **Bias**: the root's Major accidental count, adjusted by the mode
//!    (minor family -3, Dorian -2, Mixolydian -1), picks the sharp or flat
//!    reference array. Zero or more means sharps.
//! 2. **Map**: the mode's interval pattern is applied from the root's
//!    chromatic index into that array.
//! 3. **Fix-up**: every degree is respelled onto its own letter
//!    (root letter + degree number). This is where Cb in Gb Major, E#/B# in
//!    C# Major and Fb/Cb in Ab Minor come from.
//!
//! Chromatic mode skips the fix-up: it is the biased array rotated to the
//! root, with the root keeping its own spelling.
//!
//! ## Key Signatures
//! [`KeySignature`] is the renderer-facing view: a fifths count in -7..=7
//! and a minor flag. A context whose adjusted count falls outside that
//! range (Gb Minor, Cb Dorian, ...) has no signature.
//!
//! ## Related Modules
//! - `note` - spellings and the chromatic resolver
//! - `chords` - stacks thirds over these scales
//! - `patterns` - walks [`Scale::note_at`] ladders

use crate::error::DrillError;
use crate::note::{Accidental, Letter, NoteName, VoicedNote, NOTES_FLAT, NOTES_SHARP};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale/mode of a key context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    #[default]
    Major,
    Minor,
    HarmonicMinor,
    MelodicMinor,
    Dorian,
    Mixolydian,
    Chromatic,
}

const MAJOR_INTERVALS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_INTERVALS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];
const HARMONIC_MINOR_INTERVALS: [u8; 7] = [0, 2, 3, 5, 7, 8, 11];
const MELODIC_MINOR_INTERVALS: [u8; 7] = [0, 2, 3, 5, 7, 9, 11];
const DORIAN_INTERVALS: [u8; 7] = [0, 2, 3, 5, 7, 9, 10];
const MIXOLYDIAN_INTERVALS: [u8; 7] = [0, 2, 4, 5, 7, 9, 10];
const CHROMATIC_INTERVALS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Major,
        Mode::Minor,
        Mode::HarmonicMinor,
        Mode::MelodicMinor,
        Mode::Dorian,
        Mode::Mixolydian,
        Mode::Chromatic,
    ];

    /// Semitone offsets of each degree from the root.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Mode::Major => &MAJOR_INTERVALS,
            Mode::Minor => &MINOR_INTERVALS,
            Mode::HarmonicMinor => &HARMONIC_MINOR_INTERVALS,
            Mode::MelodicMinor => &MELODIC_MINOR_INTERVALS,
            Mode::Dorian => &DORIAN_INTERVALS,
            Mode::Mixolydian => &MIXOLYDIAN_INTERVALS,
            Mode::Chromatic => &CHROMATIC_INTERVALS,
        }
    }

    /// Change to the Major accidental count when spelling in this mode.
    pub fn fifths_adjustment(self) -> i8 {
        match self {
            Mode::Major | Mode::Chromatic => 0,
            Mode::Minor | Mode::HarmonicMinor | Mode::MelodicMinor => -3,
            Mode::Dorian => -2,
            Mode::Mixolydian => -1,
        }
    }

    pub fn is_minor(self) -> bool {
        matches!(self, Mode::Minor | Mode::HarmonicMinor | Mode::MelodicMinor)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "Major",
            Mode::Minor => "Minor",
            Mode::HarmonicMinor => "Harmonic Minor",
            Mode::MelodicMinor => "Melodic Minor",
            Mode::Dorian => "Dorian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Chromatic => "Chromatic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = DrillError;

    /// Case-insensitive; spaces, dashes and underscores are ignored, so
    /// `"Harmonic Minor"`, `"harmonic-minor"` and `"harmonicMinor"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "major" | "ionian" => Ok(Mode::Major),
            "minor" | "naturalminor" | "aeolian" => Ok(Mode::Minor),
            "harmonicminor" => Ok(Mode::HarmonicMinor),
            "melodicminor" => Ok(Mode::MelodicMinor),
            "dorian" => Ok(Mode::Dorian),
            "mixolydian" => Ok(Mode::Mixolydian),
            "chromatic" => Ok(Mode::Chromatic),
            _ => Err(DrillError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = DrillError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.name().to_string()
    }
}

/// One of the selectable key roots with its Major accidental count
/// (positive = sharps, negative = flats).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRoot {
    pub id: &'static str,
    pub root: NoteName,
    pub accidentals: i8,
}

const fn key_root(
    id: &'static str,
    letter: Letter,
    accidental: Accidental,
    accidentals: i8,
) -> KeyRoot {
    KeyRoot {
        id,
        root: NoteName::new(letter, accidental),
        accidentals,
    }
}

pub static ALL_ROOTS: [KeyRoot; 15] = [
    key_root("C", Letter::C, Accidental::Natural, 0),
    key_root("C#", Letter::C, Accidental::Sharp, 7),
    key_root("Db", Letter::D, Accidental::Flat, -5),
    key_root("D", Letter::D, Accidental::Natural, 2),
    key_root("Eb", Letter::E, Accidental::Flat, -3),
    key_root("E", Letter::E, Accidental::Natural, 4),
    key_root("F", Letter::F, Accidental::Natural, -1),
    key_root("F#", Letter::F, Accidental::Sharp, 6),
    key_root("Gb", Letter::G, Accidental::Flat, -6),
    key_root("G", Letter::G, Accidental::Natural, 1),
    key_root("Ab", Letter::A, Accidental::Flat, -4),
    key_root("A", Letter::A, Accidental::Natural, 3),
    key_root("Bb", Letter::B, Accidental::Flat, -2),
    key_root("B", Letter::B, Accidental::Natural, 5),
    key_root("Cb", Letter::C, Accidental::Flat, -7),
];

pub fn key_root_by_id(id: &str) -> Option<&'static KeyRoot> {
    let id = id.trim();
    ALL_ROOTS.iter().find(|key| key.id == id)
}

pub fn key_root_for(note: NoteName) -> Option<&'static KeyRoot> {
    ALL_ROOTS.iter().find(|key| key.root == note)
}

/// Whether `mode` on this root is spelled from the sharp reference array.
pub fn prefers_sharps(key: &KeyRoot, mode: Mode) -> bool {
    key.accidentals + mode.fifths_adjustment() >= 0
}

/// Spelled scale for a root id such as `"Eb"`.
///
/// Returns an empty vector for an id outside [`ALL_ROOTS`].
///
/// # Examples
/// ```
/// use pianodrill::keys::{scale_for, Mode};
///
/// let notes: Vec<String> = scale_for("Gb", Mode::Major).iter().map(|n| n.to_string()).collect();
/// assert_eq!(notes, vec!["Gb", "Ab", "Bb", "Cb", "Db", "Eb", "F"]);
/// ```
pub fn scale_for(root_id: &str, mode: Mode) -> Vec<NoteName> {
    match key_root_by_id(root_id) {
        Some(key) => build_scale(key, mode),
        None => {
            warn!("No scale for unknown key root '{}'", root_id);
            Vec::new()
        }
    }
}

fn build_scale(key: &KeyRoot, mode: Mode) -> Vec<NoteName> {
    let reference = if prefers_sharps(key, mode) {
        &NOTES_SHARP
    } else {
        &NOTES_FLAT
    };
    let root_index = key.root.chromatic_index() as usize;

    let mut scale: Vec<NoteName> = mode
        .intervals()
        .iter()
        .map(|&interval| reference[(root_index + interval as usize) % 12])
        .collect();

    if mode == Mode::Chromatic {
        scale[0] = key.root;
        return scale;
    }

    for (degree, note) in scale.iter_mut().enumerate() {
        let letter = key.root.letter.offset(degree);
        if note.letter != letter {
            if let Some(respelled) = NoteName::respell(note.chromatic_index(), letter) {
                *note = respelled;
            }
        }
    }

    scale
}

/// The currently selected key: root plus mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyContext {
    pub root: NoteName,
    pub mode: Mode,
}

impl Default for KeyContext {
    fn default() -> Self {
        Self {
            root: NoteName::natural(Letter::C),
            mode: Mode::Major,
        }
    }
}

impl KeyContext {
    pub fn new(root: NoteName, mode: Mode) -> Self {
        Self { root, mode }
    }

    pub fn key_root(&self) -> Option<&'static KeyRoot> {
        key_root_for(self.root)
    }

    /// Scale spelling for this context; empty for a root outside [`ALL_ROOTS`].
    pub fn scale_notes(&self) -> Vec<NoteName> {
        match self.key_root() {
            Some(key) => build_scale(key, self.mode),
            None => {
                warn!("No scale for unknown key root '{}'", self.root);
                Vec::new()
            }
        }
    }

    pub fn scale(&self) -> Scale {
        Scale::new(self.scale_notes(), self.mode)
    }

    pub fn prefers_sharps(&self) -> bool {
        self.key_root()
            .map(|key| prefers_sharps(key, self.mode))
            .unwrap_or(true)
    }

    pub fn key_signature(&self) -> Option<KeySignature> {
        KeySignature::for_context(self)
    }
}

impl fmt::Display for KeyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.mode)
    }
}

impl FromStr for KeyContext {
    type Err = DrillError;

    /// Accepts `"Eb"` (Major), `"Ebm"` (Minor) or `"Eb Harmonic Minor"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (root_text, mode_text) = match trimmed.split_once(char::is_whitespace) {
            Some((root, mode)) => (root, Some(mode.trim())),
            None => (trimmed, None),
        };

        let (root_text, mode) = match mode_text {
            Some(mode) => (root_text, mode.parse::<Mode>()?),
            None if root_text.len() > 1 && root_text.ends_with('m') => {
                (&root_text[..root_text.len() - 1], Mode::Minor)
            }
            None => (root_text, Mode::Major),
        };

        let root: NoteName = root_text
            .parse()
            .map_err(|_| DrillError::UnknownKey(root_text.to_string()))?;
        if key_root_for(root).is_none() {
            return Err(DrillError::UnknownKey(root_text.to_string()));
        }

        Ok(Self { root, mode })
    }
}

/// Tonic of the context's mode. The selected root is always the tonic.
///
/// For the relative reading (the tonic of a mode inside a parent key
/// signature) see [`KeySignature::mode_root`].
pub fn mode_root(ctx: &KeyContext) -> NoteName {
    ctx.root
}

/// Respell a physically pressed note to its in-scale spelling.
///
/// Notes outside the scale come back unchanged.
pub fn contextual_spelling(note: NoteName, ctx: &KeyContext) -> NoteName {
    ctx.scale().find_enharmonic(note).unwrap_or(note)
}

/// A spelled scale plus the interval ladder used to place its degrees in
/// octaves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scale {
    notes: Vec<NoteName>,
    intervals: Vec<u8>,
}

impl Scale {
    fn new(notes: Vec<NoteName>, mode: Mode) -> Self {
        let intervals = if notes.len() == mode.intervals().len() {
            mode.intervals().to_vec()
        } else {
            Vec::new()
        };
        Self { notes, intervals }
    }

    pub fn notes(&self) -> &[NoteName] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// In-scale spelling of an enharmonic equivalent, if any.
    pub fn find_enharmonic(&self, note: NoteName) -> Option<NoteName> {
        self.notes.iter().copied().find(|n| n.is_enharmonic(note))
    }

    /// Scale step `step` placed relative to the root's octave.
    ///
    /// Step 0 is the root, `len()` is the root an octave up, -1 is the
    /// leading tone below. The octave offset follows the written letter, so
    /// `Cb` one step above `Bb` lands in the next written octave.
    pub fn note_at(&self, step: i32) -> Option<VoicedNote> {
        let root = self.notes.first()?;
        let len = self.notes.len() as i32;
        let degree = step.rem_euclid(len) as usize;
        let octaves = step.div_euclid(len);

        let root_pitch = root.letter.semitones() as i32 + root.accidental.offset() as i32;
        let pitch = root_pitch + *self.intervals.get(degree)? as i32 + 12 * octaves;

        Some(VoicedNote::at_pitch(self.notes[degree], pitch))
    }
}

/// Order in which sharps are added to a key signature.
const SHARP_ORDER: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

/// Order in which flats are added to a key signature.
const FLAT_ORDER: [Letter; 7] = [
    Letter::B,
    Letter::E,
    Letter::A,
    Letter::D,
    Letter::G,
    Letter::C,
    Letter::F,
];

/// Major tonics indexed by `fifths + 7`.
const MAJOR_TONICS: [NoteName; 15] = [
    NoteName::new(Letter::C, Accidental::Flat),
    NoteName::new(Letter::G, Accidental::Flat),
    NoteName::new(Letter::D, Accidental::Flat),
    NoteName::new(Letter::A, Accidental::Flat),
    NoteName::new(Letter::E, Accidental::Flat),
    NoteName::new(Letter::B, Accidental::Flat),
    NoteName::natural(Letter::F),
    NoteName::natural(Letter::C),
    NoteName::natural(Letter::G),
    NoteName::natural(Letter::D),
    NoteName::natural(Letter::A),
    NoteName::natural(Letter::E),
    NoteName::natural(Letter::B),
    NoteName::new(Letter::F, Accidental::Sharp),
    NoteName::new(Letter::C, Accidental::Sharp),
];

/// Minor tonics indexed by `fifths + 7`.
const MINOR_TONICS: [NoteName; 15] = [
    NoteName::new(Letter::A, Accidental::Flat),
    NoteName::new(Letter::E, Accidental::Flat),
    NoteName::new(Letter::B, Accidental::Flat),
    NoteName::natural(Letter::F),
    NoteName::natural(Letter::C),
    NoteName::natural(Letter::G),
    NoteName::natural(Letter::D),
    NoteName::natural(Letter::A),
    NoteName::natural(Letter::E),
    NoteName::natural(Letter::B),
    NoteName::new(Letter::F, Accidental::Sharp),
    NoteName::new(Letter::C, Accidental::Sharp),
    NoteName::new(Letter::G, Accidental::Sharp),
    NoteName::new(Letter::D, Accidental::Sharp),
    NoteName::new(Letter::A, Accidental::Sharp),
];

/// Key signature as the notation renderer expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeySignature {
    pub fifths: i8, // -7 to +7 (flats to sharps)
    pub minor: bool,
}

impl KeySignature {
    /// Signature for a key context. Chromatic contexts get the empty (C)
    /// signature; contexts needing more than seven accidentals get `None`.
    pub fn for_context(ctx: &KeyContext) -> Option<Self> {
        let key = ctx.key_root()?;
        if ctx.mode == Mode::Chromatic {
            return Some(Self::default());
        }
        let fifths = key.accidentals + ctx.mode.fifths_adjustment();
        if !(-7..=7).contains(&fifths) {
            return None;
        }
        Some(Self {
            fifths,
            minor: ctx.mode.is_minor(),
        })
    }

    fn table_index(&self) -> usize {
        (self.fifths.clamp(-7, 7) + 7) as usize
    }

    /// Major tonic sharing this signature.
    pub fn major_tonic(&self) -> NoteName {
        MAJOR_TONICS[self.table_index()]
    }

    /// Renderer key name, e.g. `"Eb"` or `"Cm"`.
    pub fn name(&self) -> String {
        if self.minor {
            format!("{}m", MINOR_TONICS[self.table_index()])
        } else {
            self.major_tonic().to_string()
        }
    }

    /// Accidental the signature applies to a letter.
    pub fn accidental_for(&self, letter: Letter) -> Accidental {
        let count = self.fifths.unsigned_abs().min(7) as usize;
        if self.fifths > 0 && SHARP_ORDER[..count].contains(&letter) {
            Accidental::Sharp
        } else if self.fifths < 0 && FLAT_ORDER[..count].contains(&letter) {
            Accidental::Flat
        } else {
            Accidental::Natural
        }
    }

    /// Tonic of `mode` within this signature (relative reading).
    ///
    /// The C signature gives D for Dorian and A for Minor; the A-minor
    /// signature gives C for Major.
    pub fn mode_root(&self, mode: Mode) -> NoteName {
        let tonic = self.major_tonic();
        let degree = match mode {
            Mode::Major | Mode::Chromatic => 0,
            Mode::Dorian => 1,
            Mode::Mixolydian => 4,
            Mode::Minor | Mode::HarmonicMinor | Mode::MelodicMinor => 5,
        };
        key_root_for(tonic)
            .and_then(|key| build_scale(key, Mode::Major).get(degree).copied())
            .unwrap_or(tonic)
    }
}

impl FromStr for KeySignature {
    type Err = DrillError;

    /// Parse `"G"`, `"Bb"`, `"Ebm"`, or a count such as `"###"` / `"bbb"`.
    /// A single `"b"` is B major; one flat is written `"F"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unknown = || DrillError::UnknownKey(s.to_string());

        if !trimmed.is_empty() && trimmed.chars().all(|c| c == '#') {
            let count = trimmed.len() as i8;
            if count <= 7 {
                return Ok(Self { fifths: count, minor: false });
            }
            return Err(unknown());
        }

        if trimmed.len() >= 2 && trimmed.chars().all(|c| c == 'b') {
            let count = trimmed.len() as i8;
            if count <= 7 {
                return Ok(Self { fifths: -count, minor: false });
            }
            return Err(unknown());
        }

        let (tonic_text, minor, table) = if trimmed.len() > 1 && trimmed.ends_with('m') {
            (&trimmed[..trimmed.len() - 1], true, &MINOR_TONICS)
        } else {
            (trimmed, false, &MAJOR_TONICS)
        };
        let tonic: NoteName = tonic_text.parse().map_err(|_| unknown())?;
        let index = table.iter().position(|t| *t == tonic).ok_or_else(unknown)?;

        Ok(Self {
            fifths: index as i8 - 7,
            minor,
        })
    }
}
