//! # Chord Generator
//!
//! Builds the seven diatonic triads or seventh chords of a key by stacking
//! thirds over its scale, classifies each by interval pattern, and voices
//! chords in closed position with optional inversion.
//!
//! ## Quality Table
//! Semitones above the root (third, fifth, seventh):
//! - Triads: `[4,7]` Major, `[3,7]` Minor, `[3,6]` Diminished, `[4,8]` Augmented
//! - Sevenths: `[4,7,11]` Major 7, `[3,7,10]` Minor 7, `[4,7,10]` Dominant 7,
//!   `[3,6,10]` Half-Diminished 7, `[3,6,9]` Diminished 7,
//!   `[3,7,11]` Minor-Major 7, `[4,8,11]` Augmented Major 7
//!
//! A pattern outside the table gets a best-effort quality from its third and
//! seventh. Chord building never fails.
//!
//! ## Related Modules
//! - `keys` - supplies the scales
//! - `drills::chord` - quizzes these chords
//! - `lesson` - browses them one by one

use crate::keys::{key_root_by_id, KeyContext, Mode};
use crate::note::{interval_semitones, NoteName, VoicedNote};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Triads (3 notes) or seventh chords (4 notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordType {
    #[default]
    Triads,
    Sevenths,
}

impl ChordType {
    /// Number of chord tones.
    pub fn size(self) -> usize {
        match self {
            ChordType::Triads => 3,
            ChordType::Sevenths => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
    HalfDiminished7,
    Diminished7,
    MinorMajor7,
    AugmentedMajor7,
}

impl ChordQuality {
    pub fn display_name(self) -> &'static str {
        match self {
            ChordQuality::Major => "Major",
            ChordQuality::Minor => "Minor",
            ChordQuality::Diminished => "Diminished",
            ChordQuality::Augmented => "Augmented",
            ChordQuality::Major7 => "Major 7",
            ChordQuality::Minor7 => "Minor 7",
            ChordQuality::Dominant7 => "Dominant 7",
            ChordQuality::HalfDiminished7 => "Half-Diminished 7",
            ChordQuality::Diminished7 => "Diminished 7",
            ChordQuality::MinorMajor7 => "Minor-Major 7",
            ChordQuality::AugmentedMajor7 => "Augmented Major 7",
        }
    }

    /// Exact lookup in the quality table.
    pub fn from_intervals(third: u8, fifth: u8, seventh: Option<u8>) -> Option<Self> {
        match (third, fifth, seventh) {
            (4, 7, None) => Some(ChordQuality::Major),
            (3, 7, None) => Some(ChordQuality::Minor),
            (3, 6, None) => Some(ChordQuality::Diminished),
            (4, 8, None) => Some(ChordQuality::Augmented),
            (4, 7, Some(11)) => Some(ChordQuality::Major7),
            (3, 7, Some(10)) => Some(ChordQuality::Minor7),
            (4, 7, Some(10)) => Some(ChordQuality::Dominant7),
            (3, 6, Some(10)) => Some(ChordQuality::HalfDiminished7),
            (3, 6, Some(9)) => Some(ChordQuality::Diminished7),
            (3, 7, Some(11)) => Some(ChordQuality::MinorMajor7),
            (4, 8, Some(11)) => Some(ChordQuality::AugmentedMajor7),
            _ => None,
        }
    }

    /// Closest quality for a pattern outside the table.
    fn approximate(third: u8, seventh: Option<u8>) -> Self {
        let major_third = third >= 4;
        match (major_third, seventh) {
            (true, None) => ChordQuality::Major,
            (false, None) => ChordQuality::Minor,
            (true, Some(11)) => ChordQuality::Major7,
            (true, Some(_)) => ChordQuality::Dominant7,
            (false, Some(11)) => ChordQuality::MinorMajor7,
            (false, Some(_)) => ChordQuality::Minor7,
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A named diatonic chord. `notes[0]` is the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub name: String,
    pub root: NoteName,
    pub quality: ChordQuality,
    pub notes: Vec<NoteName>,
}

/// Diatonic chords for a root id such as `"Eb"`.
///
/// # Examples
/// ```
/// use pianodrill::chords::{diatonic_chords, ChordType};
/// use pianodrill::keys::Mode;
///
/// let chords = diatonic_chords("C", Mode::Major, ChordType::Sevenths);
/// assert_eq!(chords[4].name, "G Dominant 7");
/// ```
pub fn diatonic_chords(root_id: &str, mode: Mode, chord_type: ChordType) -> Vec<Chord> {
    match key_root_by_id(root_id) {
        Some(key) => chords_for_context(&KeyContext::new(key.root, mode), chord_type),
        None => {
            warn!("No chords for unknown key root '{}'", root_id);
            Vec::new()
        }
    }
}

/// Diatonic chords for a key context. Chromatic contexts use the root's
/// Major scale.
pub fn chords_for_context(ctx: &KeyContext, chord_type: ChordType) -> Vec<Chord> {
    let mode = if ctx.mode == Mode::Chromatic {
        Mode::Major
    } else {
        ctx.mode
    };
    let scale = KeyContext::new(ctx.root, mode).scale_notes();
    if scale.len() != 7 {
        return Vec::new();
    }

    (0..7)
        .map(|degree| build_chord(&scale, degree, chord_type))
        .collect()
}

fn build_chord(scale: &[NoteName], degree: usize, chord_type: ChordType) -> Chord {
    let notes: Vec<NoteName> = (0..chord_type.size())
        .map(|k| scale[(degree + 2 * k) % scale.len()])
        .collect();

    let root = notes[0];
    let third = interval_semitones(root, notes[1]);
    let fifth = interval_semitones(root, notes[2]);
    let seventh = notes.get(3).map(|n| interval_semitones(root, *n));

    let quality = ChordQuality::from_intervals(third, fifth, seventh).unwrap_or_else(|| {
        let quality = ChordQuality::approximate(third, seventh);
        warn!(
            "Unrecognized chord pattern [{}, {}, {:?}] on {}, using {}",
            third, fifth, seventh, root, quality
        );
        quality
    });

    Chord {
        name: format!("{} {}", root, quality),
        root,
        quality,
        notes,
    }
}

/// Closed-position voicing of `chord`.
///
/// Notes are stacked upward from the root in the base octave, bumping the
/// octave whenever a note would sound lower than the previous one.
/// `inversion` moves that many bottom notes up an octave (taken modulo the
/// chord size); `octave_shift` moves the whole voicing. The result always
/// ascends and spans at most an octave.
pub fn voice(chord: &Chord, inversion: usize, octave_shift: i8) -> Vec<VoicedNote> {
    let mut voiced: Vec<VoicedNote> = Vec::with_capacity(chord.notes.len());
    for &name in &chord.notes {
        let mut note = VoicedNote::new(name, 0);
        if let Some(previous) = voiced.last() {
            while note.midi(0) < previous.midi(0) {
                note.octave_offset += 1;
            }
        }
        voiced.push(note);
    }

    if !voiced.is_empty() {
        for _ in 0..inversion % voiced.len() {
            let bottom = voiced.remove(0);
            voiced.push(bottom.shifted(1));
        }
    }

    voiced
        .into_iter()
        .map(|note| note.shifted(octave_shift))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> NoteName {
        text.parse().unwrap()
    }

    fn note_names(chord: &Chord) -> Vec<String> {
        chord.notes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_c_major_triads() {
        let chords = diatonic_chords("C", Mode::Major, ChordType::Triads);
        let names: Vec<&str> = chords.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "C Major",
                "D Minor",
                "E Minor",
                "F Major",
                "G Major",
                "A Minor",
                "B Diminished"
            ]
        );
        assert_eq!(note_names(&chords[0]), vec!["C", "E", "G"]);
    }

    #[test]
    fn test_c_major_sevenths() {
        let chords = diatonic_chords("C", Mode::Major, ChordType::Sevenths);
        assert_eq!(chords[4].quality, ChordQuality::Dominant7);
        assert_eq!(note_names(&chords[4]), vec!["G", "B", "D", "F"]);
        assert_eq!(chords[0].quality, ChordQuality::Major7);
        assert_eq!(chords[1].quality, ChordQuality::Minor7);
        assert_eq!(chords[6].name, "B Half-Diminished 7");
    }

    #[test]
    fn test_eb_harmonic_minor_sevenths() {
        let chords = diatonic_chords("Eb", Mode::HarmonicMinor, ChordType::Sevenths);
        assert_eq!(chords.len(), 7);

        assert_eq!(chords[4].name, "Bb Dominant 7");
        assert_eq!(note_names(&chords[4]), vec!["Bb", "D", "F", "Ab"]);

        assert_eq!(chords[6].quality, ChordQuality::Diminished7);
        assert_eq!(note_names(&chords[6]), vec!["D", "F", "Ab", "Cb"]);

        assert_eq!(chords[0].quality, ChordQuality::MinorMajor7);
        assert_eq!(chords[2].quality, ChordQuality::AugmentedMajor7);
    }

    #[test]
    fn test_chord_notes_are_in_scale() {
        for mode in [
            Mode::Major,
            Mode::Minor,
            Mode::HarmonicMinor,
            Mode::MelodicMinor,
            Mode::Dorian,
        ] {
            let scale = crate::keys::scale_for("Ab", mode);
            for chord in diatonic_chords("Ab", mode, ChordType::Sevenths) {
                for note in &chord.notes {
                    assert!(scale.contains(note), "{} not in Ab {}", note, mode);
                }
            }
        }
    }

    #[test]
    fn test_chromatic_uses_major_chords() {
        let chromatic = diatonic_chords("D", Mode::Chromatic, ChordType::Triads);
        let major = diatonic_chords("D", Mode::Major, ChordType::Triads);
        assert_eq!(chromatic, major);
    }

    #[test]
    fn test_unknown_root_is_empty() {
        assert!(diatonic_chords("H", Mode::Major, ChordType::Triads).is_empty());
    }

    #[test]
    fn test_quality_table() {
        assert_eq!(ChordQuality::from_intervals(3, 6, None), Some(ChordQuality::Diminished));
        assert_eq!(ChordQuality::from_intervals(3, 6, Some(9)), Some(ChordQuality::Diminished7));
        assert_eq!(ChordQuality::from_intervals(2, 7, None), None);
        assert_eq!(ChordQuality::approximate(2, None), ChordQuality::Minor);
        assert_eq!(ChordQuality::approximate(5, Some(10)), ChordQuality::Dominant7);
    }

    #[test]
    fn test_root_position_voicing() {
        let chords = diatonic_chords("C", Mode::Major, ChordType::Triads);
        let voicing = voice(&chords[0], 0, 0);
        let keys: Vec<String> = voicing.iter().map(|v| v.vexflow(4)).collect();
        assert_eq!(keys, vec!["C/4", "E/4", "G/4"]);

        let voicing = voice(&chords[5], 0, 0);
        let keys: Vec<String> = voicing.iter().map(|v| v.vexflow(4)).collect();
        assert_eq!(keys, vec!["A/4", "C/5", "E/5"]);
    }

    #[test]
    fn test_inversions_and_shift() {
        let chords = diatonic_chords("C", Mode::Major, ChordType::Triads);
        let first = voice(&chords[0], 1, 0);
        let keys: Vec<String> = first.iter().map(|v| v.vexflow(4)).collect();
        assert_eq!(keys, vec!["E/4", "G/4", "C/5"]);

        let second_low = voice(&chords[0], 2, -1);
        let keys: Vec<String> = second_low.iter().map(|v| v.vexflow(4)).collect();
        assert_eq!(keys, vec!["G/3", "C/4", "E/4"]);

        assert_eq!(voice(&chords[0], 3, 0), voice(&chords[0], 0, 0));
    }

    #[test]
    fn test_voicings_ascend_within_an_octave() {
        for key in crate::keys::ALL_ROOTS.iter() {
            for mode in Mode::ALL {
                let context = KeyContext::new(key.root, mode);
                for chord_type in [ChordType::Triads, ChordType::Sevenths] {
                    for chord in chords_for_context(&context, chord_type) {
                        for inversion in 0..chord.notes.len() {
                            let root_position = voice(&chord, inversion, 0)[0].midi(4);
                            for shift in -1..=1 {
                                let midi: Vec<i32> = voice(&chord, inversion, shift)
                                    .iter()
                                    .map(|v| v.midi(4))
                                    .collect();
                                let label =
                                    format!("{} inv {} shift {}", chord.name, inversion, shift);
                                assert!(
                                    midi.windows(2).all(|w| w[0] < w[1]),
                                    "{}: {:?}",
                                    label,
                                    midi
                                );
                                assert!(midi[midi.len() - 1] - midi[0] <= 12, "{}", label);
                                let expected = root_position + 12 * shift as i32;
                                assert_eq!(midi[0], expected, "{}", label);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_cb_voicing_keeps_written_octave() {
        let chord = Chord {
            name: "Ab Minor".to_string(),
            root: n("Ab"),
            quality: ChordQuality::Minor,
            notes: vec![n("Ab"), n("Cb"), n("Eb")],
        };
        let keys: Vec<String> = voice(&chord, 0, 0).iter().map(|v| v.vexflow(4)).collect();
        assert_eq!(keys, vec!["Ab/4", "Cb/5", "Eb/5"]);
    }
}
