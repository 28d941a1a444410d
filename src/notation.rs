//! # Notation Projection
//!
//! Bundles what the external notation renderer needs for one question into
//! a serializable [`RenderRequest`]: VexFlow keys, clef, sequential cursor,
//! key signature, and the accidentals that must be drawn explicitly.
//!
//! ## Explicit accidentals
//! A note needs a drawn accidental when its spelling differs from what the
//! key signature implies for its letter, including a natural sign on a
//! letter the signature alters. In a sequential (melodic) request the
//! alteration carries through the rest of the measure for that letter and
//! octave, as in standard notation. Chord notes are judged independently.

use crate::keys::KeySignature;
use crate::note::{Accidental, Letter, VoicedNote};
use serde::Serialize;
use std::collections::HashMap;

/// Notes whose highest pitch is below middle C go on the bass staff.
const MIDDLE_C: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    pub fn for_notes(notes: &[VoicedNote], base_octave: i8) -> Self {
        match notes.iter().map(|note| note.midi(base_octave)).max() {
            Some(highest) if highest < MIDDLE_C => Clef::Bass,
            _ => Clef::Treble,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub notes: Vec<String>,
    pub clef: Clef,
    pub sequential: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_signature: Option<String>,
    /// VexFlow accidental code per note (`"#"`, `"b"`, `"n"`, `"##"`, `"bb"`),
    /// `None` where the signature already covers it.
    pub accidentals: Vec<Option<String>>,
}

pub fn render_request(
    notes: &[VoicedNote],
    base_octave: i8,
    sequential: bool,
    current_index: Option<usize>,
    signature: Option<KeySignature>,
) -> RenderRequest {
    RenderRequest {
        notes: notes.iter().map(|note| note.vexflow(base_octave)).collect(),
        clef: Clef::for_notes(notes, base_octave),
        sequential,
        current_index,
        key_signature: signature.map(|sig| sig.name()),
        accidentals: explicit_accidentals(notes, sequential, signature)
            .into_iter()
            .map(|acc| acc.map(|a| vexflow_accidental(a).to_string()))
            .collect(),
    }
}

/// Accidentals that must be drawn, one entry per note.
pub fn explicit_accidentals(
    notes: &[VoicedNote],
    sequential: bool,
    signature: Option<KeySignature>,
) -> Vec<Option<Accidental>> {
    let signature = signature.unwrap_or_default();
    let mut in_effect: HashMap<(Letter, i8), Accidental> = HashMap::new();

    notes
        .iter()
        .map(|note| {
            let slot = (note.name.letter, note.octave_offset);
            let expected = in_effect
                .get(&slot)
                .copied()
                .unwrap_or_else(|| signature.accidental_for(note.name.letter));
            if note.name.accidental == expected {
                return None;
            }
            if sequential {
                in_effect.insert(slot, note.name.accidental);
            }
            Some(note.name.accidental)
        })
        .collect()
}

pub fn vexflow_accidental(accidental: Accidental) -> &'static str {
    match accidental {
        Accidental::DoubleFlat => "bb",
        Accidental::Flat => "b",
        Accidental::Natural => "n",
        Accidental::Sharp => "#",
        Accidental::DoubleSharp => "##",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str, octave_offset: i8) -> VoicedNote {
        VoicedNote::new(text.parse().unwrap(), octave_offset)
    }

    #[test]
    fn test_clef_selection() {
        assert_eq!(Clef::for_notes(&[v("C", 0), v("E", 0)], 4), Clef::Treble);
        assert_eq!(Clef::for_notes(&[v("C", 0), v("B", 0)], 3), Clef::Bass);
        assert_eq!(Clef::for_notes(&[], 3), Clef::Treble);
    }

    #[test]
    fn test_chord_accidentals_against_signature() {
        let d_major = KeySignature { fifths: 2, minor: false };
        let notes = [v("D", 0), v("F#", 0), v("A", 0)];
        assert_eq!(explicit_accidentals(&notes, false, Some(d_major)), vec![None, None, None]);

        let notes = [v("D", 0), v("F", 0), v("A", 0)];
        assert_eq!(
            explicit_accidentals(&notes, false, Some(d_major)),
            vec![None, Some(Accidental::Natural), None]
        );
    }

    #[test]
    fn test_sequential_accidentals_carry() {
        let c_major = KeySignature::default();
        let notes = [v("F#", 0), v("F#", 0), v("F", 0), v("F#", 1)];
        assert_eq!(
            explicit_accidentals(&notes, true, Some(c_major)),
            vec![
                Some(Accidental::Sharp),
                None,
                Some(Accidental::Natural),
                Some(Accidental::Sharp)
            ]
        );
    }

    #[test]
    fn test_no_signature_means_all_natural() {
        let notes = [v("Eb", 0), v("D", 0)];
        assert_eq!(explicit_accidentals(&notes, false, None), vec![Some(Accidental::Flat), None]);
    }

    #[test]
    fn test_render_request_json() {
        let eb = KeySignature { fifths: -3, minor: false };
        let request = render_request(&[v("Eb", 0), v("G", 0), v("B", 0)], 4, false, None, Some(eb));
        assert_eq!(request.notes, vec!["Eb/4", "G/4", "B/4"]);
        assert_eq!(request.accidentals, vec![None, None, Some("n".to_string())]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["keySignature"], "Eb");
        assert_eq!(json["clef"], "treble");
        assert!(json.get("currentIndex").is_none());
    }
}
