pub mod chords;
pub mod config;
pub mod drills;
pub mod error;
pub mod keys;
pub mod lesson;
pub mod manager;
pub mod notation;
pub mod note;
pub mod patterns;
pub mod random;

pub use chords::{diatonic_chords, Chord, ChordQuality, ChordType};
pub use config::SessionConfig;
pub use drills::{DrillOptions, DrillQuestion, DrillResult, DrillStrategy, Range, Score};
pub use error::*;
pub use keys::{scale_for, KeyContext, KeySignature, Mode};
pub use manager::{DrillManager, DrillModule};
pub use notation::RenderRequest;
pub use note::{are_enharmonic, Accidental, Letter, NoteName, VoicedNote};
pub use patterns::{generate_pattern, Difficulty, MelodicPattern};

/// Spelled scale for a key written as `"Eb"`, `"Ebm"` or `"Eb Harmonic Minor"`.
/// This is the main text entry point for the library.
pub fn scale_notes(key: &str) -> Result<Vec<NoteName>, DrillError> {
    let context: KeyContext = key.parse()?;
    Ok(context.scale_notes())
}

/// Diatonic chords for a key written as `"Eb"`, `"Ebm"` or `"Eb Harmonic Minor"`.
pub fn key_chords(key: &str, chord_type: ChordType) -> Result<Vec<Chord>, DrillError> {
    let context: KeyContext = key.parse()?;
    Ok(chords::chords_for_context(&context, chord_type))
}
