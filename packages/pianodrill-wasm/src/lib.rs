use pianodrill::lesson::LessonManager;
use pianodrill::{
    are_enharmonic, Chord, ChordType, DrillError, DrillManager, DrillModule, DrillOptions,
    DrillResult, KeyContext, NoteName, Range, SessionConfig,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct ErrorPayload {
    kind: &'static str,
    message: String,
}

fn error_kind(e: &DrillError) -> &'static str {
    match e {
        DrillError::InvalidNote(_) => "invalidNote",
        DrillError::UnknownKey(_) => "unknownKey",
        DrillError::UnknownMode(_) => "unknownMode",
        DrillError::UnknownModule(_) => "unknownModule",
        DrillError::InvalidOption { .. } => "invalidOption",
        DrillError::Config(_) => "config",
    }
}

fn to_js_error(e: DrillError) -> JsValue {
    let payload = ErrorPayload {
        kind: error_kind(&e),
        message: e.to_string(),
    };
    let json = serde_json::to_string(&payload).unwrap_or_else(|_| payload.message.clone());
    JsValue::from_str(&json)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn result_name(result: DrillResult) -> &'static str {
    match result {
        DrillResult::Correct => "correct",
        DrillResult::Incorrect => "incorrect",
        DrillResult::Continue => "continue",
    }
}

/// Spelled scale as a JSON array, e.g. `["Eb","F","Gb",...]`
#[wasm_bindgen]
pub fn scale(key: &str) -> Result<String, JsValue> {
    let notes = pianodrill::scale_notes(key).map_err(to_js_error)?;
    to_json(&notes)
}

/// Diatonic chords as a JSON array of `{name, root, quality, notes}`
#[wasm_bindgen]
pub fn chords(key: &str, sevenths: bool) -> Result<String, JsValue> {
    let chords = pianodrill::key_chords(key, chord_type(sevenths)).map_err(to_js_error)?;
    to_json(&chords)
}

/// Renderer key-signature name, or `undefined` when the key needs more than
/// seven accidentals
#[wasm_bindgen]
pub fn key_signature(key: &str) -> Result<Option<String>, JsValue> {
    let context: KeyContext = key.parse().map_err(to_js_error)?;
    Ok(context.key_signature().map(|sig| sig.name()))
}

#[wasm_bindgen]
pub fn enharmonic(a: &str, b: &str) -> bool {
    are_enharmonic(a, b)
}

/// One drill session: wraps the manager for the browser UI.
#[wasm_bindgen]
pub struct DrillSession {
    manager: DrillManager,
}

#[wasm_bindgen]
impl DrillSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DrillSession {
        DrillSession {
            manager: DrillManager::new(),
        }
    }

    /// Session from a YAML config (key, mode, module, options, seed)
    pub fn from_config(yaml: &str) -> Result<DrillSession, JsValue> {
        let config = SessionConfig::from_yaml(yaml).map_err(to_js_error)?;
        Ok(DrillSession {
            manager: config.build_manager(),
        })
    }

    pub fn set_module(&mut self, module: &str) -> Result<(), JsValue> {
        let module: DrillModule = module.parse().map_err(to_js_error)?;
        self.manager.set_module(module);
        Ok(())
    }

    pub fn set_key(&mut self, key: &str) -> Result<(), JsValue> {
        let context: KeyContext = key.parse().map_err(to_js_error)?;
        self.manager.set_key_context(context);
        Ok(())
    }

    pub fn set_options(&mut self, inversions: bool, range: &str) -> Result<(), JsValue> {
        let range: Range = range.parse().map_err(to_js_error)?;
        self.manager.set_options(DrillOptions {
            inversions,
            range,
            ..self.manager.options()
        });
        Ok(())
    }

    pub fn is_sequential(&self) -> bool {
        self.manager.is_sequential()
    }

    /// Advance to the next question and return its display name
    pub fn next_question(&mut self) -> String {
        self.manager.next_question().name
    }

    /// Judge an array of note names (`["C", "E", "G"]`).
    /// Returns `"correct"`, `"incorrect"`, `"continue"`, or `undefined` for a no-op.
    pub fn check_answer(&mut self, notes: JsValue) -> Result<Option<String>, JsValue> {
        let texts: Vec<String> = serde_wasm_bindgen::from_value(notes)?;
        let input = texts
            .iter()
            .map(|text| text.parse::<NoteName>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js_error)?;
        Ok(self
            .manager
            .check_answer(&input)
            .map(|result| result_name(result).to_string()))
    }

    /// Score as `{correct, total}`
    pub fn score(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.manager.score())?)
    }

    pub fn reset_score(&mut self) {
        self.manager.reset_score();
    }

    pub fn vexflow_notes(&self, base_octave: i8) -> Vec<String> {
        self.manager.vexflow_notes(base_octave)
    }

    pub fn playback_notes(&self, base_octave: i8) -> Vec<String> {
        self.manager.playback_notes(base_octave)
    }

    pub fn last_correct_note(&self, base_octave: i8) -> Option<String> {
        self.manager.last_correct_note(base_octave)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.manager.current_index()
    }

    /// Notes, clef, cursor, key signature and explicit accidentals as JSON
    pub fn render_request(&self, base_octave: i8) -> Result<String, JsValue> {
        to_json(&self.manager.render_request(base_octave))
    }
}

impl Default for DrillSession {
    fn default() -> Self {
        Self::new()
    }
}

fn chord_type(sevenths: bool) -> ChordType {
    if sevenths {
        ChordType::Sevenths
    } else {
        ChordType::Triads
    }
}

fn chord_json(chord: Option<&Chord>) -> Result<Option<String>, JsValue> {
    chord.map(to_json).transpose()
}

/// Chord-by-chord lesson view over the diatonic chords of one key.
#[wasm_bindgen]
pub struct LessonSession {
    lesson: LessonManager,
}

#[wasm_bindgen]
impl LessonSession {
    #[wasm_bindgen(constructor)]
    pub fn new(key: &str, sevenths: bool) -> Result<LessonSession, JsValue> {
        let context: KeyContext = key.parse().map_err(to_js_error)?;
        Ok(LessonSession {
            lesson: LessonManager::new(context, chord_type(sevenths)),
        })
    }

    pub fn set_key(&mut self, key: &str) -> Result<(), JsValue> {
        let context: KeyContext = key.parse().map_err(to_js_error)?;
        self.lesson.set_key_context(context);
        Ok(())
    }

    pub fn set_sevenths(&mut self, sevenths: bool) {
        self.lesson.set_chord_type(chord_type(sevenths));
    }

    /// All chords of the lesson as a JSON array
    pub fn chords(&self) -> Result<String, JsValue> {
        to_json(&self.lesson.chords())
    }

    pub fn position(&self) -> usize {
        self.lesson.position()
    }

    /// Current chord as JSON, or `undefined` when the key has no chords
    pub fn current(&self) -> Result<Option<String>, JsValue> {
        chord_json(self.lesson.current())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<String>, JsValue> {
        chord_json(self.lesson.next())
    }

    pub fn previous(&mut self) -> Result<Option<String>, JsValue> {
        chord_json(self.lesson.previous())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_json() {
        assert_eq!(scale("Gb").unwrap(), r#"["Gb","Ab","Bb","Cb","Db","Eb","F"]"#);
    }

    #[test]
    fn test_chords_json() {
        let json = chords("C", true).unwrap();
        assert!(json.contains(r#""name":"G Dominant 7""#));
    }

    #[test]
    fn test_enharmonic() {
        assert!(enharmonic("Cb", "B"));
        assert!(!enharmonic("C", "D"));
    }

    #[test]
    fn test_session_flow() {
        let mut session = DrillSession::from_config("module: melody\nseed: 3\n").unwrap();
        assert!(session.is_sequential());
        session.next_question();
        assert_eq!(session.current_index(), Some(0));
        let request = session.render_request(4).unwrap();
        assert!(request.contains(r#""sequential":true"#));
    }

    #[test]
    fn test_lesson_session() {
        let mut lesson = LessonSession::new("C", false).unwrap();
        assert_eq!(lesson.chords().unwrap().matches(r#""name""#).count(), 7);
        assert!(lesson.current().unwrap().unwrap().contains(r#""name":"C Major""#));
        assert!(lesson.previous().unwrap().unwrap().contains("B Diminished"));
        assert_eq!(lesson.position(), 6);

        lesson.set_sevenths(true);
        assert_eq!(lesson.position(), 0);
        assert!(lesson.next().unwrap().unwrap().contains("D Minor 7"));
    }

    #[test]
    fn test_extreme_base_octave() {
        let mut session = DrillSession::from_config("module: speed\nseed: 5\n").unwrap();
        session.next_question();
        assert_eq!(session.vexflow_notes(i8::MAX).len(), 1);
        assert!(session.render_request(i8::MIN).is_ok());
    }
}
