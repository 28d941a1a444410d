//! Integration tests for the pianodrill engine
//!
//! Drives the public API end to end: text keys to scales and chords, and
//! full drill sessions through the manager.

use pianodrill::note::parse_note_list;
use pianodrill::random::seeded;
use pianodrill::{
    are_enharmonic, key_chords, scale_notes, ChordType, DrillManager, DrillModule, DrillOptions,
    DrillResult, KeyContext, Mode, Range, SessionConfig,
};

fn names(notes: &[pianodrill::NoteName]) -> Vec<String> {
    notes.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_scale_from_text() {
    let scale = scale_notes("Eb Harmonic Minor").unwrap();
    assert_eq!(names(&scale), vec!["Eb", "F", "Gb", "Ab", "Bb", "Cb", "D"]);

    let scale = scale_notes("Abm").unwrap();
    assert!(names(&scale).contains(&"Fb".to_string()));

    assert!(scale_notes("H").is_err());
}

#[test]
fn test_chords_from_text() {
    let chords = key_chords("C", ChordType::Sevenths).unwrap();
    assert_eq!(chords[4].name, "G Dominant 7");
    assert_eq!(names(&chords[4].notes), vec!["G", "B", "D", "F"]);
}

#[test]
fn test_enharmonic_symmetry() {
    let spellings = [
        "C", "C#", "Db", "D", "D#", "Eb", "E", "Fb", "E#", "F", "F#", "Gb", "G", "G#", "Ab", "A",
        "A#", "Bb", "B", "Cb", "B#",
    ];
    for a in spellings {
        assert!(are_enharmonic(a, a));
        for b in spellings {
            assert_eq!(are_enharmonic(a, b), are_enharmonic(b, a), "{} / {}", a, b);
        }
    }
}

/// Play every chord question correctly by reading the answer back from the
/// playback projection.
#[test]
fn test_chord_session() {
    let mut manager = DrillManager::with_rng(seeded(100));
    manager.set_key_context("Gb".parse().unwrap());
    manager.set_module(DrillModule::Sevenths);
    manager.set_options(DrillOptions {
        inversions: true,
        range: Range::Wide,
        difficulty: None,
    });

    let mut previous = String::new();
    for round in 1..=25u32 {
        let question = manager.next_question();
        assert_ne!(question.name, previous);
        previous = question.name.clone();

        let answer = parse_note_list(&manager.playback_notes(4).join(" "));
        assert_eq!(answer.len(), 4);
        assert_eq!(manager.check_answer(&answer[..2]), Some(DrillResult::Continue));
        assert_eq!(manager.check_answer(&answer), Some(DrillResult::Correct));
        assert_eq!(manager.score().correct, round);
    }
}

#[test]
fn test_melody_session_through_manager() {
    let mut manager = DrillManager::with_rng(seeded(200));
    manager.set_key_context(KeyContext::new("D".parse().unwrap(), Mode::Dorian));
    manager.set_module(DrillModule::Melody);

    for _ in 0..5 {
        manager.next_question();
        let request = manager.render_request(4);
        assert!(request.sequential);
        assert_eq!(request.current_index, Some(0));
        assert_eq!(request.key_signature.as_deref(), Some("C"));

        let sequence = parse_note_list(&manager.playback_notes(4).join(" "));
        let last = sequence.len() - 1;
        for (i, note) in sequence.iter().enumerate() {
            let expected = if i == last {
                DrillResult::Correct
            } else {
                DrillResult::Continue
            };
            assert_eq!(manager.check_answer(&[*note]), Some(expected));
        }
        assert_eq!(manager.check_answer(&sequence[..1]), None);
    }
    assert_eq!(manager.score().correct, 5);
}

#[test]
fn test_interval_session_in_flat_minor() {
    let mut manager = DrillManager::with_rng(seeded(300));
    manager.set_key_context("Ebm".parse().unwrap());
    manager.set_module(DrillModule::Interval);

    for _ in 0..20 {
        let question = manager.next_question();
        assert!(question.name.starts_with("Interval: "));
        let target = parse_note_list(&manager.playback_notes(4).join(" "));
        assert_eq!(target.len(), 2);
        assert_eq!(manager.check_answer(&target[..1]), Some(DrillResult::Continue));
        assert_eq!(manager.last_correct_note(4), Some(manager.playback_notes(4)[0].clone()));
        assert_eq!(manager.check_answer(&target[1..]), Some(DrillResult::Correct));
    }
}

#[test]
fn test_session_config_round_trip() {
    let yaml = r#"
key: Ab
mode: minor
module: speed
range: high
seed: 9
"#;
    let config = SessionConfig::from_yaml(yaml).unwrap();
    let mut manager = config.build_manager();
    assert_eq!(manager.module(), DrillModule::Speed);

    let question = manager.next_question();
    let keys = manager.vexflow_notes(config.base_octave);
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0], format!("{}/5", question.name));

    let request = manager.render_request(config.base_octave);
    assert_eq!(request.key_signature.as_deref(), Some("Abm"));
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"keySignature\":\"Abm\""));
}

/// Answers typed back exactly as the session prints them must be accepted,
/// double accidentals included.
#[test]
fn test_printed_answers_parse_back_in_theoretical_keys() {
    let mut manager = DrillManager::with_rng(seeded(400));
    manager.set_key_context(KeyContext::new("Gb".parse().unwrap(), Mode::Minor));
    manager.set_module(DrillModule::Speed);

    let mut saw_double_flat = false;
    for round in 1..=200u32 {
        let question = manager.next_question();
        saw_double_flat |= question.name.ends_with("bb");
        let printed = manager.playback_notes(4).join(" ");
        let answer = parse_note_list(&printed);
        assert_eq!(answer.len(), 1, "{}", printed);
        assert_eq!(answer[0].to_string(), question.name);
        assert_eq!(manager.check_answer(&answer), Some(DrillResult::Correct));
        assert_eq!(manager.score().correct, round);
    }
    assert!(saw_double_flat);

    manager.set_key_context(KeyContext::new("Cb".parse().unwrap(), Mode::Mixolydian));
    manager.set_module(DrillModule::Sevenths);
    for _ in 0..30 {
        manager.next_question();
        let answer = parse_note_list(&manager.playback_notes(4).join(" "));
        assert_eq!(answer.len(), 4);
        assert_eq!(manager.check_answer(&answer), Some(DrillResult::Correct));
    }
}
