//! # Drill Manager
//!
//! Single facade over whichever drill is active. The caller (UI, CLI, wasm
//! binding) never touches a concrete strategy: it picks a [`DrillModule`],
//! sets a key context and options, and forwards questions and answers.
//!
//! Switching modules builds a fresh strategy, so its score starts at zero,
//! and re-applies the cached key context and options.

use crate::chords::ChordType;
use crate::drills::{
    ChordDrill, DrillOptions, DrillQuestion, DrillResult, DrillStrategy, IntervalDrill,
    MelodyDrill, Score, SpeedDrill,
};
use crate::error::DrillError;
use crate::keys::{contextual_spelling, KeyContext, KeySignature};
use crate::notation::{render_request, RenderRequest};
use crate::note::NoteName;
use crate::random::{self, DrillRng};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillModule {
    #[default]
    Triads,
    Sevenths,
    Speed,
    Interval,
    Melody,
}

impl DrillModule {
    pub const ALL: [DrillModule; 5] = [
        DrillModule::Triads,
        DrillModule::Sevenths,
        DrillModule::Speed,
        DrillModule::Interval,
        DrillModule::Melody,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrillModule::Triads => "triads",
            DrillModule::Sevenths => "sevenths",
            DrillModule::Speed => "speed",
            DrillModule::Interval => "interval",
            DrillModule::Melody => "melody",
        }
    }
}

impl fmt::Display for DrillModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DrillModule {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triads" | "triad" | "chords" => Ok(DrillModule::Triads),
            "sevenths" | "seventh" | "7ths" => Ok(DrillModule::Sevenths),
            "speed" | "notes" => Ok(DrillModule::Speed),
            "interval" | "intervals" => Ok(DrillModule::Interval),
            "melody" | "sightreading" | "sight-reading" => Ok(DrillModule::Melody),
            _ => Err(DrillError::UnknownModule(s.to_string())),
        }
    }
}

pub struct DrillManager {
    module: DrillModule,
    key: KeyContext,
    options: DrillOptions,
    strategy: Box<dyn DrillStrategy>,
    rng: DrillRng,
}

impl DrillManager {
    pub fn new() -> Self {
        Self::with_rng(random::from_entropy())
    }

    /// Manager whose strategies draw from generators forked off `rng`.
    pub fn with_rng(mut rng: DrillRng) -> Self {
        let module = DrillModule::default();
        let key = KeyContext::default();
        let options = DrillOptions::default();
        let strategy = build_strategy(module, key, options, random::fork(&mut *rng));
        Self {
            module,
            key,
            options,
            strategy,
            rng,
        }
    }

    pub fn module(&self) -> DrillModule {
        self.module
    }

    /// Activate `module` with a fresh strategy (score reset).
    pub fn set_module(&mut self, module: DrillModule) {
        info!("Switching drill module to {}", module);
        self.module = module;
        let rng = random::fork(&mut *self.rng);
        self.strategy = build_strategy(module, self.key, self.options, rng);
    }

    pub fn key_context(&self) -> KeyContext {
        self.key
    }

    pub fn set_key_context(&mut self, key: KeyContext) {
        self.key = key;
        self.strategy.set_key_context(key);
    }

    pub fn options(&self) -> DrillOptions {
        self.options
    }

    pub fn set_options(&mut self, options: DrillOptions) {
        self.options = options;
        self.strategy.set_options(options);
    }

    pub fn is_sequential(&self) -> bool {
        self.strategy.is_sequential()
    }

    pub fn next_question(&mut self) -> DrillQuestion {
        self.strategy.next_question()
    }

    pub fn check_answer(&mut self, input: &[NoteName]) -> Option<DrillResult> {
        self.strategy.check_answer(input)
    }

    pub fn score(&self) -> Score {
        self.strategy.score()
    }

    pub fn reset_score(&mut self) {
        self.strategy.reset_score();
    }

    pub fn vexflow_notes(&self, base_octave: i8) -> Vec<String> {
        self.strategy.vexflow_notes(base_octave)
    }

    pub fn playback_notes(&self, base_octave: i8) -> Vec<String> {
        self.strategy.playback_notes(base_octave)
    }

    pub fn last_correct_note(&self, base_octave: i8) -> Option<String> {
        self.strategy.last_correct_note(base_octave)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.strategy.current_index()
    }

    pub fn key_signature(&self) -> Option<KeySignature> {
        self.key.key_signature()
    }

    /// Everything the notation renderer needs for the current question.
    pub fn render_request(&self, base_octave: i8) -> RenderRequest {
        render_request(
            self.strategy.target_notes(),
            base_octave,
            self.strategy.is_sequential(),
            self.strategy.current_index(),
            self.key_signature(),
        )
    }

    /// Respell pressed keys to the current key's spelling (e.g. `B` as `Cb`
    /// in Gb Major), for display.
    pub fn spell_input(&self, input: &[NoteName]) -> Vec<NoteName> {
        input
            .iter()
            .map(|note| contextual_spelling(*note, &self.key))
            .collect()
    }
}

impl Default for DrillManager {
    fn default() -> Self {
        Self::new()
    }
}

fn build_strategy(
    module: DrillModule,
    key: KeyContext,
    options: DrillOptions,
    rng: DrillRng,
) -> Box<dyn DrillStrategy> {
    let mut strategy: Box<dyn DrillStrategy> = match module {
        DrillModule::Triads => Box::new(ChordDrill::with_rng(ChordType::Triads, rng)),
        DrillModule::Sevenths => Box::new(ChordDrill::with_rng(ChordType::Sevenths, rng)),
        DrillModule::Speed => Box::new(SpeedDrill::with_rng(rng)),
        DrillModule::Interval => Box::new(IntervalDrill::with_rng(rng)),
        DrillModule::Melody => Box::new(MelodyDrill::with_rng(rng)),
    };
    strategy.set_key_context(key);
    strategy.set_options(options);
    strategy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drills::Range;
    use crate::keys::Mode;
    use crate::note::parse_note_list;

    fn manager() -> DrillManager {
        DrillManager::with_rng(random::seeded(1))
    }

    #[test]
    fn test_module_parse() {
        for module in DrillModule::ALL {
            assert_eq!(module.to_string().parse::<DrillModule>().unwrap(), module);
        }
        assert!(matches!("rhythm".parse::<DrillModule>(), Err(DrillError::UnknownModule(_))));
    }

    #[test]
    fn test_switching_module_resets_score() {
        let mut manager = manager();
        manager.set_module(DrillModule::Speed);
        manager.next_question();
        let answer = parse_note_list(&manager.playback_notes(4)[0]);
        assert_eq!(manager.check_answer(&answer), Some(DrillResult::Correct));
        assert_eq!(manager.score().correct, 1);

        manager.set_module(DrillModule::Interval);
        assert_eq!(manager.score(), Score::default());
        assert!(manager.is_sequential());
    }

    #[test]
    fn test_options_survive_module_switch() {
        let mut manager = manager();
        manager.set_options(DrillOptions {
            inversions: false,
            range: Range::High,
            difficulty: None,
        });
        manager.set_module(DrillModule::Speed);
        manager.next_question();
        assert!(manager.vexflow_notes(4)[0].ends_with("/5"));
    }

    #[test]
    fn test_key_context_is_forwarded() {
        let mut manager = manager();
        manager.set_key_context("Gb".parse().unwrap());
        manager.set_module(DrillModule::Speed);
        let scale = manager.key_context().scale_notes();
        for _ in 0..20 {
            let question = manager.next_question();
            let name: NoteName = question.name.parse().unwrap();
            assert!(scale.contains(&name));
        }
        assert_eq!(manager.key_signature().unwrap().name(), "Gb");
    }

    #[test]
    fn test_spell_input() {
        let mut manager = manager();
        manager.set_key_context(KeyContext::new("Gb".parse().unwrap(), Mode::Major));
        let spelled = manager.spell_input(&parse_note_list("B F# G"));
        let names: Vec<String> = spelled.iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["Cb", "Gb", "G"]);
    }
}
