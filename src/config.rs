//! Session configuration loaded from YAML.
//!
//! ```yaml
//! key: Eb
//! mode: harmonic minor
//! module: sevenths
//! inversions: true
//! range: wide
//! difficulty: intermediate
//! base-octave: 4
//! seed: 42
//! ```
//!
//! Every field is optional. `key` also accepts the combined forms `Ebm` and
//! `Eb Harmonic Minor`; an explicit `mode` wins over the combined form.

use crate::drills::{DrillOptions, Range};
use crate::error::DrillError;
use crate::keys::{KeyContext, Mode};
use crate::manager::{DrillManager, DrillModule};
use crate::patterns::Difficulty;
use crate::random;
use serde::Deserialize;

/// Raw config for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawSessionConfig {
    key: Option<String>,
    mode: Option<String>,
    module: Option<String>,
    inversions: Option<bool>,
    range: Option<String>,
    difficulty: Option<String>,
    base_octave: Option<i8>,
    seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub key: KeyContext,
    pub module: DrillModule,
    pub options: DrillOptions,
    pub base_octave: i8,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key: KeyContext::default(),
            module: DrillModule::default(),
            options: DrillOptions::default(),
            base_octave: 4,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_yaml(content: &str) -> Result<Self, DrillError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawSessionConfig =
            serde_yaml::from_str(content).map_err(|e| DrillError::Config(e.to_string()))?;

        let mut key = if let Some(k) = &raw.key {
            k.parse::<KeyContext>()?
        } else {
            KeyContext::default()
        };
        if let Some(m) = &raw.mode {
            key.mode = m.parse::<Mode>()?;
        }

        let module = if let Some(m) = &raw.module {
            m.parse::<DrillModule>()?
        } else {
            DrillModule::default()
        };

        let range = if let Some(r) = &raw.range {
            r.parse::<Range>()?
        } else {
            Range::default()
        };

        let difficulty = match &raw.difficulty {
            Some(d) => Some(d.parse::<Difficulty>()?),
            None => None,
        };

        let base_octave = raw.base_octave.unwrap_or(4);
        if !(0..=8).contains(&base_octave) {
            return Err(DrillError::InvalidOption {
                option: "base-octave".to_string(),
                value: base_octave.to_string(),
            });
        }

        Ok(Self {
            key,
            module,
            options: DrillOptions {
                inversions: raw.inversions.unwrap_or(false),
                range,
                difficulty,
            },
            base_octave,
            seed: raw.seed,
        })
    }

    /// Manager with this session's module, key and options applied.
    pub fn build_manager(&self) -> DrillManager {
        let rng = match self.seed {
            Some(seed) => random::seeded(seed),
            None => random::from_entropy(),
        };
        let mut manager = DrillManager::with_rng(rng);
        manager.set_key_context(self.key);
        manager.set_options(self.options);
        manager.set_module(self.module);
        manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteName;

    #[test]
    fn test_full_config() {
        let yaml = r#"
key: Eb
mode: harmonic minor
module: sevenths
inversions: true
range: wide
difficulty: intermediate
base-octave: 3
seed: 42
"#;
        let config = SessionConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.key.root, "Eb".parse::<NoteName>().unwrap());
        assert_eq!(config.key.mode, Mode::HarmonicMinor);
        assert_eq!(config.module, DrillModule::Sevenths);
        assert!(config.options.inversions);
        assert_eq!(config.options.range, Range::Wide);
        assert_eq!(config.options.difficulty, Some(Difficulty::Intermediate));
        assert_eq!(config.base_octave, 3);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(SessionConfig::from_yaml("").unwrap(), SessionConfig::default());
        let config = SessionConfig::from_yaml("key: Am\n").unwrap();
        assert_eq!(config.key.mode, Mode::Minor);
        assert_eq!(config.module, DrillModule::Triads);
        assert_eq!(config.base_octave, 4);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            SessionConfig::from_yaml("key: H\n"),
            Err(DrillError::UnknownKey(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml("module: rhythm\n"),
            Err(DrillError::UnknownModule(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml("range: huge\n"),
            Err(DrillError::InvalidOption { .. })
        ));
        assert!(matches!(
            SessionConfig::from_yaml("base-octave: 12\n"),
            Err(DrillError::InvalidOption { .. })
        ));
        assert!(matches!(
            SessionConfig::from_yaml("tempo: 120\n"),
            Err(DrillError::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_yaml("key: [C\n"),
            Err(DrillError::Config(_))
        ));
    }

    #[test]
    fn test_build_manager() {
        let config = SessionConfig::from_yaml("key: Gb\nmodule: speed\nseed: 7\n").unwrap();
        let mut manager = config.build_manager();
        assert_eq!(manager.module(), DrillModule::Speed);
        assert_eq!(manager.key_context(), config.key);
        let question = manager.next_question();
        let name: NoteName = question.name.parse().unwrap();
        assert!(config.key.scale_notes().contains(&name));
    }
}
