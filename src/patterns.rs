//! # Pattern Generator
//!
//! Produces melodic sight-reading sequences for the melody drill.
//!
//! ## Families (diatonic modes)
//! One family is drawn per pattern, weighted:
//!
//! | Family | Weight | Shape |
//! |---|---|---|
//! | Melody | 35 | random walk: steps 60%, skips 25%, leaps 15% |
//! | Scale | 20 | stepwise run up or down |
//! | Arpeggio | 20 | 1-3-5-8 up and back (two octaves for long patterns) |
//! | Broken interval | 15 | 3rds, 4ths or 5ths |
//! | Neighbor tones | 10 | `0 +1 0 -1` motif climbing one degree per bar |
//!
//! Every family works in scale steps, so every note is a member of the
//! scale. Steps become notes through [`Scale::note_at`].
//!
//! ## Chromatic mode
//! The 12-note ladder uses a semitone generator instead: chromatic runs,
//! interval chains, semitone-stack arpeggios and stepwise figures.
//!
//! ## Related Modules
//! - `keys` - the scale ladder
//! - `drills::melody` - consumes the patterns

use crate::error::DrillError;
use crate::keys::{KeyContext, Mode, Scale};
use crate::note::VoicedNote;
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pattern name used when the key context has no scale.
pub const INVALID_PATTERN: &str = "Invalid Key/Mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Number of notes in a pattern.
    pub fn length(self) -> usize {
        match self {
            Difficulty::Beginner => 5,
            Difficulty::Intermediate => 8,
            Difficulty::Advanced => 16,
        }
    }

    /// Adaptive difficulty from the number of correct answers so far.
    pub fn for_score(correct: u32) -> Self {
        if correct > 20 {
            Difficulty::Advanced
        } else if correct > 10 {
            Difficulty::Intermediate
        } else {
            Difficulty::Beginner
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(DrillError::InvalidOption {
                option: "difficulty".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternKind {
    Melody,
    Scale,
    Arpeggio,
    BrokenInterval,
    NeighborTones,
}

const FAMILY_WEIGHTS: [(PatternKind, u32); 5] = [
    (PatternKind::Melody, 35),
    (PatternKind::Scale, 20),
    (PatternKind::Arpeggio, 20),
    (PatternKind::BrokenInterval, 15),
    (PatternKind::NeighborTones, 10),
];

/// A generated note sequence with a display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MelodicPattern {
    pub name: String,
    pub kind: PatternKind,
    pub notes: Vec<VoicedNote>,
}

impl MelodicPattern {
    fn invalid() -> Self {
        Self {
            name: INVALID_PATTERN.to_string(),
            kind: PatternKind::Melody,
            notes: Vec::new(),
        }
    }
}

/// Generate a pattern of `difficulty.length()` notes in `ctx`.
pub fn generate_pattern(
    ctx: &KeyContext,
    difficulty: Difficulty,
    rng: &mut dyn RngCore,
) -> MelodicPattern {
    let scale = ctx.scale();
    if scale.is_empty() {
        return MelodicPattern::invalid();
    }

    let length = difficulty.length();
    let family = pick_family(rng);
    let (kind, steps, label) = if ctx.mode == Mode::Chromatic {
        chromatic_steps(family, length, rng)
    } else {
        diatonic_steps(family, length, rng)
    };

    let pattern = MelodicPattern {
        name: format!("{} {}", ctx, label),
        kind,
        notes: place(&scale, &steps),
    };
    debug!("Generated pattern '{}' ({} notes)", pattern.name, pattern.notes.len());
    pattern
}

fn place(scale: &Scale, steps: &[i32]) -> Vec<VoicedNote> {
    steps.iter().filter_map(|&step| scale.note_at(step)).collect()
}

fn pick_family(rng: &mut dyn RngCore) -> PatternKind {
    match WeightedIndex::new(FAMILY_WEIGHTS.iter().map(|(_, weight)| *weight)) {
        Ok(dist) => FAMILY_WEIGHTS[dist.sample(rng)].0,
        Err(_) => PatternKind::Melody,
    }
}

const WALK_LOW: i32 = -2;
const WALK_HIGH: i32 = 9;

fn diatonic_steps(
    kind: PatternKind,
    length: usize,
    rng: &mut dyn RngCore,
) -> (PatternKind, Vec<i32>, String) {
    match kind {
        PatternKind::Melody => (kind, random_walk(length, rng), "Melody".to_string()),
        PatternKind::Scale => {
            let ascending = rng.gen_bool(0.5);
            let mut steps: Vec<i32> = (0..length as i32).collect();
            if !ascending {
                steps.reverse();
            }
            (kind, steps, format!("Scale {}", direction_label(ascending)))
        }
        PatternKind::Arpeggio => {
            let ascending = rng.gen_bool(0.5);
            let mut ladder: Vec<i32> = if length > 8 {
                vec![0, 2, 4, 7, 9, 11, 14]
            } else {
                vec![0, 2, 4, 7]
            };
            if !ascending {
                ladder.reverse();
            }
            (
                kind,
                bounce(&ladder, length),
                format!("Arpeggio {}", direction_label(ascending)),
            )
        }
        PatternKind::BrokenInterval => {
            let distance = *[2, 3, 4].choose(rng).unwrap_or(&2);
            let steps = (0..length as i32)
                .map(|k| k / 2 + if k % 2 == 1 { distance } else { 0 })
                .collect();
            let label = match distance {
                2 => "Broken 3rds",
                3 => "Broken 4ths",
                _ => "Broken 5ths",
            };
            (kind, steps, label.to_string())
        }
        PatternKind::NeighborTones => {
            const MOTIF: [i32; 4] = [0, 1, 0, -1];
            let steps = (0..length).map(|k| (k / 4) as i32 + MOTIF[k % 4]).collect();
            (kind, steps, "Neighbor Tones".to_string())
        }
    }
}

fn direction_label(ascending: bool) -> &'static str {
    if ascending {
        "Ascending"
    } else {
        "Descending"
    }
}

/// Random walk over scale degrees, reflected inside `WALK_LOW..=WALK_HIGH`.
fn random_walk(length: usize, rng: &mut dyn RngCore) -> Vec<i32> {
    let mut steps = Vec::with_capacity(length);
    if length == 0 {
        return steps;
    }

    let mut position = *[0, 2, 4].choose(rng).unwrap_or(&0);
    steps.push(position);

    while steps.len() < length {
        let roll: f64 = rng.gen();
        let size = if roll < 0.60 {
            1
        } else if roll < 0.85 {
            2
        } else {
            rng.gen_range(3..=4)
        };
        let direction = if rng.gen_bool(0.5) { 1 } else { -1 };

        let mut next = position + direction * size;
        if !(WALK_LOW..=WALK_HIGH).contains(&next) {
            next = position - direction * size;
        }
        position = next.clamp(WALK_LOW, WALK_HIGH);
        steps.push(position);
    }

    steps
}

/// Walk `ladder` up and back down without repeating the turning points,
/// until `length` entries are produced.
fn bounce(ladder: &[i32], length: usize) -> Vec<i32> {
    if ladder.len() < 2 {
        return ladder.iter().copied().cycle().take(length).collect();
    }
    let mut cycle: Vec<i32> = ladder.to_vec();
    cycle.extend(ladder[1..ladder.len() - 1].iter().rev());
    cycle.into_iter().cycle().take(length).collect()
}

const CHROMATIC_ARPEGGIOS: [(&str, [i32; 4]); 4] = [
    ("Major Arpeggio", [0, 4, 7, 12]),
    ("Minor Arpeggio", [0, 3, 7, 12]),
    ("Major 7th Arpeggio", [0, 4, 7, 11]),
    ("Minor 7th Arpeggio", [0, 3, 7, 10]),
];

const CHROMATIC_INTERVALS: [(&str, i32); 4] = [
    ("Minor 3rds", 3),
    ("Major 3rds", 4),
    ("Perfect 4ths", 5),
    ("Perfect 5ths", 7),
];

const STEPWISE_FIGURES: [&[i32]; 4] = [
    &[0, 2, 4, 2, 0],
    &[0, 2, 4, 5, 7],
    &[7, 5, 4, 2, 0],
    &[0, 2, 0, 4, 2, 0],
];

/// Semitone generator for the chromatic ladder. The Melody family maps to a
/// chromatic run.
fn chromatic_steps(
    kind: PatternKind,
    length: usize,
    rng: &mut dyn RngCore,
) -> (PatternKind, Vec<i32>, String) {
    match kind {
        PatternKind::Melody | PatternKind::Scale => {
            let ascending = rng.gen_bool(0.5);
            let mut steps: Vec<i32> = (0..length as i32).collect();
            if !ascending {
                steps.reverse();
            }
            (
                PatternKind::Scale,
                steps,
                format!("Run {}", direction_label(ascending)),
            )
        }
        PatternKind::Arpeggio => {
            let (label, stack) = CHROMATIC_ARPEGGIOS[rng.gen_range(0..CHROMATIC_ARPEGGIOS.len())];
            (kind, bounce(&stack, length), label.to_string())
        }
        PatternKind::BrokenInterval => {
            let (label, interval) =
                CHROMATIC_INTERVALS[rng.gen_range(0..CHROMATIC_INTERVALS.len())];
            let steps = (0..length as i32).map(|k| (k * interval) % 24).collect();
            (kind, steps, label.to_string())
        }
        PatternKind::NeighborTones => {
            let figure = STEPWISE_FIGURES[rng.gen_range(0..STEPWISE_FIGURES.len())];
            let steps = figure.iter().copied().cycle().take(length).collect();
            (kind, steps, "Stepwise Figure".to_string())
        }
    }
}
