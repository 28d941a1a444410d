//! Command line interface for the pianodrill engine.

use clap::{Args, Parser, Subcommand};
use pianodrill::{Difficulty, DrillModule, KeyContext, Mode, Range};
use std::path::PathBuf;

/// Piano theory drills in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the spelled scale of a key
    Scale(KeyArgs),

    /// Print the diatonic chords of a key
    Chords(ChordsCommand),

    /// Generate a melodic sight-reading pattern
    Pattern(PatternCommand),

    /// Print the key signature of a key
    Signature(KeyArgs),

    /// Run an interactive drill session on stdin
    Drill(DrillCommand),
}

/// Key selection shared by the subcommands
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Key root, optionally with a mode: "Eb", "Ebm", "Eb Harmonic Minor"
    pub key: KeyContext,

    /// Mode (overrides a mode given with the key)
    #[arg(short, long)]
    pub mode: Option<Mode>,
}

impl KeyArgs {
    pub fn context(&self) -> KeyContext {
        match self.mode {
            Some(mode) => KeyContext::new(self.key.root, mode),
            None => self.key,
        }
    }
}

#[derive(Args, Debug)]
pub struct ChordsCommand {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Build seventh chords instead of triads
    #[arg(long)]
    pub sevenths: bool,
}

#[derive(Args, Debug)]
pub struct PatternCommand {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Pattern length (beginner, intermediate, advanced)
    #[arg(short, long, default_value = "beginner")]
    pub difficulty: Difficulty,

    /// Seed for a reproducible pattern
    #[arg(long)]
    pub seed: Option<u64>,

    /// Octave number of the key's root (0-8)
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(i8).range(0..=8))]
    pub base_octave: i8,
}

#[derive(Args, Debug)]
pub struct DrillCommand {
    /// YAML session config; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Key root, optionally with a mode
    #[arg(short, long)]
    pub key: Option<KeyContext>,

    /// Mode
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// Drill module (triads, sevenths, speed, interval, melody)
    #[arg(short = 'M', long)]
    pub module: Option<DrillModule>,

    /// Ask chords in random inversions
    #[arg(short, long)]
    pub inversions: bool,

    /// Register (default, low, high, wide)
    #[arg(short, long)]
    pub range: Option<Range>,

    /// Fixed melody difficulty
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Seed for reproducible questions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Octave number of the key's root (0-8)
    #[arg(short, long, value_parser = clap::value_parser!(i8).range(0..=8))]
    pub base_octave: Option<i8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_octave_range() {
        let cli = Cli::try_parse_from(["pianodrill", "pattern", "Eb", "-b", "8"]).unwrap();
        match cli.command {
            Commands::Pattern(cmd) => assert_eq!(cmd.base_octave, 8),
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["pianodrill", "pattern", "Eb", "-b", "127"]).is_err());
        assert!(Cli::try_parse_from(["pianodrill", "drill", "--base-octave", "-1"]).is_err());
        assert!(Cli::try_parse_from(["pianodrill", "drill", "--base-octave", "9"]).is_err());
    }
}
