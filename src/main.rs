mod cli;

use clap::Parser;
use cli::{ChordsCommand, Cli, Commands, DrillCommand, KeyArgs, PatternCommand};
use env_logger::Env;
use log::info;
use pianodrill::note::parse_note_list;
use pianodrill::{
    generate_pattern, random, ChordType, DrillManager, DrillModule, DrillResult, KeySignature,
    SessionConfig,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scale(args) => print_scale(&args),
        Commands::Chords(cmd) => print_chords(&cmd),
        Commands::Pattern(cmd) => print_pattern(&cmd),
        Commands::Signature(args) => print_signature(&args),
        Commands::Drill(cmd) => run_drill(&cmd),
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_scale(args: &KeyArgs) {
    let context = args.context();
    let notes = context.scale_notes();
    if notes.is_empty() {
        eprintln!("No scale for {}", context);
        process::exit(1);
    }
    println!("{}: {}", context, join(&notes));
}

fn print_chords(cmd: &ChordsCommand) {
    let context = cmd.key.context();
    let chord_type = if cmd.sevenths {
        ChordType::Sevenths
    } else {
        ChordType::Triads
    };
    for chord in pianodrill::chords::chords_for_context(&context, chord_type) {
        println!("{:<28} {}", chord.name, join(&chord.notes));
    }
}

fn print_pattern(cmd: &PatternCommand) {
    let context = cmd.key.context();
    let mut rng = match cmd.seed {
        Some(seed) => random::seeded(seed),
        None => random::from_entropy(),
    };
    let pattern = generate_pattern(&context, cmd.difficulty, &mut *rng);
    if pattern.notes.is_empty() {
        eprintln!("No pattern for {}", context);
        process::exit(1);
    }
    let keys: Vec<String> = pattern
        .notes
        .iter()
        .map(|note| note.vexflow(cmd.base_octave))
        .collect();
    println!("{}", pattern.name);
    println!("{}", keys.join(" "));
}

fn print_signature(args: &KeyArgs) {
    let context = args.context();
    match KeySignature::for_context(&context) {
        Some(signature) => println!(
            "{}: {} ({} fifths)",
            context,
            signature.name(),
            signature.fifths
        ),
        None => {
            eprintln!("{} has no standard key signature", context);
            process::exit(1);
        }
    }
}

fn load_session(cmd: &DrillCommand) -> SessionConfig {
    let mut config = match &cmd.config {
        Some(path) => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading file '{}': {}", path.display(), e);
                    process::exit(1);
                }
            };
            match SessionConfig::from_yaml(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error in '{}': {}", path.display(), e);
                    process::exit(1);
                }
            }
        }
        None => SessionConfig::default(),
    };

    if let Some(key) = cmd.key {
        config.key = key;
    }
    if let Some(mode) = cmd.mode {
        config.key.mode = mode;
    }
    if let Some(module) = cmd.module {
        config.module = module;
    }
    if cmd.inversions {
        config.options.inversions = true;
    }
    if let Some(range) = cmd.range {
        config.options.range = range;
    }
    if cmd.difficulty.is_some() {
        config.options.difficulty = cmd.difficulty;
    }
    if cmd.seed.is_some() {
        config.seed = cmd.seed;
    }
    if let Some(base_octave) = cmd.base_octave {
        config.base_octave = base_octave;
    }
    config
}

/// Speed and melody questions are read from the staff; the others are
/// named and played.
fn shows_staff(module: DrillModule) -> bool {
    matches!(module, DrillModule::Speed | DrillModule::Melody)
}

fn print_question(manager: &DrillManager, name: &str, base_octave: i8) {
    println!();
    println!("{}", name);
    if shows_staff(manager.module()) {
        let request = manager.render_request(base_octave);
        let signature = request.key_signature.unwrap_or_else(|| "C".to_string());
        println!("  [{}] {}", signature, request.notes.join(" "));
    }
}

fn run_drill(cmd: &DrillCommand) {
    let config = load_session(cmd);
    let base_octave = config.base_octave;
    let mut manager = config.build_manager();
    info!("Starting {} drill in {}", config.module, config.key);

    println!(
        "{} drill in {}. Enter notes like `C E G`; `?` plays the answer, `q` quits.",
        config.module, config.key
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'questions: loop {
        let question = manager.next_question();
        if question.is_invalid() {
            eprintln!("No drill material for {}", config.key);
            process::exit(1);
        }
        print_question(&manager, &question.name, base_octave);

        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    eprintln!("Error reading input: {}", e);
                    process::exit(1);
                }
                None => break 'questions,
            };
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                break 'questions;
            }
            if trimmed == "?" {
                println!("  {}", manager.playback_notes(base_octave).join(" "));
                continue;
            }

            let input = parse_note_list(trimmed);
            match manager.check_answer(&input) {
                Some(DrillResult::Correct) => {
                    println!("Correct! Score: {}", manager.score());
                    continue 'questions;
                }
                Some(DrillResult::Continue) => match manager.current_index() {
                    Some(index) => println!(
                        "  {} of {}",
                        index,
                        manager.playback_notes(base_octave).len()
                    ),
                    None => println!("  keep going"),
                },
                Some(DrillResult::Incorrect) => println!("  not quite, try again"),
                None => {}
            }
        }
    }

    println!();
    println!("Final score: {}", manager.score());
}
