//! StatParty CLI

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use statparty::ingest::{self, TrackingPrefs};
use statparty::replay::{self, Stage};
use statparty::sink::LogSink;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage();
        process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "scan" => {
            if args.len() < 3 {
                eprintln!("Usage: statparty scan <replay-dir> [--spectations] [--no-matches]");
                process::exit(1);
            }

            let replay_dir = PathBuf::from(&args[2]);
            let prefs = TrackingPrefs {
                matches: !args.iter().any(|a| a == "--no-matches"),
                spectations: args.iter().any(|a| a == "--spectations"),
            };

            if !replay_dir.is_dir() {
                // A missing replay directory ends the run cleanly
                eprintln!("Replay directory not found: {}", replay_dir.display());
                process::exit(0);
            }

            if let Err(e) = run_scan(&replay_dir, prefs) {
                eprintln!("Error: {e:#}");
                process::exit(1);
            }
        }
        "show" => {
            if args.len() < 3 {
                eprintln!("Usage: statparty show <file.replay>");
                process::exit(1);
            }

            if let Err(e) = show_replay(Path::new(&args[2])) {
                eprintln!("Error: {e:#}");
                process::exit(1);
            }
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!("Run 'statparty' for usage information.");
            process::exit(1);
        }
    }
}

fn usage() {
    eprintln!("StatParty v{}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("Usage: statparty <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  scan <replay-dir>    Decode replays modified since the last run");
    eprintln!("      --spectations    Track spectated matches (first run only)");
    eprintln!("      --no-matches     Skip standard matches (first run only)");
    eprintln!("  show <file>          Decode a single replay and print its fields");
}

fn run_scan(replay_dir: &Path, prefs: TrackingPrefs) -> anyhow::Result<()> {
    let mut sink = LogSink;
    let stats = ingest::run(replay_dir, prefs, &mut sink)
        .with_context(|| format!("scanning {}", replay_dir.display()))?;

    println!("Decoded {} replays, skipped {}.", stats.decoded, stats.skipped);
    Ok(())
}

fn show_replay(path: &Path) -> anyhow::Result<()> {
    let record =
        replay::decode(path).with_context(|| format!("decoding {}", path.display()))?;

    println!("Spy:      {}", record.spy_name);
    println!("Sniper:   {}", record.sniper_name);
    println!("Map:      {}", record.map);
    println!("Result:   {}", record.result);
    println!("Start:    {:?}", record.start_time);
    println!("Duration: {}s", record.duration_seconds);
    for stage in Stage::ALL {
        let missions: Vec<_> = record
            .missions
            .stage(stage)
            .iter()
            .map(|m| m.name())
            .collect();
        println!("{stage:>9}: {}", missions.join(", "));
    }
    Ok(())
}
