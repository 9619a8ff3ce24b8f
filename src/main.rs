use card_tour::game::GameError;
use card_tour::regulation::{Regulation, StageCatalog};
use card_tour::simulation::{run_game, GameResult};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "card-tour")]
#[command(about = "Card-driven grid tour rules engine and auto-player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Seed for random number generator (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Built-in stage to play
    #[arg(long, default_value = "standard")]
    stage: String,

    /// Regulation JSON file (overrides --stage)
    #[arg(short, long)]
    regulation: Option<String>,

    /// Enable verbose output for single game
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Auto-play a single game or a batch of games (default)
    Run {
        /// Number of games to simulate
        #[arg(short, long, default_value = "1000")]
        num_games: usize,

        /// Built-in stage to play
        #[arg(long, default_value = "standard")]
        stage: String,

        /// Regulation JSON file (overrides --stage)
        #[arg(short, long)]
        regulation: Option<String>,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop a game after this many moves
        #[arg(short, long, default_value = "500")]
        max_moves: u32,

        /// Enable verbose output for single game
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the built-in stages
    Stages,

    /// Print a stage's regulation as JSON
    Show {
        /// Stage id
        stage: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose || matches!(cli.command, Some(Commands::Run { verbose: true, .. }));
    init_logging(verbose);

    match cli.command {
        Some(Commands::Run {
            num_games,
            stage,
            regulation,
            seed,
            max_moves,
            verbose,
        }) => {
            let regulation = load_regulation(&stage, regulation.as_deref());
            run_simulation(&regulation, num_games, seed, max_moves, verbose);
        }
        Some(Commands::Stages) => list_stages(),
        Some(Commands::Show { stage }) => show_stage(&stage),
        None => {
            let regulation = load_regulation(&cli.stage, cli.regulation.as_deref());
            let num_games = if cli.verbose { 1 } else { 1000 };
            run_simulation(&regulation, num_games, cli.seed, 500, cli.verbose);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("✗ Failed to set tracing subscriber: {}", e);
    }
}

fn load_regulation(stage: &str, file: Option<&str>) -> Regulation {
    if let Some(path) = file {
        return match Regulation::from_file(path) {
            Ok(regulation) => {
                eprintln!("✓ Loaded regulation from {}", path);
                regulation
            }
            Err(e) => {
                eprintln!("✗ Failed to load regulation '{}': {}", path, e);
                std::process::exit(1);
            }
        };
    }

    match StageCatalog::shared().stage(stage) {
        Some(found) => found.regulation.clone(),
        None => {
            eprintln!("✗ Unknown stage '{}'. Run `card-tour stages` to list them.", stage);
            std::process::exit(1);
        }
    }
}

fn run_simulation(
    regulation: &Regulation,
    num_games: usize,
    seed: Option<u64>,
    max_moves: u32,
    verbose: bool,
) {
    let base_seed = seed.or(regulation.seed).unwrap_or_else(rand::random);

    println!("\n=== Card Tour Simulator ===\n");
    println!(
        "Board: {}x{} ({:?} deck)",
        regulation.board_size, regulation.board_size, regulation.deck_preset
    );
    println!("Games: {}", num_games);
    println!("Seed: {}", base_seed);
    println!();
    info!(num_games, base_seed, "starting simulation");

    let start = std::time::Instant::now();
    let outcomes: Vec<Result<GameResult, GameError>> = if verbose {
        (0..num_games)
            .map(|i| run_game(regulation, base_seed.wrapping_add(i as u64), max_moves, i == 0))
            .collect()
    } else {
        let progress = ProgressBar::new(num_games as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} games ({eta})") {
            progress.set_style(style);
        }
        let outcomes: Vec<Result<GameResult, GameError>> = (0..num_games)
            .into_par_iter()
            .map(|i| {
                let outcome = run_game(regulation, base_seed.wrapping_add(i as u64), max_moves, false);
                progress.inc(1);
                outcome
            })
            .collect();
        progress.finish_and_clear();
        outcomes
    };
    let elapsed = start.elapsed();

    let results: Vec<GameResult> = match outcomes.into_iter().collect() {
        Ok(results) => results,
        Err(e) => {
            eprintln!("✗ Failed to start game: {}", e);
            std::process::exit(1);
        }
    };
    print_report(&results, num_games);

    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} games/sec)",
        elapsed,
        num_games as f64 / elapsed.as_secs_f64()
    );
}

fn print_report(results: &[GameResult], num_games: usize) {
    let cleared: Vec<_> = results.iter().filter(|r| r.cleared).collect();
    let clear_rate = cleared.len() as f64 / num_games.max(1) as f64;

    let average = |values: Vec<f64>| {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };
    let avg_total = average(cleared.iter().map(|r| r.total_move_count as f64).collect());
    let avg_penalties = average(results.iter().map(|r| r.penalty_count as f64).collect());
    let avg_score = average(cleared.iter().map(|r| r.score as f64).collect());

    println!("=== Results ===\n");
    println!("Clear rate: {:.1}% ({}/{})", clear_rate * 100.0, cleared.len(), num_games);
    println!("Average total moves (cleared): {:.2}", avg_total);
    println!("Average penalties: {:.2}", avg_penalties);
    println!("Average score (cleared): {:.2}", avg_score);
    println!();

    let mut distribution: BTreeMap<u32, usize> = BTreeMap::new();
    for r in &cleared {
        *distribution.entry(r.total_move_count).or_insert(0) += 1;
    }

    println!("Total move distribution:");
    for (total, count) in distribution {
        let pct = count as f64 / num_games as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  {:3} moves: {:5.1}% {} ({})", total, pct, bar, count);
    }

    let not_cleared = results.len() - cleared.len();
    if not_cleared > 0 {
        let pct = not_cleared as f64 / num_games as f64 * 100.0;
        println!("  Not cleared: {:5.1}% ({})", pct, not_cleared);
    }
}

fn list_stages() {
    println!("\n=== Built-in Stages ===\n");
    for stage in StageCatalog::shared().stages() {
        let regulation = &stage.regulation;
        println!(
            "  {:14} {:26} {}x{}  hand {}  {:?}",
            stage.id,
            stage.title,
            regulation.board_size,
            regulation.board_size,
            regulation.hand_size,
            regulation.deck_preset
        );
    }
}

fn show_stage(id: &str) {
    let Some(stage) = StageCatalog::shared().stage(id) else {
        eprintln!("✗ Unknown stage '{}'", id);
        std::process::exit(1);
    };
    match serde_json::to_string_pretty(&stage.regulation) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("✗ Failed to serialize stage '{}': {}", id, e);
            std::process::exit(1);
        }
    }
}
