use clap::Parser;
use rayon::prelude::*;

use corewar::mars::{Mars, MarsConfig};
use corewar::tactics;
use corewar::warrior::Warrior;
use corewar::warriors;

#[derive(Parser)]
#[command(name = "corewar", about = "Core War: redcode warriors battling in a shared circular core")]
struct Cli {
    /// First combatant (imp, dwarf, stone, scanner).
    warrior_a: String,

    /// Second combatant.
    warrior_b: String,

    /// Random seed for warrior placement.
    #[arg(long)]
    seed: u64,

    /// Number of battles to run; each gets its own derived seed.
    #[arg(long, default_value_t = 1)]
    rounds: usize,

    /// Number of cells in the core.
    #[arg(long, default_value_t = 8000)]
    core_size: usize,

    /// Cycle budget before a battle is called a draw.
    #[arg(long, default_value_t = 80000)]
    max_cycles: usize,
}

fn lookup(name: &str) -> Option<fn() -> Warrior> {
    match name {
        "imp" => Some(warriors::imp),
        "dwarf" => Some(warriors::dwarf),
        "stone" => Some(warriors::stone),
        "scanner" => Some(warriors::scanner),
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    let (make_a, make_b) = match (lookup(&cli.warrior_a), lookup(&cli.warrior_b)) {
        (Some(a), Some(b)) => (a, b),
        (None, _) => {
            eprintln!(
                "Unknown warrior: {}. Available: imp, dwarf, stone, scanner",
                cli.warrior_a
            );
            std::process::exit(1);
        }
        (_, None) => {
            eprintln!(
                "Unknown warrior: {}. Available: imp, dwarf, stone, scanner",
                cli.warrior_b
            );
            std::process::exit(1);
        }
    };

    for warrior in [make_a(), make_b()] {
        let analysis = tactics::analyze(&warrior.program);
        eprintln!("{warrior} ({:?})", analysis.strategy);
    }

    run_tournament(&cli, make_a, make_b);
}

/// Outcome of one battle: winner's load index (None for a draw) plus the
/// cycle count it took.
struct RoundResult {
    winner: Option<usize>,
    cycles: usize,
}

fn run_round(cli: &Cli, make_a: fn() -> Warrior, make_b: fn() -> Warrior, seed: u64) -> RoundResult {
    let config = MarsConfig {
        core_size: cli.core_size,
        max_cycles: cli.max_cycles,
        ..Default::default()
    };
    let mut mars = Mars::new(config, seed);
    for warrior in [make_a(), make_b()] {
        if let Err(error) = mars.load_warrior(warrior, None) {
            eprintln!("Failed to place warrior: {error}");
            std::process::exit(1);
        }
    }
    mars.run_battle();
    RoundResult {
        winner: mars.winner_index(),
        cycles: mars.cycle(),
    }
}

fn run_tournament(cli: &Cli, make_a: fn() -> Warrior, make_b: fn() -> Warrior) {
    // Battles share no state, so rounds fan out freely.
    let results: Vec<RoundResult> = (0..cli.rounds)
        .into_par_iter()
        .map(|round| run_round(cli, make_a, make_b, cli.seed.wrapping_add(round as u64)))
        .collect();

    let names = [cli.warrior_a.as_str(), cli.warrior_b.as_str()];
    println!("round,winner,cycles");
    let mut wins = [0usize; 2];
    let mut draws = 0usize;
    for (round, result) in results.iter().enumerate() {
        match result.winner {
            Some(index) => {
                wins[index] += 1;
                println!("{round},{},{}", names[index], result.cycles);
            }
            None => {
                draws += 1;
                println!("{round},draw,{}", result.cycles);
            }
        }
    }

    eprintln!("Results over {} round(s):", cli.rounds);
    eprintln!("  {}: {} win(s)", names[0], wins[0]);
    eprintln!("  {}: {} win(s)", names[1], wins[1]);
    eprintln!("  draws: {draws}");
}
