//! snapcall CLI - Command-line interface for the hand rank tables
//!
//! Generates, saves, loads and queries rank tables, and measures lookup throughput.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use snapcall_engine::evaluator::{benchmark_throughput, random_hands};
use snapcall_engine::{best_strength, mask_of, parse_cards, Evaluator, EvaluatorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log build progress and debug details
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Generate a rank table and write it to disk", alias = "gen")]
    Generate {
        #[arg(long, short)]
        out: PathBuf,
        /// Also build the 6-card table
        #[arg(long)]
        six: bool,
        /// Also build the 7-card table (implies --six; several GB of memory)
        #[arg(long)]
        seven: bool,
        #[arg(long, default_value_t = snapcall_engine::config::DEFAULT_LOAD_FACTOR)]
        load_factor: f64,
    },
    #[command(about = "Rank a 5, 6 or 7 card hand", alias = "eval")]
    Evaluate {
        /// Table file; a 5-card table is generated when omitted
        #[arg(long, short)]
        table: Option<PathBuf>,
        #[arg(required = true)]
        cards: Vec<String>,
    },
    #[command(about = "Show the category and kickers of the best 5-card hand")]
    Classify {
        #[arg(required = true)]
        cards: Vec<String>,
    },
    #[command(about = "Measure lookup throughput")]
    Bench {
        #[arg(long, short)]
        table: Option<PathBuf>,
        /// Cards per sampled hand
        #[arg(long, default_value_t = 5)]
        cards: u32,
        #[arg(default_value_t = 1_000_000)]
        samples: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Command::Generate {
            out,
            six,
            seven,
            load_factor,
        } => {
            let config = EvaluatorConfig::default()
                .with_phases(true, six || seven, seven)
                .with_load_factor(load_factor)
                .with_verbose(true);
            let evaluator = Evaluator::new(config).context("generating rank table")?;
            evaluator
                .save(&out)
                .with_context(|| format!("saving rank table to {}", out.display()))?;
        }
        Command::Evaluate { table, cards } => {
            let evaluator = open(table, cli.verbose)?;
            let hand = parse_cards(&cards.join(" "))?;
            let rank = evaluator.evaluate_cards(&hand)?;
            println!("{}", rank);
        }
        Command::Classify { cards } => {
            let hand = parse_cards(&cards.join(" "))?;
            let strength = best_strength(mask_of(&hand))?;
            println!("{}", strength);
        }
        Command::Bench {
            table,
            cards,
            samples,
        } => {
            if !(5..=7).contains(&cards) {
                bail!("--cards must be 5, 6 or 7");
            }
            let evaluator = open(table, cli.verbose)?;
            log::info!("Sample size: {} hands of {} cards", samples, cards);
            let hands = random_hands(samples, cards, 12345);
            let (evals_per_sec, duration_ms) = benchmark_throughput(&evaluator, &hands)
                .context("sampled hand missing from table; was it built for this card count?")?;

            println!("Results:");
            println!("  Duration: {} ms", duration_ms);
            println!("  Throughput: {:.2} evals/sec", evals_per_sec);
            println!("  Throughput: {:.2}M evals/sec", evals_per_sec / 1_000_000.0);
        }
    }
    Ok(())
}

/// Load a saved table, or generate the 5-card table when no file is given
fn open(table: Option<PathBuf>, verbose: bool) -> anyhow::Result<Evaluator> {
    let config = match table {
        Some(path) => EvaluatorConfig::from_file(path),
        None => EvaluatorConfig::default(),
    };
    Evaluator::new(config.with_verbose(verbose)).context("preparing rank table")
}
