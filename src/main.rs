use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use salmon_search::driver::Driver;
use salmon_search::perft::divide;
use salmon_search::{Position, Search, SearchConfig};

#[derive(Parser, Debug)]
#[command(name = "salmon", version, about = "Alpha-beta chess search engine")]
struct Cli {
    /// Start from this FEN instead of the initial position
    #[arg(long, global = true)]
    fen: Option<String>,

    /// Maximum search depth in plies
    #[arg(long, global = true, default_value_t = 5)]
    depth: u32,

    /// Time budget per engine move, in milliseconds
    #[arg(long, global = true, default_value_t = 5000)]
    movetime: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play on stdin/stdout; the engine answers every move
    Play,
    /// Count leaf positions to a fixed depth
    Perft { depth: u32 },
    /// Search once and print the best move
    Search,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SearchConfig {
        max_depth: cli.depth.max(1),
        max_time: Duration::from_millis(cli.movetime),
        ..SearchConfig::default()
    };
    let mut position = match &cli.fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("cannot load '{}'", fen))?,
        None => Position::new(),
    };

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let mut driver = Driver::new(config).with_auto_reply(true);
            driver.set_position(position);
            driver.run()?;
        }
        Command::Perft { depth } => {
            let mut total = u64::from(depth == 0);
            for (mv, nodes) in divide(&mut position, depth) {
                println!("{}: {}", mv, nodes);
                total += nodes;
            }
            println!("nodes {}", total);
        }
        Command::Search => {
            let mut search = Search::with_config(config);
            match search.select_move(&mut position) {
                Some(result) => {
                    info!(nodes = result.stats.total_nodes(), elapsed = ?result.elapsed, "search done");
                    println!(
                        "bestmove {} score {} depth {}",
                        result.best_move, result.score, result.depth
                    );
                }
                None => println!("bestmove (none)"),
            }
        }
    }
    Ok(())
}
