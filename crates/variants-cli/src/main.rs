//! Variants CLI - inspect positions, run perft and replay saved games.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use variants_core::{PieceKind, Square};
use variants_engine::{perft, perft_divide, Game, GameConfig, GameRecord, Variant};

#[derive(Parser)]
#[command(name = "variants")]
#[command(about = "Chess variants rules engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the legal moves of one piece
    Moves {
        /// Variant to play
        #[arg(short, long, default_value = "classical")]
        variant: Variant,
        /// Square of the piece, or a reserve piece letter such as N for drops
        target: String,
        /// Moves to play first, in coordinate notation (e2e4, N@f3, *@d5)
        #[arg(short, long, value_delimiter = ',')]
        after: Vec<String>,
    },
    /// Count leaf nodes of the move tree
    Perft {
        /// Variant to play
        #[arg(short, long, default_value = "classical")]
        variant: Variant,
        /// Search depth in plies
        #[arg(short, long, default_value = "3")]
        depth: u32,
        /// Print the count below each first move
        #[arg(long)]
        divide: bool,
    },
    /// Replay a saved game record
    Replay {
        /// Path to the JSON record
        file: PathBuf,
    },
    /// Print the effective configuration
    Config {
        /// Path to the TOML file
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Moves {
            variant,
            target,
            after,
        } => {
            let mut game = Game::new(variant);
            for text in &after {
                game.make_move_notation(text)
                    .with_context(|| format!("cannot play {}", text))?;
            }

            let moves = if let Ok(square) = target.parse::<Square>() {
                game.legal_moves_at(square)
            } else {
                let mut chars = target.chars();
                let kind = match (chars.next(), chars.next()) {
                    (Some('*'), None) => return print_moves(game.duck_moves()),
                    (Some(c), None) => {
                        PieceKind::from_fen_char(c.to_ascii_uppercase()).map(|(k, _)| k)
                    }
                    _ => None,
                };
                match kind {
                    Some(kind) => game.reserve_drops(kind),
                    None => bail!("expected a square or a piece letter, got '{}'", target),
                }
            };
            print_moves(moves)
        }
        Commands::Perft {
            variant,
            depth,
            divide,
        } => {
            let game = Game::new(variant);
            if divide {
                let results = perft_divide(&game, depth);
                let total: u64 = results.iter().map(|(_, n)| n).sum();
                for (notation, nodes) in results {
                    println!("{}: {}", notation, nodes);
                }
                println!();
                println!("Nodes searched: {}", total);
            } else {
                println!("{} perft({}) = {}", variant, depth, perft(&game, depth));
            }
            Ok(())
        }
        Commands::Replay { file } => {
            tracing::info!("Replaying {:?}", file);
            let (record, mut problems) = GameRecord::load(&file)
                .with_context(|| format!("cannot load {}", file.display()))?;
            let (game, rejected) = record.replay();
            problems.extend(rejected);

            println!("{}", game.board());
            println!();
            println!("Variant: {}", game.variant());
            println!("Moves played: {}", game.ply_count());
            match game.result() {
                Some(result) => println!("Result: {}", result),
                None => println!("Result: in progress ({} to move)", game.side_to_move()),
            }
            if let Some(saved) = &record.result {
                let replayed = game.result().map(|r| r.to_string());
                if replayed.as_deref() != Some(saved.as_str()) {
                    println!("Recorded result differs: {}", saved);
                }
            }
            for problem in &problems {
                println!("Skipped: {}", problem);
            }
            Ok(())
        }
        Commands::Config { path } => {
            let path = path.unwrap_or_else(GameConfig::config_path);
            let config = GameConfig::load(&path)
                .with_context(|| format!("cannot load {}", path.display()))?;
            let game = config.new_game();

            println!("Variant: {}", config.variant);
            println!("Record directory: {}", config.record_dir.display());
            for &color in game.rules().players() {
                let tc = config.clock.time_control(color);
                println!(
                    "{}: {}s + {}s",
                    color, tc.initial_seconds, tc.increment_seconds
                );
            }
            Ok(())
        }
    }
}

fn print_moves(moves: Vec<variants_core::Move>) -> anyhow::Result<()> {
    if moves.is_empty() {
        println!("No legal moves");
    }
    for mv in moves {
        println!("{}", mv);
    }
    Ok(())
}
