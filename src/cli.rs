// src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chess_match", version, about = "Two-player chess with a rules-enforcing match service")]
pub struct Cli {
    /// YAML config file (falls back to CHESS_MATCH_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a hot-seat match in the terminal
    Play {
        /// Name for a new match
        #[arg(short, long)]
        name: Option<String>,
        /// Resume a stored match instead of creating one
        #[arg(short, long)]
        game: Option<u32>,
    },
    /// Apply moves from the opening position and print the result
    Replay {
        /// Moves in wire notation, e.g. e2e4 e7e5
        moves: Vec<String>,
    },
    /// List stored matches
    List,
}
