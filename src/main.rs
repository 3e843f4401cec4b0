// src/main.rs
mod cli;

use clap::Parser;
use env_logger::Env;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use chess_match::config::Config;
use chess_match::notation::{parse_move, parse_square};
use chess_match::protocol::{CommandType, ServerMessage, UserGameCommand};
use chess_match::service::{MatchService, MemoryUserStore};
use chess_match::store::{GameStore, MemoryGameStore};
use chess_match::{Color, Game, Move, NotationError, PieceType, ServiceError, StoreError};

use cli::{Cli, Commands};

lazy_static! {
    static ref COMMAND_INPUT: Regex = Regex::new(r"^(?i)(help|\?|board|resign|save|quit|exit)$").expect("valid regex");
    static ref HIGHLIGHT_INPUT: Regex = Regex::new(r"^(?i)highlight\s+(\S+)$").expect("valid regex");
    static ref MOVE_INPUT: Regex = Regex::new(r"^(?i)(?:move\s+)?(\S+)$").expect("valid regex");
}

// --- Input Parsing ---

#[derive(Debug)]
enum UserInput {
    Move(Move), // e.g. e2e4, a7a8q
    Highlight(String),
    Command(Command),
}

#[derive(Debug)]
enum Command { Help, Board, Resign, Save, Quit }

/// Parses a terminal line into a command or a move. Moves are checked for format only.
fn parse_user_input(input: &str) -> Result<UserInput, NotationError> {
    let trimmed = input.trim();

    if let Some(caps) = COMMAND_INPUT.captures(trimmed) {
        let command = match caps[1].to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "board" => Command::Board,
            "resign" => Command::Resign,
            "save" => Command::Save,
            _ => Command::Quit,
        };
        return Ok(UserInput::Command(command));
    }
    if let Some(caps) = HIGHLIGHT_INPUT.captures(trimmed) {
        return Ok(UserInput::Highlight(caps[1].to_string()));
    }
    match MOVE_INPUT.captures(trimmed) {
        Some(caps) => parse_move(&caps[1]).map(UserInput::Move),
        None => Err(NotationError::BadLength(trimmed.to_string())),
    }
}

// --- Store Helpers ---

fn open_store(cfg: &Config) -> Result<MemoryGameStore, StoreError> {
    match &cfg.store_path {
        Some(path) => MemoryGameStore::load_from_file(path),
        None => Ok(MemoryGameStore::new()),
    }
}

fn save_store(cfg: &Config, store: &MemoryGameStore) -> Result<(), StoreError> {
    match &cfg.store_path {
        Some(path) => store.save_to_file(path),
        None => Ok(()),
    }
}

// --- Output ---

fn render(msg: &ServerMessage) {
    match msg {
        ServerMessage::LoadGame { game } => {
            println!("------------------------------------------");
            println!("Game {} '{}'", game.game_id, game.game_name);
            println!("{}", game.game);
        }
        ServerMessage::Notification { message } => println!("-- {}", message),
        ServerMessage::Error { error_message } => println!("{}", error_message),
    }
}

fn drain(rx: &Receiver<ServerMessage>) {
    for msg in rx.try_iter() {
        render(&msg);
    }
}

/// Asks for a promotion piece. `None` on EOF or read failure.
fn prompt_promotion() -> io::Result<Option<PieceType>> {
    loop {
        print!("Promote pawn to? (q=Queen, r=Rook, b=Bishop, n=Knight): ");
        io::stdout().flush()?;
        let mut promo_input = String::new();
        if io::stdin().read_line(&mut promo_input)? == 0 {
            return Ok(None);
        }
        match promo_input.trim().chars().next().and_then(PieceType::from_letter) {
            Some(kind) if PieceType::PROMOTIONS.contains(&kind) => return Ok(Some(kind)),
            _ => println!("Invalid choice. Please enter q, r, b, or n."),
        }
    }
}

// --- Subcommands ---

const LOCAL_PASSWORD: &str = "hot-seat";

/// Registers `username` for this session, or logs in again when the name is already registered.
fn local_session(users: &mut MemoryUserStore, username: &str) -> Result<String, ServiceError> {
    match users.register(username, LOCAL_PASSWORD, "") {
        Err(ServiceError::UsernameTaken(_)) => users.login(username, LOCAL_PASSWORD),
        other => other,
    }
}

fn play(cfg: &Config, name: Option<String>, resume: Option<u32>) -> Result<(), Box<dyn Error>> {
    let mut users = MemoryUserStore::new();
    let white_token = local_session(&mut users, &cfg.white_player)?;
    let black_token = local_session(&mut users, &cfg.black_player)?;
    let viewer_token = local_session(&mut users, "terminal")?;
    let mut service = MatchService::new(open_store(cfg)?, users);

    let game_id = match resume {
        Some(id) => id,
        None => service.create_game(&white_token, name.as_deref().unwrap_or(&cfg.default_game_name))?,
    };
    service.join_game(&white_token, game_id, Color::White)?;
    service.join_game(&black_token, game_id, Color::Black)?;

    // The terminal watches as an observer; every broadcast and error lands on `rx`.
    let (conn, rx) = service.open_connection();
    service.connect(&viewer_token, game_id, conn)?;
    info!("Playing game {} ({} vs {})", game_id, cfg.white_player, cfg.black_player);
    print_help();

    'game_loop: loop {
        drain(&rx);

        let record = service.store().get_game(game_id)?;
        if record.game_over {
            println!("\n=== GAME OVER ===");
            break 'game_loop;
        }
        let turn = record.game.turn();
        let (player, token) = match turn {
            Color::White => (&cfg.white_player, &white_token),
            Color::Black => (&cfg.black_player, &black_token),
        };

        print!("\n{} ({}) to move. Enter move (e.g. e2e4) or command: ", player, turn);
        io::stdout().flush()?;

        let mut input_line = String::new();
        match io::stdin().read_line(&mut input_line) {
            Ok(0) => {
                println!("\nEnd of input detected. Quitting game.");
                break 'game_loop;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}. Try again or use 'quit'.", e);
                continue 'game_loop;
            }
        }
        let input_trimmed = input_line.trim();
        if input_trimmed.is_empty() { continue 'game_loop; }

        match parse_user_input(input_trimmed) {
            Ok(UserInput::Move(mut mv)) => {
                // A bare pawn move onto the far rank needs a promotion choice before it can be legal
                let needs_promotion = mv.promotion.is_none()
                    && record.game.valid_moves(mv.start).is_some_and(|legal| {
                        legal.iter().any(|m| m.end == mv.end && m.promotion.is_some())
                    });
                if needs_promotion {
                    match prompt_promotion()? {
                        Some(kind) => mv.promotion = Some(kind),
                        None => {
                            println!("Promotion choice required but not provided. Move cancelled.");
                            continue 'game_loop;
                        }
                    }
                }
                // Failures are reported on `rx`
                let _ = service.handle(&UserGameCommand::make_move(token, game_id, mv), conn);
            }
            Ok(UserInput::Highlight(square)) => match parse_square(&square) {
                Ok(at) => match record.game.valid_moves(at) {
                    Some(moves) => {
                        let mut listed: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                        listed.sort();
                        println!("Legal moves from {}: {}", at, if listed.is_empty() { "none".to_string() } else { listed.join(" ") });
                    }
                    None => println!("No piece on {}", at),
                },
                Err(e) => println!("Input Error: {}", e),
            },
            Ok(UserInput::Command(command)) => match command {
                Command::Help => print_help(),
                Command::Board => println!("{}", record.game),
                Command::Resign => {
                    let _ = service.handle(&UserGameCommand::new(CommandType::Resign, token, game_id), conn);
                }
                Command::Save => match save_store(cfg, service.store()) {
                    Ok(()) if cfg.store_path.is_some() => println!("Game {} saved.", game_id),
                    Ok(()) => println!("No store_path configured; nothing saved."),
                    Err(e) => println!("Error saving games: {}", e),
                },
                Command::Quit => {
                    println!("Exiting game.");
                    break 'game_loop;
                }
            },
            Err(e) => println!("Input Error: {}", e),
        }
    }

    drain(&rx);
    service.disconnect(conn);
    save_store(cfg, service.store())?;
    println!("\nGame session finished.");
    Ok(())
}

fn replay(moves: &[String]) -> Result<(), Box<dyn Error>> {
    let mut game = Game::new();
    for (i, text) in moves.iter().enumerate() {
        let mv = parse_move(text)?;
        game.make_move(&mv).map_err(|e| format!("move {} ({}): {}", i + 1, text, e))?;
        debug!("Applied {}", mv);
    }
    println!("{}", game);
    println!("{}", game.to_json()?);
    println!("Status: {:?}", game.status());
    Ok(())
}

fn list(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let store = open_store(cfg)?;
    let games = store.list_games()?;
    if games.is_empty() {
        println!("No stored games.");
    }
    for record in games {
        println!("{:>4}  {:<20} white: {:<12} black: {:<12} {}",
            record.game_id,
            record.game_name,
            record.white_username.as_deref().unwrap_or("-"),
            record.black_username.as_deref().unwrap_or("-"),
            if record.game_over { "over" } else { "in progress" });
    }
    Ok(())
}

/// Prints available commands.
fn print_help() {
    println!("\nAvailable Commands:");
    println!("  <move>            Enter move in wire notation (e.g., e2e4, a7a8q); 'move e2e4' also works.");
    println!("                    Promotion (q, r, b, n) is optional; will prompt if needed.");
    println!("  highlight <sq>    List legal moves for the piece on a square (e.g., highlight e2).");
    println!("  board             Show the board again.");
    println!("  resign            Forfeit the game (ends game).");
    println!("  save              Write stored games to the configured store_path.");
    println!("  help              Show this help message.");
    println!("  quit / exit       Leave the session (the game stays stored).");
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let cfg_path = cli.config.clone().or_else(|| std::env::var_os("CHESS_MATCH_CONFIG").map(PathBuf::from));
    let cfg = Config::load(cfg_path.as_deref())?;

    let env = Env::default().filter_or("CHESS_MATCH_LOG", cfg.log_level.as_str());
    env_logger::Builder::from_env(env).init();

    match cli.command.unwrap_or(Commands::Play { name: None, game: None }) {
        Commands::Play { name, game } => play(&cfg, name, game),
        Commands::Replay { moves } => replay(&moves),
        Commands::List => list(&cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_case_insensitively() {
        assert!(matches!(parse_user_input("HELP"), Ok(UserInput::Command(Command::Help))));
        assert!(matches!(parse_user_input("exit"), Ok(UserInput::Command(Command::Quit))));
        assert!(matches!(parse_user_input("Resign"), Ok(UserInput::Command(Command::Resign))));
    }

    #[test]
    fn parses_moves_with_or_without_keyword() {
        assert!(matches!(parse_user_input("e2e4"), Ok(UserInput::Move(_))));
        assert!(matches!(parse_user_input("move a7a8q"), Ok(UserInput::Move(m)) if m.promotion == Some(PieceType::Queen)));
        assert!(matches!(parse_user_input("z9z9"), Err(NotationError::BadFile('z'))));
    }

    #[test]
    fn same_player_on_both_sides_gets_two_sessions() {
        let mut users = MemoryUserStore::with_seed(2);
        let white = local_session(&mut users, "sam").unwrap();
        let black = local_session(&mut users, "sam").unwrap();
        assert_ne!(white, black);
        assert!(local_session(&mut users, "").is_err());
    }

    #[test]
    fn parses_highlight() {
        assert!(matches!(parse_user_input("highlight e2"), Ok(UserInput::Highlight(s)) if s == "e2"));
    }
}
