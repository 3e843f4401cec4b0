// src/store.rs
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::StoreError;
use crate::game::Game;
use crate::types::Color;

/// One stored match. An absent username is an open (or vacated) seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(rename = "gameID")]
    pub game_id: u32,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: Game,
    #[serde(default)]
    pub game_over: bool,
}

impl GameRecord {
    pub fn new(game_id: u32, game_name: &str) -> Self {
        GameRecord {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.to_string(),
            game: Game::new(),
            game_over: false,
        }
    }

    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    pub fn seat_mut(&mut self, color: Color) -> &mut Option<String> {
        match color {
            Color::White => &mut self.white_username,
            Color::Black => &mut self.black_username,
        }
    }

    /// The color `username` plays in this match, if seated. White wins when both seats are held.
    pub fn color_of(&self, username: &str) -> Option<Color> {
        self.seats_of(username).into_iter().next()
    }

    pub fn seats_of(&self, username: &str) -> Vec<Color> {
        [Color::White, Color::Black].into_iter().filter(|&c| self.seat(c) == Some(username)).collect()
    }
}

/// Persistence for match records, keyed by game id.
pub trait GameStore {
    fn create_game(&mut self, record: GameRecord) -> Result<(), StoreError>;
    fn get_game(&self, game_id: u32) -> Result<GameRecord, StoreError>;
    fn list_games(&self) -> Result<Vec<GameRecord>, StoreError>;
    fn update_game(&mut self, record: GameRecord) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;

    fn contains(&self, game_id: u32) -> bool {
        self.get_game(game_id).is_ok()
    }
}

#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: HashMap<u32, GameRecord>,
}

impl MemoryGameStore {
    pub fn new() -> Self { MemoryGameStore::default() }

    /// Writes every record to `path` as a JSON array.
    pub fn save_to_file(&self, path: &Path) -> Result<(), StoreError> {
        let records = self.list_games()?;
        let json_data = serde_json::to_string_pretty(&records)?;
        fs::write(path, json_data).map_err(|e| StoreError::Io(path.display().to_string(), e))?;
        debug!("Saved {} game(s) to {}", records.len(), path.display());
        Ok(())
    }

    /// Loads a snapshot written by `save_to_file`. A missing file gives an empty store.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            info!("No game store at {}, starting empty", path.display());
            return Ok(MemoryGameStore::new());
        }
        let content = fs::read_to_string(path).map_err(|e| StoreError::Io(path.display().to_string(), e))?;
        let records: Vec<GameRecord> = serde_json::from_str(&content)?;
        debug!("Loaded {} game(s) from {}", records.len(), path.display());
        let games = records.into_iter().map(|r| (r.game_id, r)).collect();
        Ok(MemoryGameStore { games })
    }
}

impl GameStore for MemoryGameStore {
    fn create_game(&mut self, record: GameRecord) -> Result<(), StoreError> {
        if self.games.contains_key(&record.game_id) {
            return Err(StoreError::AlreadyExists(record.game_id));
        }
        self.games.insert(record.game_id, record);
        Ok(())
    }

    fn get_game(&self, game_id: u32) -> Result<GameRecord, StoreError> {
        self.games.get(&game_id).cloned().ok_or(StoreError::NotFound(game_id))
    }

    fn list_games(&self) -> Result<Vec<GameRecord>, StoreError> {
        let mut records: Vec<GameRecord> = self.games.values().cloned().collect();
        records.sort_by_key(|r| r.game_id);
        Ok(records)
    }

    fn update_game(&mut self, record: GameRecord) -> Result<(), StoreError> {
        match self.games.get_mut(&record.game_id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(record.game_id)),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.games.clear();
        Ok(())
    }
}
