// src/protocol.rs
//! JSON messages exchanged between clients and the match service.
use serde::{Deserialize, Serialize};

use crate::store::GameRecord;
use crate::types::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType { Connect, MakeMove, Leave, Resign }

/// A client command. The token is resolved by the service before the engine is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGameCommand {
    pub command_type: CommandType,
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: u32,
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub mv: Option<Move>,
}

impl UserGameCommand {
    pub fn new(command_type: CommandType, auth_token: &str, game_id: u32) -> Self {
        UserGameCommand { command_type, auth_token: auth_token.to_string(), game_id, mv: None }
    }

    pub fn make_move(auth_token: &str, game_id: u32, mv: Move) -> Self {
        UserGameCommand { mv: Some(mv), ..UserGameCommand::new(CommandType::MakeMove, auth_token, game_id) }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    LoadGame { game: GameRecord },
    Notification { message: String },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification { message: message.into() }
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        ServerMessage::Error { error_message: error_message.into() }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
