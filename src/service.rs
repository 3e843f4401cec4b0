// src/service.rs
//! Match service: authenticates callers, persists games, and fans out updates to every
//! connection watching a match.
//!
//! The service takes `&mut self` for every mutation. A transport that shares it between
//! threads wraps it in a `Mutex`, which serializes moves per match.
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::error::ServiceError;
use crate::game::GameStatus;
use crate::protocol::{CommandType, ServerMessage, UserGameCommand};
use crate::store::{GameRecord, GameStore};
use crate::types::{Color, Move};

const MAX_GAME_ID: u32 = 9999;

// --- Authentication ---

/// Resolves auth tokens to usernames.
pub trait Authenticator {
    fn username_for(&self, token: &str) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct MemoryAuth {
    tokens: HashMap<String, String>,
}

impl MemoryAuth {
    pub fn new() -> Self { MemoryAuth::default() }

    pub fn insert(&mut self, token: &str, username: &str) {
        self.tokens.insert(token.to_string(), username.to_string());
    }

    /// Issues a fresh random token for `username`.
    pub fn issue(&mut self, username: &str, rng: &mut impl RngCore) -> String {
        let token = format!("{:016x}", rng.next_u64());
        self.insert(&token, username);
        token
    }

    pub fn revoke(&mut self, token: &str) {
        self.tokens.remove(token);
    }
}

impl Authenticator for MemoryAuth {
    fn username_for(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Registered users plus their live sessions. Every successful register or login issues a
/// new token; logout revokes one.
#[derive(Debug)]
pub struct MemoryUserStore {
    users: HashMap<String, UserData>,
    sessions: MemoryAuth,
    rng: StdRng,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        MemoryUserStore { users: HashMap::new(), sessions: MemoryAuth::new(), rng: StdRng::from_os_rng() }
    }

    /// Deterministic tokens, for tests.
    pub fn with_seed(seed: u64) -> Self {
        MemoryUserStore { users: HashMap::new(), sessions: MemoryAuth::new(), rng: StdRng::seed_from_u64(seed) }
    }

    pub fn register(&mut self, username: &str, password: &str, email: &str) -> Result<String, ServiceError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ServiceError::BadRequest("username and password are required".to_string()));
        }
        if self.users.contains_key(username) {
            return Err(ServiceError::UsernameTaken(username.to_string()));
        }
        self.users.insert(username.to_string(), UserData {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        });
        info!("Registered user {}", username);
        Ok(self.sessions.issue(username, &mut self.rng))
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<String, ServiceError> {
        match self.users.get(username) {
            Some(user) if user.password == password => {
                debug!("{} logged in", username);
                Ok(self.sessions.issue(username, &mut self.rng))
            }
            _ => Err(ServiceError::Unauthorized),
        }
    }

    pub fn logout(&mut self, token: &str) -> Result<(), ServiceError> {
        let username = self.sessions.username_for(token).ok_or(ServiceError::Unauthorized)?;
        self.sessions.revoke(token);
        debug!("{} logged out", username);
        Ok(())
    }

    pub fn user(&self, username: &str) -> Option<&UserData> {
        self.users.get(username)
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self { MemoryUserStore::new() }
}

impl Authenticator for MemoryUserStore {
    fn username_for(&self, token: &str) -> Option<String> {
        self.sessions.username_for(token)
    }
}

// --- Connections ---

pub type ConnectionId = u64;

#[derive(Debug)]
struct Member {
    conn: ConnectionId,
    username: String,
}

/// Per-match broadcast lists. Owned by the service; there is no process-wide registry.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    next_id: ConnectionId,
    senders: HashMap<ConnectionId, Sender<ServerMessage>>,
    games: HashMap<u32, Vec<Member>>,
}

impl ConnectionHub {
    pub fn new() -> Self { ConnectionHub::default() }

    /// Registers a new client connection. Messages for it arrive on the returned receiver.
    pub fn open(&mut self) -> (ConnectionId, Receiver<ServerMessage>) {
        let (tx, rx) = channel();
        self.next_id += 1;
        let id = self.next_id;
        self.senders.insert(id, tx);
        (id, rx)
    }

    pub fn join(&mut self, game_id: u32, conn: ConnectionId, username: &str) {
        let members = self.games.entry(game_id).or_default();
        if !members.iter().any(|m| m.conn == conn) {
            members.push(Member { conn, username: username.to_string() });
        }
    }

    pub fn leave(&mut self, game_id: u32, conn: ConnectionId) {
        if let Some(members) = self.games.get_mut(&game_id) {
            members.retain(|m| m.conn != conn);
            if members.is_empty() {
                self.games.remove(&game_id);
            }
        }
    }

    /// Drops the connection from every match.
    pub fn close(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);
        let game_ids: Vec<u32> = self.games.keys().copied().collect();
        for game_id in game_ids {
            self.leave(game_id, conn);
        }
    }

    pub fn member_count(&self, game_id: u32) -> usize {
        self.games.get(&game_id).map_or(0, |m| m.len())
    }

    /// Sends to one connection; a closed receiver closes the connection.
    pub fn send(&mut self, conn: ConnectionId, msg: ServerMessage) {
        let delivered = self.senders.get(&conn).is_some_and(|tx| tx.send(msg).is_ok());
        if !delivered {
            debug!("Connection {} is gone, closing", conn);
            self.close(conn);
        }
    }

    /// Sends to every connection on `game_id`, skipping those owned by `except_user`.
    pub fn broadcast(&mut self, game_id: u32, except_user: Option<&str>, msg: &ServerMessage) {
        let targets: Vec<ConnectionId> = self.games.get(&game_id).map_or_else(Vec::new, |members| {
            members.iter()
                .filter(|m| except_user != Some(m.username.as_str()))
                .map(|m| m.conn)
                .collect()
        });
        debug!("Broadcasting to {} connection(s) on game {}", targets.len(), game_id);
        for conn in targets {
            self.send(conn, msg.clone());
        }
    }
}

// --- Match Service ---

pub struct MatchService<S: GameStore, A: Authenticator> {
    store: S,
    auth: A,
    hub: ConnectionHub,
    rng: StdRng,
}

impl<S: GameStore, A: Authenticator> MatchService<S, A> {
    pub fn new(store: S, auth: A) -> Self {
        MatchService { store, auth, hub: ConnectionHub::new(), rng: StdRng::from_os_rng() }
    }

    /// Deterministic game ids, for tests.
    pub fn with_seed(store: S, auth: A, seed: u64) -> Self {
        MatchService { store, auth, hub: ConnectionHub::new(), rng: StdRng::seed_from_u64(seed) }
    }

    pub fn store(&self) -> &S { &self.store }
    pub fn hub_mut(&mut self) -> &mut ConnectionHub { &mut self.hub }

    pub fn open_connection(&mut self) -> (ConnectionId, Receiver<ServerMessage>) {
        self.hub.open()
    }

    /// Drops a closed client connection from every match it was watching. Seats are kept so
    /// the player can reconnect.
    pub fn disconnect(&mut self, conn: ConnectionId) {
        self.hub.close(conn);
        debug!("Connection {} disconnected", conn);
    }

    fn authenticate(&self, token: &str) -> Result<String, ServiceError> {
        if token.is_empty() {
            return Err(ServiceError::Unauthorized);
        }
        self.auth.username_for(token).ok_or(ServiceError::Unauthorized)
    }

    /// Creates an empty match and returns its id, drawn at random from 1..=9999.
    pub fn create_game(&mut self, token: &str, game_name: &str) -> Result<u32, ServiceError> {
        let username = self.authenticate(token)?;
        if game_name.trim().is_empty() {
            return Err(ServiceError::BadRequest("no game name provided".to_string()));
        }
        let existing = self.store.list_games()?.len() as u32;
        if existing >= MAX_GAME_ID {
            return Err(ServiceError::BadRequest("no free game ids".to_string()));
        }
        let game_id = loop {
            let candidate = self.rng.random_range(1..=MAX_GAME_ID);
            if !self.store.contains(candidate) { break candidate; }
        };
        self.store.create_game(GameRecord::new(game_id, game_name))?;
        info!("{} created game {} ('{}')", username, game_id, game_name);
        Ok(game_id)
    }

    pub fn list_games(&self, token: &str) -> Result<Vec<GameRecord>, ServiceError> {
        self.authenticate(token)?;
        Ok(self.store.list_games()?)
    }

    /// Claims the `color` seat. Re-joining a seat one already holds is accepted.
    pub fn join_game(&mut self, token: &str, game_id: u32, color: Color) -> Result<(), ServiceError> {
        let username = self.authenticate(token)?;
        let mut record = self.store.get_game(game_id)?;
        match record.seat(color) {
            Some(holder) if holder == username => return Ok(()),
            Some(_) => return Err(ServiceError::SeatTaken(color)),
            None => {}
        }
        *record.seat_mut(color) = Some(username.clone());
        self.store.update_game(record)?;
        info!("{} joined game {} as {}", username, game_id, color);
        Ok(())
    }

    /// Attaches `conn` to a match: it receives the current game, the others are notified.
    pub fn connect(&mut self, token: &str, game_id: u32, conn: ConnectionId) -> Result<(), ServiceError> {
        let username = self.authenticate(token)?;
        let record = self.store.get_game(game_id)?;
        let role = record.color_of(&username).map_or_else(|| "observer".to_string(), |c| c.to_string());

        self.hub.join(game_id, conn, &username);
        self.hub.send(conn, ServerMessage::LoadGame { game: record });
        self.hub.broadcast(game_id, Some(&username), &ServerMessage::notification(format!("{} connected as {}", username, role)));
        info!("{} connected to game {} as {}", username, game_id, role);
        Ok(())
    }

    /// Applies a move for the seated player whose turn it is, persists it and broadcasts the
    /// new state plus any check, checkmate or stalemate.
    pub fn make_move(&mut self, token: &str, game_id: u32, mv: &Move) -> Result<GameStatus, ServiceError> {
        let username = self.authenticate(token)?;
        let mut record = self.store.get_game(game_id)?;
        if record.game_over {
            return Err(ServiceError::GameOver(game_id));
        }
        // Checked against the side to move; one user may hold both seats
        if record.seat(record.game.turn()) != Some(username.as_str()) {
            return Err(ServiceError::NotYourTurn);
        }

        record.game.make_move(mv)?;
        let status = record.game.status();
        if matches!(status, GameStatus::Checkmate(_) | GameStatus::Stalemate(_)) {
            record.game_over = true;
        }
        self.store.update_game(record.clone())?;
        info!("{} moved {} in game {}", username, mv, game_id);

        let status_note = status_message(&record, status);
        self.hub.broadcast(game_id, None, &ServerMessage::LoadGame { game: record });
        self.hub.broadcast(game_id, Some(&username), &ServerMessage::notification(format!("{} moved {}", username, mv)));
        if let Some(note) = status_note {
            info!("Game {}: {}", game_id, note);
            self.hub.broadcast(game_id, None, &ServerMessage::notification(note));
        }
        Ok(status)
    }

    /// Ends the match in the opponent's favour and vacates the resigner's seat.
    /// Observers cannot resign.
    pub fn resign(&mut self, token: &str, game_id: u32) -> Result<(), ServiceError> {
        let username = self.authenticate(token)?;
        let mut record = self.store.get_game(game_id)?;
        let turn = record.game.turn();
        let color = if record.seat(turn) == Some(username.as_str()) {
            turn
        } else {
            record.color_of(&username)
                .ok_or_else(|| ServiceError::BadRequest("observers cannot resign".to_string()))?
        };
        if record.game_over {
            return Err(ServiceError::GameOver(game_id));
        }
        *record.seat_mut(color) = None;
        record.game_over = true;
        self.store.update_game(record)?;
        info!("{} resigned game {}", username, game_id);
        self.hub.broadcast(game_id, None, &ServerMessage::notification(format!("{} resigned", username)));
        Ok(())
    }

    /// Detaches `conn` and frees every seat the leaver holds.
    pub fn leave(&mut self, token: &str, game_id: u32, conn: ConnectionId) -> Result<(), ServiceError> {
        let username = self.authenticate(token)?;
        let mut record = self.store.get_game(game_id)?;
        let held = record.seats_of(&username);
        if !held.is_empty() {
            for color in held {
                *record.seat_mut(color) = None;
            }
            self.store.update_game(record)?;
        }
        self.hub.leave(game_id, conn);
        info!("{} left game {}", username, game_id);
        self.hub.broadcast(game_id, Some(&username), &ServerMessage::notification(format!("{} left the game", username)));
        Ok(())
    }

    /// Dispatches a client command arriving on `conn`. Failures are also sent back to `conn`
    /// as an error message.
    pub fn handle(&mut self, cmd: &UserGameCommand, conn: ConnectionId) -> Result<(), ServiceError> {
        let result = match cmd.command_type {
            CommandType::Connect => self.connect(&cmd.auth_token, cmd.game_id, conn),
            CommandType::MakeMove => match &cmd.mv {
                Some(mv) => self.make_move(&cmd.auth_token, cmd.game_id, mv).map(|_| ()),
                None => Err(ServiceError::BadRequest("missing move data".to_string())),
            },
            CommandType::Resign => self.resign(&cmd.auth_token, cmd.game_id),
            CommandType::Leave => self.leave(&cmd.auth_token, cmd.game_id, conn),
        };
        if let Err(e) = &result {
            warn!("Rejected {:?} on game {}: {}", cmd.command_type, cmd.game_id, e);
            self.hub.send(conn, ServerMessage::error(e.to_string()));
        }
        result
    }
}

fn status_message(record: &GameRecord, status: GameStatus) -> Option<String> {
    let name = |color: Color| record.seat(color).map_or_else(|| color.to_string(), str::to_string);
    match status {
        GameStatus::Ongoing => None,
        GameStatus::Check(c) => Some(format!("{} is in check", name(c))),
        GameStatus::Checkmate(c) => Some(format!("{} is in checkmate", name(c))),
        GameStatus::Stalemate(c) => Some(format!("{} is in stalemate", name(c))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_move;
    use crate::store::MemoryGameStore;

    fn service() -> MatchService<MemoryGameStore, MemoryAuth> {
        let mut auth = MemoryAuth::new();
        auth.insert("t-alice", "alice");
        auth.insert("t-bob", "bob");
        auth.insert("t-carol", "carol");
        MatchService::with_seed(MemoryGameStore::new(), auth, 7)
    }

    fn drain(rx: &Receiver<ServerMessage>) -> Vec<ServerMessage> {
        rx.try_iter().collect()
    }

    #[test]
    fn create_requires_auth_and_name() {
        let mut svc = service();
        assert!(matches!(svc.create_game("bogus", "g"), Err(ServiceError::Unauthorized)));
        assert!(matches!(svc.create_game("", "g"), Err(ServiceError::Unauthorized)));
        assert!(matches!(svc.create_game("t-alice", " "), Err(ServiceError::BadRequest(_))));
        let id = svc.create_game("t-alice", "g").unwrap();
        assert!((1..=MAX_GAME_ID).contains(&id));
        assert_eq!(svc.list_games("t-bob").unwrap().len(), 1);
    }

    #[test]
    fn seats_cannot_be_stolen() {
        let mut svc = service();
        let id = svc.create_game("t-alice", "g").unwrap();
        svc.join_game("t-alice", id, Color::White).unwrap();
        svc.join_game("t-alice", id, Color::White).unwrap();
        assert!(matches!(svc.join_game("t-bob", id, Color::White), Err(ServiceError::SeatTaken(Color::White))));
        svc.join_game("t-bob", id, Color::Black).unwrap();
        let record = svc.store().get_game(id).unwrap();
        assert_eq!(record.white_username.as_deref(), Some("alice"));
        assert_eq!(record.black_username.as_deref(), Some("bob"));
    }

    #[test]
    fn connect_sends_state_and_notifies_others() {
        let mut svc = service();
        let id = svc.create_game("t-alice", "g").unwrap();
        svc.join_game("t-alice", id, Color::White).unwrap();
        let (c1, rx1) = svc.open_connection();
        let (c2, rx2) = svc.open_connection();

        svc.connect("t-alice", id, c1).unwrap();
        assert!(matches!(drain(&rx1).as_slice(), [ServerMessage::LoadGame { .. }]));

        svc.connect("t-carol", id, c2).unwrap();
        assert!(matches!(drain(&rx2).as_slice(), [ServerMessage::LoadGame { .. }]));
        assert_eq!(drain(&rx1), vec![ServerMessage::notification("carol connected as observer")]);
    }

    #[test]
    fn only_player_to_move_may_move() {
        let mut svc = service();
        let id = svc.create_game("t-alice", "g").unwrap();
        svc.join_game("t-alice", id, Color::White).unwrap();
        svc.join_game("t-bob", id, Color::Black).unwrap();

        let e7e5 = parse_move("e7e5").unwrap();
        assert!(matches!(svc.make_move("t-bob", id, &e7e5), Err(ServiceError::NotYourTurn)));
        assert!(matches!(svc.make_move("t-carol", id, &parse_move("e2e4").unwrap()), Err(ServiceError::NotYourTurn)));
        assert!(matches!(svc.make_move("t-alice", id, &parse_move("e2e5").unwrap()), Err(ServiceError::Move(_))));

        assert_eq!(svc.make_move("t-alice", id, &parse_move("e2e4").unwrap()).unwrap(), GameStatus::Ongoing);
        assert_eq!(svc.store().get_game(id).unwrap().game.turn(), Color::Black);
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut svc = service();
        let id = svc.create_game("t-alice", "g").unwrap();
        svc.join_game("t-alice", id, Color::White).unwrap();
        svc.join_game("t-bob", id, Color::Black).unwrap();
        let (conn, rx) = svc.open_connection();
        svc.connect("t-carol", id, conn).unwrap();

        for (token, mv) in [("t-alice", "f2f3"), ("t-bob", "e7e5"), ("t-alice", "g2g4")] {
            svc.make_move(token, id, &parse_move(mv).unwrap()).unwrap();
        }
        let status = svc.make_move("t-bob", id, &parse_move("d8h4").unwrap()).unwrap();
        assert_eq!(status, GameStatus::Checkmate(Color::White));
        assert!(svc.store().get_game(id).unwrap().game_over);

        let messages = drain(&rx);
        assert!(messages.contains(&ServerMessage::notification("bob moved d8h4")));
        assert_eq!(messages.last(), Some(&ServerMessage::notification("alice is in checkmate")));

        assert!(matches!(svc.make_move("t-alice", id, &parse_move("a2a3").unwrap()), Err(ServiceError::GameOver(_))));
    }

    #[test]
    fn handle_reports_errors_to_sender() {
        let mut svc = service();
        let id = svc.create_game("t-alice", "g").unwrap();
        let (conn, rx) = svc.open_connection();

        let cmd = UserGameCommand::new(CommandType::MakeMove, "t-alice", id);
        assert!(svc.handle(&cmd, conn).is_err());
        assert_eq!(drain(&rx), vec![ServerMessage::error("Error: bad request: missing move data")]);

        let cmd = UserGameCommand::new(CommandType::Connect, "nope", id);
        assert!(svc.handle(&cmd, conn).is_err());
        assert_eq!(drain(&rx), vec![ServerMessage::error("Error: unauthorized")]);
    }

    #[test]
    fn resign_and_leave() {
        let mut svc = service();
        let id = svc.create_game("t-alice", "g").unwrap();
        svc.join_game("t-alice", id, Color::White).unwrap();
        svc.join_game("t-bob", id, Color::Black).unwrap();
        let (c_alice, _rx_alice) = svc.open_connection();
        let (c_bob, rx_bob) = svc.open_connection();
        svc.connect("t-alice", id, c_alice).unwrap();
        svc.connect("t-bob", id, c_bob).unwrap();
        drain(&rx_bob);

        assert!(matches!(svc.resign("t-carol", id), Err(ServiceError::BadRequest(_))));
        svc.resign("t-alice", id).unwrap();
        let record = svc.store().get_game(id).unwrap();
        assert!(record.game_over);
        assert_eq!(record.white_username, None);
        assert_eq!(record.black_username.as_deref(), Some("bob"));
        assert!(matches!(svc.resign("t-bob", id), Err(ServiceError::GameOver(_))));
        assert_eq!(drain(&rx_bob), vec![ServerMessage::notification("alice resigned")]);

        svc.leave("t-alice", id, c_alice).unwrap();
        assert_eq!(svc.store().get_game(id).unwrap().white_username, None);
        assert_eq!(svc.hub_mut().member_count(id), 1);
        assert_eq!(drain(&rx_bob), vec![ServerMessage::notification("alice left the game")]);
    }

    #[test]
    fn one_user_may_play_both_sides() {
        let mut svc = service();
        let id = svc.create_game("t-alice", "g").unwrap();
        svc.join_game("t-alice", id, Color::White).unwrap();
        svc.join_game("t-alice", id, Color::Black).unwrap();

        svc.make_move("t-alice", id, &parse_move("e2e4").unwrap()).unwrap();
        svc.make_move("t-alice", id, &parse_move("e7e5").unwrap()).unwrap();
        assert_eq!(svc.store().get_game(id).unwrap().game.turn(), Color::White);
        assert!(matches!(svc.make_move("t-bob", id, &parse_move("d2d4").unwrap()), Err(ServiceError::NotYourTurn)));

        // Resigning gives up the side to move only
        svc.resign("t-alice", id).unwrap();
        let record = svc.store().get_game(id).unwrap();
        assert_eq!(record.white_username, None);
        assert_eq!(record.black_username.as_deref(), Some("alice"));
    }

    #[test]
    fn disconnect_leaves_every_match() {
        let mut svc = service();
        let first = svc.create_game("t-alice", "g1").unwrap();
        let second = svc.create_game("t-alice", "g2").unwrap();
        svc.join_game("t-alice", first, Color::White).unwrap();
        let (c_alice, _rx_alice) = svc.open_connection();
        let (c_bob, rx_bob) = svc.open_connection();
        svc.connect("t-alice", first, c_alice).unwrap();
        svc.connect("t-alice", second, c_alice).unwrap();
        svc.connect("t-bob", first, c_bob).unwrap();
        drain(&rx_bob);

        svc.disconnect(c_alice);
        assert_eq!(svc.hub_mut().member_count(first), 1);
        assert_eq!(svc.hub_mut().member_count(second), 0);
        assert_eq!(svc.store().get_game(first).unwrap().white_username.as_deref(), Some("alice"));

        svc.make_move("t-alice", first, &parse_move("e2e4").unwrap()).unwrap();
        assert!(matches!(drain(&rx_bob).first(), Some(ServerMessage::LoadGame { .. })));
    }

    #[test]
    fn register_login_logout() {
        let mut users = MemoryUserStore::with_seed(3);
        assert!(matches!(users.register("", "pw", "a@x"), Err(ServiceError::BadRequest(_))));
        assert!(matches!(users.register("alice", "", "a@x"), Err(ServiceError::BadRequest(_))));

        let token = users.register("alice", "pw", "a@x").unwrap();
        assert_eq!(users.username_for(&token).as_deref(), Some("alice"));
        assert_eq!(users.user("alice").map(|u| u.email.as_str()), Some("a@x"));
        let taken = users.register("alice", "other", "b@x").unwrap_err();
        assert_eq!(taken.to_string(), "Error: username alice is already taken");

        assert!(matches!(users.login("alice", "wrong"), Err(ServiceError::Unauthorized)));
        assert!(matches!(users.login("nobody", "pw"), Err(ServiceError::Unauthorized)));
        let second = users.login("alice", "pw").unwrap();
        assert_ne!(second, token);

        users.logout(&token).unwrap();
        assert_eq!(users.username_for(&token), None);
        assert_eq!(users.username_for(&second).as_deref(), Some("alice"));
        assert!(matches!(users.logout(&token), Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn registered_users_can_play() {
        let mut users = MemoryUserStore::with_seed(11);
        let alice = users.register("alice", "pw", "").unwrap();
        let bob = users.register("bob", "pw", "").unwrap();
        let mut svc = MatchService::with_seed(MemoryGameStore::new(), users, 5);
        let id = svc.create_game(&alice, "g").unwrap();
        svc.join_game(&alice, id, Color::White).unwrap();
        svc.join_game(&bob, id, Color::Black).unwrap();
        svc.make_move(&alice, id, &parse_move("d2d4").unwrap()).unwrap();
        assert!(matches!(svc.make_move(&alice, id, &parse_move("d4d5").unwrap()), Err(ServiceError::NotYourTurn)));
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut hub = ConnectionHub::new();
        let (c1, rx1) = hub.open();
        let (c2, rx2) = hub.open();
        hub.join(9, c1, "a");
        hub.join(9, c2, "b");
        drop(rx1);
        hub.broadcast(9, None, &ServerMessage::notification("ping"));
        assert_eq!(hub.member_count(9), 1);
        assert_eq!(rx2.try_iter().count(), 1);
    }

    #[test]
    fn issued_tokens_authenticate() {
        let mut auth = MemoryAuth::new();
        let mut rng = StdRng::seed_from_u64(1);
        let token = auth.issue("dave", &mut rng);
        assert_eq!(auth.username_for(&token).as_deref(), Some("dave"));
        auth.revoke(&token);
        assert_eq!(auth.username_for(&token), None);
    }
}
