//! Core game state machine.
//!
//! This module contains the main `ClueGame` struct and all turn logic: the
//! shuffled answer pool, the card deal, the legal-action protocol and the
//! suggestion/accusation resolver.
//!
//! The turn protocol is an explicit state machine: `GamePhase` names the
//! point reached in a turn, `valid_actions` derives the permitted action
//! names from it, and every action method checks membership before touching
//! any state. A rejected action is a protocol error and mutates nothing; a
//! failed move is an input error and leaves the phase unchanged so the
//! player can retry.

use crate::actions::{Action, ActionKind, CommandError, Outcome};
use crate::board::{Board, BoardError, Move, MoveDirection, MoveError, Position};
use crate::cards::{Card, Decks, Room, Scenario, Suspect, Weapon};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

/// How far the current turn has progressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Game constructed, waiting for `start`
    Lobby,

    /// Start of the current player's turn: roll, accuse or end the turn,
    /// plus suggest/secret when starting inside a room
    TurnStart,

    /// Dice rolled; the only legal action is the move that spends them
    AwaitingMove,

    /// Move ended on a hallway cell; the turn must end
    MovedToHallway,

    /// Entered a room this turn (by move or secret passage); a suggestion
    /// is required before anything else
    EnteredRoom,

    /// Suggestion resolved; follow up with an accusation or end the turn
    PostSuggest,

    /// Accusation was wrong but the game continues; the turn must end
    MustEndTurn,

    /// Game over
    Finished { winner: Option<Suspect> },
}

/// Errors that can occur when driving a game.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    /// Protocol error: the caller is out of sync with the turn state
    #[error("'{action}' is not an option right now (current options: {options:?})")]
    NotAnOption {
        action: ActionKind,
        options: Vec<ActionKind>,
    },

    #[error("the game needs at least one player")]
    EmptyRoster,

    #[error("board has no starting position for {0}")]
    MissingPosition(Suspect),

    #[error("cannot suggest outside a room")]
    SuggestOutsideRoom,

    #[error("{0} is not one of this game's cards")]
    CardNotInGame(Card),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// One seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CluePlayer {
    /// Opaque identity of the controlling user
    pub id: String,
    pub suspect: Suspect,
    /// Dealt hand, fixed for the game's duration
    pub cards: Vec<Card>,
}

/// Result of a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Public hint sentence sampled from one of the three card pairs
    pub hint: String,
    /// The first player after the asker able to disprove, if any
    pub disproof: Option<Disproof>,
}

/// A player forced to disprove a suggestion and the cards they could show.
///
/// Which card is actually revealed is the asker's table to negotiate; the
/// engine only reports the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disproof {
    pub player: CluePlayer,
    pub cards: Vec<Card>,
}

/// The complete game state for one table.
///
/// Each concurrent game owns an independent instance; nothing here is
/// shared or global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueGame {
    /// The card sets the game was built from, in deck order
    decks: Decks,
    /// The zipped answer pool the answer was drawn from
    combos: Vec<Scenario>,
    answer: Scenario,
    die_count: u32,
    phase: GamePhase,
    /// Turn cursor: front is the current player
    players: VecDeque<CluePlayer>,
    board: Option<Board>,
    cur_roll: u32,
    eliminated: HashSet<Suspect>,
    accuse_count: usize,
    /// Room each player last suggested in; suppresses a second suggestion
    /// from the same room on a later visit without leaving
    last_suggest_room: HashMap<Suspect, Room>,
}

impl ClueGame {
    /// Create a new game with the standard decks and a fresh shuffle.
    pub fn new(die_count: u32) -> Self {
        Self::with_decks(die_count, Decks::standard())
    }

    /// Create a new game from custom card sets with a fresh shuffle.
    pub fn with_decks(die_count: u32, decks: Decks) -> Self {
        let mut rng = rand::thread_rng();
        Self::with_rng(die_count, decks, &mut rng)
    }

    /// Create a new game from the given decks with a provided RNG.
    /// This allows deterministic shuffles and answer selection when needed.
    pub fn with_rng<R: Rng>(die_count: u32, decks: Decks, rng: &mut R) -> Self {
        let mut shuffled = decks.clone();
        shuffled.shuffle(rng);

        // Zip the three shuffled sets positionally; the answer pool is
        // these combinations, not the full cross product.
        let combos: Vec<Scenario> = shuffled
            .suspects
            .iter()
            .zip(&shuffled.weapons)
            .zip(&shuffled.rooms)
            .map(|((s, w), r)| Scenario::new(*s, *w, *r))
            .collect();
        assert!(!combos.is_empty(), "card decks must not be empty");
        let answer = combos[rng.gen_range(0..combos.len())];

        Self {
            decks,
            combos,
            answer,
            die_count,
            phase: GamePhase::Lobby,
            players: VecDeque::new(),
            board: None,
            cur_roll: 0,
            eliminated: HashSet::new(),
            accuse_count: 0,
            last_suggest_room: HashMap::new(),
        }
    }

    // ==================== Setup ====================

    /// Seat the roster on the standard board, deal cards and open play.
    ///
    /// The roster maps each chosen suspect to the opaque id of the
    /// controlling user. Callable exactly once per game.
    pub fn start(&mut self, roster: HashMap<Suspect, String>) -> Result<(), GameError> {
        let suspects: HashSet<Suspect> = roster.keys().copied().collect();
        let board = Board::standard(&suspects);
        self.start_with_board(roster, board)
    }

    /// Like `start`, but on a caller-supplied board. The board must hold a
    /// position for every suspect in the roster.
    pub fn start_with_board(
        &mut self,
        roster: HashMap<Suspect, String>,
        board: Board,
    ) -> Result<(), GameError> {
        self.ensure_allowed(ActionKind::Start)?;
        if roster.is_empty() {
            return Err(GameError::EmptyRoster);
        }
        for suspect in roster.keys() {
            if board.position(*suspect).is_none() {
                return Err(GameError::MissingPosition(*suspect));
            }
        }

        let mut rng = rand::thread_rng();
        let mut pool = self.decks.all_cards();
        for card in self.answer.cards() {
            if let Some(idx) = pool.iter().position(|c| *c == card) {
                pool.remove(idx);
            }
        }
        pool.shuffle(&mut rng);

        // Stride-chunk into near-even hands; chunk sizes differ by at most
        // one card.
        let count = roster.len();
        let mut hands: Vec<Vec<Card>> = (0..count)
            .map(|i| pool.iter().skip(i).step_by(count).copied().collect())
            .collect();
        if pool.len() % count != 0 {
            // Shuffle chunk order so the bigger hands aren't always dealt
            // to the first suspects in board order.
            hands.shuffle(&mut rng);
        }

        let seated: Vec<Suspect> = Suspect::ALL
            .iter()
            .filter(|s| roster.contains_key(s))
            .copied()
            .collect();
        self.players = seated
            .into_iter()
            .zip(hands)
            .map(|(suspect, cards)| CluePlayer {
                id: roster[&suspect].clone(),
                suspect,
                cards,
            })
            .collect();

        self.board = Some(board);
        self.eliminated.clear();
        self.accuse_count = 0;
        self.last_suggest_room.clear();
        self.cur_roll = 0;
        self.phase = GamePhase::TurnStart;
        Ok(())
    }

    // ==================== Turn actions ====================

    /// Roll the dice. The total becomes the budget of the following move.
    pub fn roll(&mut self) -> Result<u32, GameError> {
        self.ensure_allowed(ActionKind::Roll)?;
        let mut rng = rand::thread_rng();
        let total = (0..self.die_count).map(|_| rng.gen_range(1..=6)).sum();
        self.cur_roll = total;
        let suspect = self.current_suspect();
        self.last_suggest_room.remove(&suspect);
        self.phase = GamePhase::AwaitingMove;
        Ok(total)
    }

    /// Walk a move sequence against the current roll budget.
    ///
    /// Returns the room entered, or None when the move ends on a hallway
    /// cell. A `MoveError` leaves both the position map and the phase
    /// unchanged, so the same window stays open for a corrected retry.
    pub fn move_player(&mut self, moves: &[Move]) -> Result<Option<Room>, GameError> {
        self.ensure_allowed(ActionKind::Move)?;
        let suspect = self.current_suspect();
        let roll = self.cur_roll;
        let entered = self
            .board
            .as_mut()
            .expect("board exists once the game has started")
            .move_token(suspect, roll, moves)?;
        self.phase = match entered {
            Some(_) => GamePhase::EnteredRoom,
            None => GamePhase::MovedToHallway,
        };
        Ok(entered)
    }

    /// Take the current room's secret passage. Costs no roll.
    pub fn secret(&mut self) -> Result<Room, GameError> {
        self.ensure_allowed(ActionKind::Secret)?;
        let suspect = self.current_suspect();
        let entered = self
            .board
            .as_mut()
            .expect("board exists once the game has started")
            .move_token(suspect, 0, &[Move::new(MoveDirection::Secret, 0)])?;
        let room = match entered {
            Some(room) => room,
            None => return Err(GameError::Move(MoveError::NoSecretPassage)),
        };
        self.last_suggest_room.remove(&suspect);
        self.phase = GamePhase::EnteredRoom;
        Ok(room)
    }

    /// Suggest a suspect and weapon in the current room.
    ///
    /// The named suspect's token is moved to the scene. The returned hint
    /// publicly states whether one randomly sampled pair of the three
    /// suggested cards co-occurs anywhere in the answer pool.
    pub fn suggest(&mut self, suspect: Suspect, weapon: Weapon) -> Result<Suggestion, GameError> {
        self.ensure_allowed(ActionKind::Suggest)?;
        if !self.decks.suspects.contains(&suspect) {
            return Err(GameError::CardNotInGame(Card::Suspect(suspect)));
        }
        if !self.decks.weapons.contains(&weapon) {
            return Err(GameError::CardNotInGame(Card::Weapon(weapon)));
        }

        let asker = self.current_suspect();
        let room = self
            .board
            .as_ref()
            .and_then(|b| b.position(asker))
            .and_then(|p| p.room())
            .ok_or(GameError::SuggestOutsideRoom)?;

        if let Some(board) = self.board.as_mut() {
            board.teleport_to_room(suspect, room);
        }

        let scenario = Scenario::new(suspect, weapon, room);
        let hint = self.hint_for(scenario);
        let disproof = self.find_disproof(scenario);

        self.last_suggest_room.insert(asker, room);
        self.phase = GamePhase::PostSuggest;
        Ok(Suggestion { hint, disproof })
    }

    /// Accuse a full scenario against the hidden answer.
    ///
    /// A correct accusation wins and ends the game. A wrong one removes
    /// the accuser's token and eliminates them; the game ends with no
    /// winner once as many accusations have been made as there are
    /// players.
    pub fn accuse(
        &mut self,
        suspect: Suspect,
        weapon: Weapon,
        room: Room,
    ) -> Result<bool, GameError> {
        self.ensure_allowed(ActionKind::Accuse)?;
        if !self.decks.suspects.contains(&suspect) {
            return Err(GameError::CardNotInGame(Card::Suspect(suspect)));
        }
        if !self.decks.weapons.contains(&weapon) {
            return Err(GameError::CardNotInGame(Card::Weapon(weapon)));
        }
        if !self.decks.rooms.contains(&room) {
            return Err(GameError::CardNotInGame(Card::Room(room)));
        }

        self.accuse_count += 1;
        let accuser = self.current_suspect();
        let correct = Scenario::new(suspect, weapon, room) == self.answer;

        if correct {
            self.phase = GamePhase::Finished {
                winner: Some(accuser),
            };
        } else {
            if let Some(board) = self.board.as_mut() {
                board.remove_token(accuser);
            }
            self.eliminated.insert(accuser);
            self.phase = if self.accuse_count >= self.players.len() {
                GamePhase::Finished { winner: None }
            } else {
                GamePhase::MustEndTurn
            };
        }
        Ok(correct)
    }

    /// Pass play to the next non-eliminated player.
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.ensure_allowed(ActionKind::EndTurn)?;
        self.players.rotate_left(1);
        for _ in 0..self.players.len() {
            match self.players.front() {
                Some(p) if self.eliminated.contains(&p.suspect) => self.players.rotate_left(1),
                _ => break,
            }
        }
        self.phase = GamePhase::TurnStart;
        Ok(())
    }

    /// Perform a parsed action through the matching entry point.
    pub fn perform(&mut self, action: Action) -> Result<Outcome, GameError> {
        match action {
            Action::Roll => self.roll().map(Outcome::Rolled),
            Action::Move(moves) => self.move_player(&moves).map(Outcome::Moved),
            Action::Secret => self.secret().map(Outcome::Passage),
            Action::Suggest(s, w) => self.suggest(s, w).map(Outcome::Suggested),
            Action::Accuse(s, w, r) => self.accuse(s, w, r).map(Outcome::Accused),
            Action::EndTurn => self.end_turn().map(|_| Outcome::TurnEnded),
        }
    }

    /// Translate a command string into an action (see `Action::parse`).
    pub fn translate(&self, command: &str) -> Result<Action, CommandError> {
        Action::parse(command, self)
    }

    // ==================== Legal-action protocol ====================

    /// The actions currently permitted by the turn protocol.
    pub fn valid_actions(&self) -> Vec<ActionKind> {
        match &self.phase {
            GamePhase::Lobby => vec![ActionKind::Start],

            GamePhase::TurnStart => {
                let mut options = vec![ActionKind::Roll, ActionKind::Accuse, ActionKind::EndTurn];
                let (suspect, board) = match (self.players.front(), self.board.as_ref()) {
                    (Some(p), Some(b)) => (p.suspect, b),
                    _ => return options,
                };
                if let Some(room) = board.position(suspect).and_then(|p| p.room()) {
                    if self.last_suggest_room.get(&suspect) != Some(&room) {
                        options.insert(1, ActionKind::Suggest);
                    }
                    if board.secret_target(room).is_some() {
                        options.insert(1, ActionKind::Secret);
                    }
                    if board.is_blocked(room) {
                        options.retain(|a| *a != ActionKind::Roll);
                    }
                }
                options
            }

            GamePhase::AwaitingMove => vec![ActionKind::Move],
            GamePhase::MovedToHallway | GamePhase::MustEndTurn => vec![ActionKind::EndTurn],
            GamePhase::EnteredRoom => vec![ActionKind::Suggest],
            GamePhase::PostSuggest => vec![ActionKind::Accuse, ActionKind::EndTurn],
            GamePhase::Finished { .. } => Vec::new(),
        }
    }

    fn ensure_allowed(&self, action: ActionKind) -> Result<(), GameError> {
        let options = self.valid_actions();
        if options.contains(&action) {
            Ok(())
        } else {
            Err(GameError::NotAnOption { action, options })
        }
    }

    // ==================== Resolver internals ====================

    fn hint_for(&self, scenario: Scenario) -> String {
        let mut rng = rand::thread_rng();
        let pairs = scenario.pairs();
        let (first, second) = pairs[rng.gen_range(0..pairs.len())];
        let holds = self
            .combos
            .iter()
            .any(|combo| combo.contains(first) && combo.contains(second));

        let (verb, afterverb) = match (first, second) {
            (Card::Suspect(_), Card::Weapon(_)) => ("did", "have"),
            _ => ("was", "in"),
        };
        let article = if matches!(first, Card::Weapon(_)) {
            "The "
        } else {
            ""
        };
        let verb = if holds {
            verb.to_uppercase()
        } else {
            verb.to_string()
        };
        let negation = if holds { " " } else { " NOT " };
        format!("{article}{first} {verb}{negation}{afterverb} the {second}.")
    }

    fn find_disproof(&self, scenario: Scenario) -> Option<Disproof> {
        for player in self.players.iter().skip(1) {
            let cards: Vec<Card> = scenario
                .cards()
                .iter()
                .copied()
                .filter(|c| player.cards.contains(c))
                .collect();
            if !cards.is_empty() {
                return Some(Disproof {
                    player: player.clone(),
                    cards,
                });
            }
        }
        None
    }

    // ==================== Queries ====================

    /// The current phase
    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    /// Number of dice rolled per turn
    pub fn die_count(&self) -> u32 {
        self.die_count
    }

    /// The unspent budget of the last roll
    pub fn current_roll(&self) -> u32 {
        self.cur_roll
    }

    /// The hidden answer. For the hosting layer's eyes (game-over reveal
    /// and flavor text), never the players'.
    pub fn answer(&self) -> Scenario {
        self.answer
    }

    /// The zipped combination pool the answer was drawn from
    pub fn answer_pool(&self) -> &[Scenario] {
        &self.combos
    }

    /// The player whose turn it is
    pub fn current_player(&self) -> Option<&CluePlayer> {
        self.players.front()
    }

    /// All seated players in rotation order, current first
    pub fn players(&self) -> &VecDeque<CluePlayer> {
        &self.players
    }

    /// The board, once the game has started
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Mutable board access for the hosting layer (custom setups, tests)
    pub fn board_mut(&mut self) -> Option<&mut Board> {
        self.board.as_mut()
    }

    /// A suspect's current position, if they are on the board
    pub fn player_position(&self, suspect: Suspect) -> Option<Position> {
        self.board.as_ref().and_then(|b| b.position(suspect))
    }

    /// The current player's position
    pub fn position(&self) -> Option<Position> {
        self.current_player()
            .map(|p| p.suspect)
            .and_then(|s| self.player_position(s))
    }

    /// Whether the game has concluded
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// The winner, if the game finished with one
    pub fn winner(&self) -> Option<Suspect> {
        match self.phase {
            GamePhase::Finished { winner } => winner,
            _ => None,
        }
    }

    /// Whether a suspect's player has been eliminated
    pub fn is_eliminated(&self, suspect: Suspect) -> bool {
        self.eliminated.contains(&suspect)
    }

    /// Whether every hand holds the same number of cards
    pub fn even_hands(&self) -> bool {
        let mut sizes = self.players.iter().map(|p| p.cards.len());
        match sizes.next() {
            Some(first) => sizes.all(|n| n == first),
            None => true,
        }
    }

    fn current_suspect(&self) -> Suspect {
        self.players
            .front()
            .expect("players exist once the game has started")
            .suspect
    }
}

impl Default for ClueGame {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Coord;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn full_roster() -> HashMap<Suspect, String> {
        Suspect::ALL
            .iter()
            .map(|s| (*s, s.name().to_string()))
            .collect()
    }

    fn seeded_game(seed: u64) -> ClueGame {
        let mut rng = StdRng::seed_from_u64(seed);
        ClueGame::with_rng(1, Decks::standard(), &mut rng)
    }

    fn started_game(seed: u64) -> ClueGame {
        let mut game = seeded_game(seed);
        game.start(full_roster()).unwrap();
        game
    }

    #[test]
    fn test_answer_drawn_from_pool_and_stable() {
        let game = seeded_game(11);
        assert_eq!(game.answer_pool().len(), 6);
        assert!(game.answer_pool().contains(&game.answer()));
        assert_eq!(game.answer(), game.answer());
    }

    #[test]
    fn test_start_is_single_shot() {
        let mut game = started_game(1);
        let err = game.start(full_roster());
        assert!(matches!(err, Err(GameError::NotAnOption { .. })));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let mut game = seeded_game(1);
        assert_eq!(game.start(HashMap::new()), Err(GameError::EmptyRoster));
        assert_eq!(*game.phase(), GamePhase::Lobby);
    }

    #[test]
    fn test_turn_order_is_canonical() {
        let game = started_game(3);
        let order: Vec<Suspect> = game.players().iter().map(|p| p.suspect).collect();
        assert_eq!(order, Suspect::ALL.to_vec());
        assert_eq!(game.current_player().unwrap().suspect, Suspect::Scarlet);
    }

    #[test]
    fn test_turn_start_options_in_hallway() {
        let game = started_game(4);
        assert_eq!(
            game.valid_actions(),
            vec![ActionKind::Roll, ActionKind::Accuse, ActionKind::EndTurn]
        );
    }

    #[test]
    fn test_turn_start_options_in_room_with_passage() {
        let mut game = started_game(5);
        game.board_mut()
            .unwrap()
            .set_position(Suspect::Scarlet, Position::Room(Room::Conservatory));
        assert_eq!(
            game.valid_actions(),
            vec![
                ActionKind::Roll,
                ActionKind::Secret,
                ActionKind::Suggest,
                ActionKind::Accuse,
                ActionKind::EndTurn,
            ]
        );
    }

    #[test]
    fn test_blocked_room_removes_roll() {
        let mut game = started_game(6);
        let board = game.board_mut().unwrap();
        board.set_position(Suspect::Scarlet, Position::Room(Room::Study));
        // The Study's only approach cell on the standard board.
        board.set_position(Suspect::Mustard, Position::Hallway(Coord::new(4, 6)));
        let options = game.valid_actions();
        assert!(!options.contains(&ActionKind::Roll));
        assert!(options.contains(&ActionKind::Secret));
        assert!(options.contains(&ActionKind::Suggest));
    }

    #[test]
    fn test_move_with_exact_roll() {
        let mut game = started_game(7);
        game.phase = GamePhase::AwaitingMove;
        game.cur_roll = 3;
        let result = game.move_player(&[Move::new(MoveDirection::Down, 3)]);
        assert_eq!(result, Ok(None));
        assert_eq!(*game.phase(), GamePhase::MovedToHallway);
        assert_eq!(
            game.position(),
            Some(Position::Hallway(Coord::new(3, 16)))
        );
        assert_eq!(game.valid_actions(), vec![ActionKind::EndTurn]);
    }

    #[test]
    fn test_failed_move_keeps_window_open() {
        let mut game = started_game(8);
        game.phase = GamePhase::AwaitingMove;
        game.cur_roll = 3;
        let up = game.move_player(&[Move::new(MoveDirection::Up, 3)]);
        assert_eq!(up, Err(GameError::Move(MoveError::OutOfBounds)));
        assert_eq!(*game.phase(), GamePhase::AwaitingMove);
        assert_eq!(
            game.position(),
            Some(Position::Hallway(Coord::new(0, 16)))
        );

        let down = game.move_player(&[Move::new(MoveDirection::Down, 3)]);
        assert_eq!(down, Ok(None));
    }

    #[test]
    fn test_suggest_teleports_and_marks_room() {
        let mut game = started_game(9);
        game.board_mut()
            .unwrap()
            .set_position(Suspect::Scarlet, Position::Room(Room::Study));

        let suggestion = game.suggest(Suspect::Mustard, Weapon::Rope).unwrap();
        assert!(!suggestion.hint.is_empty());
        assert_eq!(
            game.player_position(Suspect::Mustard),
            Some(Position::Room(Room::Study))
        );
        assert_eq!(*game.phase(), GamePhase::PostSuggest);
        assert_eq!(
            game.valid_actions(),
            vec![ActionKind::Accuse, ActionKind::EndTurn]
        );

        // Cycle all the way back to Scarlet; still in the Study, so no
        // second suggestion is offered from the same visit.
        for _ in 0..Suspect::ALL.len() {
            game.end_turn().unwrap();
        }
        assert_eq!(game.current_player().unwrap().suspect, Suspect::Scarlet);
        assert!(!game.valid_actions().contains(&ActionKind::Suggest));
    }

    #[test]
    fn test_hint_wording_positive_and_negative() {
        let mut game = started_game(10);
        game.combos = vec![Scenario::new(Suspect::Mustard, Weapon::Knife, Room::Study)];
        game.board_mut()
            .unwrap()
            .set_position(Suspect::Scarlet, Position::Room(Room::Study));

        let positive = game.suggest(Suspect::Mustard, Weapon::Knife).unwrap();
        let expected_positive = [
            "Col. Mustard DID have the Knife.",
            "Col. Mustard WAS in the Study.",
            "The Knife WAS in the Study.",
        ];
        assert!(
            expected_positive.contains(&positive.hint.as_str()),
            "unexpected hint: {}",
            positive.hint
        );

        game.phase = GamePhase::EnteredRoom;
        let negative = game.suggest(Suspect::Plum, Weapon::Rope).unwrap();
        let expected_negative = [
            "Prof. Plum did NOT have the Rope.",
            "Prof. Plum was NOT in the Study.",
            "The Rope was NOT in the Study.",
        ];
        assert!(
            expected_negative.contains(&negative.hint.as_str()),
            "unexpected hint: {}",
            negative.hint
        );
    }

    #[test]
    fn test_disproof_scans_in_turn_order() {
        let mut game = started_game(12);
        game.board_mut()
            .unwrap()
            .set_position(Suspect::Scarlet, Position::Room(Room::Study));
        // Hand-craft the hands: Mustard and White can both disprove, but
        // Mustard sits first in rotation order after the asker.
        for player in game.players.iter_mut() {
            player.cards = Vec::new();
        }
        game.players[1].cards = vec![Card::Weapon(Weapon::Knife)];
        game.players[2].cards = vec![Card::Suspect(Suspect::Mustard), Card::Room(Room::Study)];

        let suggestion = game.suggest(Suspect::Mustard, Weapon::Knife).unwrap();
        let disproof = suggestion.disproof.unwrap();
        assert_eq!(disproof.player.suspect, Suspect::Mustard);
        assert_eq!(disproof.cards, vec![Card::Weapon(Weapon::Knife)]);

        // Nobody holds any of these three cards.
        game.phase = GamePhase::EnteredRoom;
        game.players[2].cards = Vec::new();
        let unprovable = game.suggest(Suspect::Plum, Weapon::Rope).unwrap();
        assert!(unprovable.disproof.is_none());
    }

    #[test]
    fn test_correct_accusation_wins() {
        let mut game = started_game(13);
        let answer = game.answer();
        let verdict = game.accuse(answer.suspect, answer.weapon, answer.room);
        assert_eq!(verdict, Ok(true));
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some(Suspect::Scarlet));
        assert!(game.valid_actions().is_empty());
    }

    #[test]
    fn test_wrong_accusation_eliminates_accuser_only() {
        let mut game = started_game(14);
        let answer = game.answer();
        let wrong_suspect = Suspect::ALL
            .iter()
            .copied()
            .find(|s| *s != answer.suspect)
            .unwrap();

        let verdict = game.accuse(wrong_suspect, answer.weapon, answer.room);
        assert_eq!(verdict, Ok(false));
        assert!(!game.is_finished());
        assert!(game.is_eliminated(Suspect::Scarlet));
        assert_eq!(game.player_position(Suspect::Scarlet), None);
        for suspect in Suspect::ALL.iter().skip(1) {
            assert!(game.player_position(*suspect).is_some());
        }
        assert_eq!(game.valid_actions(), vec![ActionKind::EndTurn]);

        // Scarlet is skipped in every later rotation.
        game.end_turn().unwrap();
        assert_eq!(game.current_player().unwrap().suspect, Suspect::Mustard);
        for _ in 0..5 {
            game.end_turn().unwrap();
        }
        assert_eq!(game.current_player().unwrap().suspect, Suspect::Mustard);
    }

    #[test]
    fn test_last_chance_accusation_ends_game() {
        let mut game = seeded_game(15);
        let roster: HashMap<Suspect, String> = [
            (Suspect::Scarlet, "a".to_string()),
            (Suspect::Mustard, "b".to_string()),
        ]
        .into_iter()
        .collect();
        game.start(roster).unwrap();
        let answer = game.answer();
        let wrong = Suspect::ALL
            .iter()
            .copied()
            .find(|s| *s != answer.suspect)
            .unwrap();

        assert_eq!(game.accuse(wrong, answer.weapon, answer.room), Ok(false));
        assert_eq!(*game.phase(), GamePhase::MustEndTurn);
        game.end_turn().unwrap();

        assert_eq!(game.accuse(wrong, answer.weapon, answer.room), Ok(false));
        assert_eq!(*game.phase(), GamePhase::Finished { winner: None });
        assert!(game.valid_actions().is_empty());
    }

    #[test]
    fn test_protocol_error_mutates_nothing() {
        let mut game = started_game(16);
        let before = game.position();
        let err = game.move_player(&[Move::new(MoveDirection::Down, 1)]);
        assert!(matches!(err, Err(GameError::NotAnOption { .. })));
        assert_eq!(game.position(), before);
        assert_eq!(*game.phase(), GamePhase::TurnStart);
    }

    #[test]
    fn test_deal_covers_every_card_once() {
        let game = started_game(17);
        let mut dealt: Vec<Card> = game
            .players()
            .iter()
            .flat_map(|p| p.cards.iter().copied())
            .collect();
        assert_eq!(dealt.len(), 18);
        for card in game.answer().cards() {
            assert!(!dealt.contains(&card));
        }
        dealt.extend(game.answer().cards());
        for card in Decks::standard().all_cards() {
            let copies = dealt.iter().filter(|c| **c == card).count();
            assert_eq!(copies, 1, "{} dealt {} times", card, copies);
        }
        assert!(game.even_hands());
    }

    #[test]
    fn test_uneven_deal_sizes() {
        let mut game = seeded_game(18);
        let roster: HashMap<Suspect, String> = Suspect::ALL
            .iter()
            .take(4)
            .map(|s| (*s, s.name().to_string()))
            .collect();
        game.start(roster).unwrap();
        let mut sizes: Vec<usize> = game.players().iter().map(|p| p.cards.len()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![4, 4, 5, 5]);
        assert!(!game.even_hands());
    }

    #[test]
    fn test_roll_range() {
        for seed in 0..4 {
            let mut game = started_game(20 + seed);
            let roll = game.roll().unwrap();
            assert!((1..=6).contains(&roll));
            assert_eq!(*game.phase(), GamePhase::AwaitingMove);
            assert_eq!(game.current_roll(), roll);
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let game = started_game(21);
        let json = serde_json::to_string(&game).unwrap();
        let restored: ClueGame = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.phase(), game.phase());
        assert_eq!(restored.answer(), game.answer());
        assert_eq!(restored.players(), game.players());
        assert_eq!(
            restored.board().unwrap().positions(),
            game.board().unwrap().positions()
        );
    }
}
