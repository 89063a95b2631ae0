//! Cluedo - the board-movement and turn-state engine
//!
//! This crate provides the core rules engine for a digital Cluedo table:
//! - A coordinate-grid board parsed from a textual layout, with rooms,
//!   doors, secret passages and blocking sets
//! - A dice-budgeted movement validator with a single commit point
//! - The shuffled card model and hidden answer
//! - An explicit turn state machine that publishes the legal actions after
//!   every step, and the suggestion/accusation resolver
//!
//! # Architecture
//!
//! The engine is UI-agnostic and fully synchronous: every entry point is a
//! plain function call that either commits one atomic state change or
//! fails without touching anything. Hosting layers (a chat bot, a CLI, a
//! server) drive it through [`ClueGame`] and may use the bundled command
//! translator for text input.
//!
//! # Modules
//!
//! - [`cards`]: suspects, weapons, rooms, scenarios and decks
//! - [`board`]: board topology and the movement validator
//! - [`game`]: the game state machine and resolver
//! - [`actions`]: action vocabulary and the command translator

pub mod actions;
pub mod board;
pub mod cards;
pub mod game;

// Re-export commonly used types
pub use actions::{Action, ActionKind, CommandError, Outcome};
pub use board::{
    Board, BoardError, Cell, Coord, Move, MoveDirection, MoveError, ParseDirectionError, Position,
};
pub use cards::{Ambience, Card, Decks, ParseCardError, Room, Scenario, Suspect, Weapon};
pub use game::{ClueGame, CluePlayer, Disproof, GameError, GamePhase, Suggestion};
