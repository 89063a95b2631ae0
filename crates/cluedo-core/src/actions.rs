//! Game actions and the textual command translator.
//!
//! This module defines the action vocabulary the turn state machine
//! publishes (`ActionKind`), argument-carrying action values (`Action`),
//! the uniform results of performing them (`Outcome`), and a parser from
//! whitespace-tokenized command strings to actions. The parser is a
//! convenience for UI layers; the state machine itself only ever sees
//! `Action` values.

use crate::board::{Move, MoveDirection};
use crate::cards::{ParseCardError, Room, Suspect, Weapon};
use crate::game::{ClueGame, Suggestion};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The names of the actions the state machine can permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Start,
    Roll,
    Move,
    Secret,
    Suggest,
    Accuse,
    EndTurn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            ActionKind::Start => "start",
            ActionKind::Roll => "roll",
            ActionKind::Move => "move",
            ActionKind::Secret => "secret",
            ActionKind::Suggest => "suggest",
            ActionKind::Accuse => "accuse",
            ActionKind::EndTurn => "endturn",
        };
        f.write_str(word)
    }
}

/// One fully-specified player action.
///
/// `start` is not represented here: it takes a roster, not command-line
/// words, and is invoked directly by the hosting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Roll the dice to begin moving
    Roll,
    /// Walk the given move sequence against the last roll
    Move(Vec<Move>),
    /// Take the current room's secret passage
    Secret,
    /// Name a suspect and weapon in the current room
    Suggest(Suspect, Weapon),
    /// Name the full scenario against the hidden answer
    Accuse(Suspect, Weapon, Room),
    /// Pass play to the next player
    EndTurn,
}

impl Action {
    /// The state-machine name of this action
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Roll => ActionKind::Roll,
            Action::Move(_) => ActionKind::Move,
            Action::Secret => ActionKind::Secret,
            Action::Suggest(..) => ActionKind::Suggest,
            Action::Accuse(..) => ActionKind::Accuse,
            Action::EndTurn => ActionKind::EndTurn,
        }
    }

    /// Parse a whitespace-tokenized command string.
    ///
    /// The game is consulted for one convenience: when the current player
    /// sits in a one-door room and the command does not start with `door`,
    /// a `door A` hop is prepended so `move up 2` works from inside.
    pub fn parse(command: &str, game: &ClueGame) -> Result<Action, CommandError> {
        let mut tokens = command.split_whitespace();
        let word = tokens.next().ok_or(CommandError::Empty)?;

        match word.to_ascii_lowercase().as_str() {
            "endturn" => Ok(Action::EndTurn),
            "roll" => Ok(Action::Roll),
            "secret" => Ok(Action::Secret),
            "move" => {
                let args: Vec<&str> = tokens.collect();
                if args.len() % 2 != 0 {
                    return Err(CommandError::UnpairedMove);
                }

                let mut moves = Vec::with_capacity(args.len() / 2 + 1);
                if Self::wants_door_prefix(game, args.first()) {
                    moves.push(Move::new(MoveDirection::Door, 0));
                }

                for pair in args.chunks(2) {
                    let direction: MoveDirection = pair[0]
                        .parse()
                        .map_err(|_| CommandError::UnknownDirection(pair[0].to_string()))?;
                    let length = if direction == MoveDirection::Door {
                        door_index(pair[1])?
                    } else {
                        pair[1]
                            .parse()
                            .map_err(|_| CommandError::BadStepCount(pair[1].to_string()))?
                    };
                    moves.push(Move::new(direction, length));
                }
                Ok(Action::Move(moves))
            }
            "suggest" => {
                let suspect = next_card(&mut tokens, "suggest")?.parse()?;
                let weapon = next_card(&mut tokens, "suggest")?.parse()?;
                Ok(Action::Suggest(suspect, weapon))
            }
            "accuse" => {
                let suspect = next_card(&mut tokens, "accuse")?.parse()?;
                let weapon = next_card(&mut tokens, "accuse")?.parse()?;
                let room = next_card(&mut tokens, "accuse")?.parse()?;
                Ok(Action::Accuse(suspect, weapon, room))
            }
            _ => Err(CommandError::UnknownCommand(word.to_string())),
        }
    }

    fn wants_door_prefix(game: &ClueGame, first_arg: Option<&&str>) -> bool {
        if first_arg.map_or(false, |a| a.eq_ignore_ascii_case("door")) {
            return false;
        }
        let room = game
            .current_player()
            .and_then(|p| game.player_position(p.suspect))
            .and_then(|position| position.room());
        match (room, game.board()) {
            (Some(room), Some(board)) => board.doors(room).len() == 1,
            _ => false,
        }
    }
}

fn next_card<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<&'a str, CommandError> {
    tokens.next().ok_or(CommandError::MissingArguments(command))
}

fn door_index(letter: &str) -> Result<u32, CommandError> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ ('a'..='d' | 'A'..='D')), None) => {
            Ok(c.to_ascii_uppercase() as u32 - 'A' as u32)
        }
        _ => Err(CommandError::BadDoorLetter),
    }
}

/// Errors from the command translator. Purely lexical: nothing here has
/// touched or depends on turn legality.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("improper command '{0}'")]
    UnknownCommand(String),

    #[error("move requires full pairs of parameters")]
    UnpairedMove,

    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    #[error("door must be one of A-D")]
    BadDoorLetter,

    #[error("invalid step count '{0}'")]
    BadStepCount(String),

    #[error("'{0}' requires more arguments")]
    MissingArguments(&'static str),

    #[error(transparent)]
    Card(#[from] ParseCardError),
}

/// What performing an action produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The rolled total
    Rolled(u32),
    /// The room entered by the move, or None for a hallway stop
    Moved(Option<Room>),
    /// The room the secret passage led to
    Passage(Room),
    /// The public hint and the disproof, if anyone could disprove
    Suggested(Suggestion),
    /// Whether the accusation matched the answer
    Accused(bool),
    TurnEnded,
}
