//! Game board representation and the movement validator.
//!
//! This module contains:
//! - `Coord` and `MoveDirection`, the grid coordinate system
//! - `Cell`, the parsed grid alphabet (hallway, wall, room interior, door)
//! - `Board`, built once per game from a textual grid: per-room door lists,
//!   blocking sets, secret passages and the authoritative player positions
//! - `move_token`, the dice-budgeted movement validator
//!
//! The board text format uses one character per cell: a digit `1`-`9` is a
//! door of that room, a letter `A`-`I` is a room interior cell (token
//! display only, never walkable), `0` or a blank is a hallway cell, and any
//! other character is a wall.

use crate::cards::{Room, Suspect};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grid coordinate: `row` grows downward, `col` grows rightward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    /// Create a new coordinate
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A movement direction: the four cardinal steps plus the two
/// pseudo-directions that begin an exit from a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Up,
    Left,
    Down,
    Right,
    /// Take the room's secret passage; must be the whole move sequence
    Secret,
    /// Step onto one of the room's doors; the move length is the door index
    Door,
}

impl MoveDirection {
    /// The four cardinal directions, in scan order
    pub const CARDINAL: [MoveDirection; 4] = [
        MoveDirection::Up,
        MoveDirection::Left,
        MoveDirection::Down,
        MoveDirection::Right,
    ];

    /// Unit offset as (row delta, col delta); zero for pseudo-directions
    pub fn offset(&self) -> (i32, i32) {
        match self {
            MoveDirection::Up => (-1, 0),
            MoveDirection::Left => (0, -1),
            MoveDirection::Down => (1, 0),
            MoveDirection::Right => (0, 1),
            MoveDirection::Secret | MoveDirection::Door => (0, 0),
        }
    }

    /// Translate a coordinate one step in this direction
    pub fn translate(&self, coord: Coord) -> Coord {
        let (dr, dc) = self.offset();
        Coord::new(coord.row + dr, coord.col + dc)
    }

    /// The opposite cardinal direction; pseudo-directions have none
    pub fn reverse(&self) -> Option<MoveDirection> {
        match self {
            MoveDirection::Up => Some(MoveDirection::Down),
            MoveDirection::Left => Some(MoveDirection::Right),
            MoveDirection::Down => Some(MoveDirection::Up),
            MoveDirection::Right => Some(MoveDirection::Left),
            MoveDirection::Secret | MoveDirection::Door => None,
        }
    }

    /// Whether this is one of the four cardinal directions
    pub fn is_cardinal(&self) -> bool {
        !matches!(self, MoveDirection::Secret | MoveDirection::Door)
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            MoveDirection::Up => "up",
            MoveDirection::Left => "left",
            MoveDirection::Down => "down",
            MoveDirection::Right => "right",
            MoveDirection::Secret => "secret",
            MoveDirection::Door => "door",
        };
        f.write_str(word)
    }
}

/// Error returned when a direction word cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for MoveDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(MoveDirection::Up),
            "left" => Ok(MoveDirection::Left),
            "down" => Ok(MoveDirection::Down),
            "right" => Ok(MoveDirection::Right),
            "secret" => Ok(MoveDirection::Secret),
            "door" => Ok(MoveDirection::Door),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// One element of a move sequence: a direction and a step count.
///
/// For `Door` the length is the positional door index instead of a step
/// count; for `Secret` it is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub direction: MoveDirection,
    pub length: u32,
}

impl Move {
    /// Create a new move
    pub const fn new(direction: MoveDirection, length: u32) -> Self {
        Self { direction, length }
    }
}

/// One parsed grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Traversable corridor cell; each step onto one costs one roll point
    Hallway,
    /// Non-traversable cell outside every room
    Wall,
    /// Room interior; never walked on, used only to display in-room tokens
    Interior(Room),
    /// Room threshold; stepping onto it ends movement inside the room
    Door(Room),
}

/// Where a suspect token currently is.
///
/// The engine tracks no sub-cell position inside rooms; a token is either
/// on a hallway coordinate or simply "in" a room. Never a door or wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Hallway(Coord),
    Room(Room),
}

impl Position {
    /// The room, if inside one
    pub fn room(&self) -> Option<Room> {
        match self {
            Position::Room(r) => Some(*r),
            Position::Hallway(_) => None,
        }
    }

    /// The hallway coordinate, if on one
    pub fn coord(&self) -> Option<Coord> {
        match self {
            Position::Hallway(c) => Some(*c),
            Position::Room(_) => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Hallway(c) => write!(f, "at {}", c),
            Position::Room(r) => write!(f, "in the {}", r),
        }
    }
}

/// Errors raised while building a board. Fatal: a game never starts on a
/// malformed grid, and no mid-game operation can produce one.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardError {
    #[error("board grid is empty")]
    Empty,

    #[error("board row {row} has {len} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("starting position for {0} at {1} is not a hallway cell")]
    BadStartingPosition(Suspect, Coord),
}

/// Errors raised by the movement validator. All are recoverable input
/// errors: the position map is untouched and the same move may be retried
/// corrected.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveError {
    #[error("{0} is not in this game")]
    UnknownPlayer(Suspect),

    #[error("must have at least one move")]
    EmptySequence,

    #[error("'secret' must be the only move")]
    SecretNotAlone,

    #[error("this room does not have a secret passage")]
    NoSecretPassage,

    #[error("must roll out of the door afterwards")]
    DoorNeedsFollowUp,

    #[error("this room does not have that many doors")]
    NoSuchDoor,

    #[error("must start with 'secret' or 'door' while in a room")]
    MustUseDoorOrSecret,

    #[error("moves after leaving a room must be cardinal steps of at least one space")]
    InvalidStep,

    #[error("illegal move into a room")]
    IllegalEntrance,

    #[error("cannot reenter the room just exited")]
    ReenterJustExited,

    #[error("too many moves for this roll")]
    RollExceeded,

    #[error("illegal move into another player's position")]
    PositionOccupied,

    #[error("illegal move into a room interior")]
    IntoRoomInterior,

    #[error("illegal move out of bounds")]
    OutOfBounds,

    #[error("roll not fully used up")]
    RollNotUsed,
}

/// The parsed game board.
///
/// Built once per game; the only field that changes afterwards is the
/// player position map, and only at a move's single commit point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    grid: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
    /// Door coordinates per room, in row-major scan order
    doors: HashMap<Room, Vec<Coord>>,
    /// Hallway cells immediately outside each room's doors
    blocking: HashMap<Room, HashSet<Coord>>,
    /// Interior cells per room, for token display placement
    interiors: HashMap<Room, Vec<Coord>>,
    secret_passages: HashMap<Room, Room>,
    /// (room, direction of travel) pairs that may not enter that room's doors
    entrance_exceptions: HashSet<(Room, MoveDirection)>,
    positions: HashMap<Suspect, Position>,
}

/// The classic 25x24 board. `1`-`9`/`A`-`I` follow the canonical room
/// order; `x` is a wall, `0` a hallway cell.
const STANDARD_GRID: &str = "\
AAAAAAA00BBBBBB00CCCCCCC
AAAAAAA00BBBBBB00CCCCCCC
AAAAAAA00BBBBBB00CCCCCCC
AAAAAA100BBBBBB00CCCCCCC
0000000002BBBBB00CCCCCCC
000000000BBBBBB003CCCCCC
DD4DDD000BB22BB000000000
DDDDDD000000000000000000
DDDDD4000000000000000000
DDDDDD000xxxxxx0F6FFFFFF
DDDDDD000xxxxxx0FFFFFFFF
000000000xxxxxx0FFFFFFFF
E5EEEE000xxxxxx06FFFFFFF
EEEEEE000xxxxxx0FFFFFFFF
EEEEE5000xxxxxx0FFFFFFFF
EEEEEE000xxxxxx0FFFFFFFF
EEEEEE000000000000000000
000000000000000000000000
00000000H8HHHH8H00I9IIII
GGGG7000HHHHHHHH00IIIIII
GGGGG0008HHHHHH800IIIIII
GGGGG000HHHHHHHH00IIIIII
GGGGG000HHHHHHHH00IIIIII
GGGGG000HHHHHHHH00IIIIII
GGGGG0000000000000IIIIII";

impl Board {
    /// Parse a textual grid into a board.
    ///
    /// `starting_positions` seeds the player position map; every entry must
    /// name a hallway cell. `secret_passages` is directional: supply both
    /// directions for a two-way passage. `entrance_exceptions` lists
    /// (room, direction-of-travel) pairs that may not step onto that room's
    /// doors; the matching outside cells are also left out of the room's
    /// blocking set.
    pub fn parse(
        text: &str,
        starting_positions: HashMap<Suspect, Coord>,
        secret_passages: HashMap<Room, Room>,
        entrance_exceptions: HashSet<(Room, MoveDirection)>,
    ) -> Result<Self, BoardError> {
        let grid: Vec<Vec<Cell>> = text
            .lines()
            .map(|line| line.chars().map(Self::parse_cell).collect())
            .collect();

        let rows = grid.len();
        if rows == 0 {
            return Err(BoardError::Empty);
        }
        let cols = grid[0].len();
        if cols == 0 {
            return Err(BoardError::Empty);
        }
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != cols {
                return Err(BoardError::RaggedGrid {
                    row,
                    len: cells.len(),
                    expected: cols,
                });
            }
        }

        let mut board = Self {
            grid,
            rows,
            cols,
            doors: Room::ALL.iter().map(|r| (*r, Vec::new())).collect(),
            blocking: Room::ALL.iter().map(|r| (*r, HashSet::new())).collect(),
            interiors: Room::ALL.iter().map(|r| (*r, Vec::new())).collect(),
            secret_passages,
            entrance_exceptions,
            positions: HashMap::new(),
        };

        for row in 0..rows {
            for col in 0..cols {
                let coord = Coord::new(row as i32, col as i32);
                match board.grid[row][col] {
                    Cell::Door(room) => {
                        board.doors.entry(room).or_default().push(coord);
                        for dir in MoveDirection::CARDINAL {
                            let outside = dir.translate(coord);
                            let into_door = match dir.reverse() {
                                Some(d) => d,
                                None => continue,
                            };
                            if board.cell(outside) == Some(Cell::Hallway)
                                && !board.entrance_exceptions.contains(&(room, into_door))
                            {
                                board.blocking.entry(room).or_default().insert(outside);
                            }
                        }
                    }
                    Cell::Interior(room) => {
                        board.interiors.entry(room).or_default().push(coord);
                    }
                    Cell::Hallway | Cell::Wall => {}
                }
            }
        }

        for (suspect, coord) in starting_positions {
            if board.cell(coord) != Some(Cell::Hallway) {
                return Err(BoardError::BadStartingPosition(suspect, coord));
            }
            board.positions.insert(suspect, Position::Hallway(coord));
        }

        Ok(board)
    }

    fn parse_cell(c: char) -> Cell {
        match c {
            '0' | ' ' => Cell::Hallway,
            '1'..='9' => match Room::from_id(c as u8 - b'0') {
                Some(room) => Cell::Door(room),
                None => Cell::Wall,
            },
            'A'..='I' => match Room::from_letter(c) {
                Some(room) => Cell::Interior(room),
                None => Cell::Wall,
            },
            _ => Cell::Wall,
        }
    }

    /// The classic board, with tokens for the given suspects on their
    /// fixed starting cells.
    pub fn standard(players: &HashSet<Suspect>) -> Self {
        let mut starting = HashMap::from([
            (Suspect::Scarlet, Coord::new(0, 16)),
            (Suspect::Mustard, Coord::new(7, 23)),
            (Suspect::White, Coord::new(24, 14)),
            (Suspect::Green, Coord::new(24, 9)),
            (Suspect::Peacock, Coord::new(18, 0)),
            (Suspect::Plum, Coord::new(5, 0)),
        ]);
        starting.retain(|s, _| players.contains(s));

        let secret_passages = HashMap::from([
            (Room::Study, Room::Kitchen),
            (Room::Kitchen, Room::Study),
            (Room::Lounge, Room::Conservatory),
            (Room::Conservatory, Room::Lounge),
        ]);

        // Twin-approach doors that can only be entered from one side
        let entrance_exceptions = HashSet::from([
            (Room::Study, MoveDirection::Left),
            (Room::Lounge, MoveDirection::Right),
            (Room::Conservatory, MoveDirection::Down),
        ]);

        Self::parse(STANDARD_GRID, starting, secret_passages, entrance_exceptions)
            .expect("standard board layout is valid")
    }

    /// Grid height
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid width
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cell at a coordinate, or None when out of bounds
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        if coord.row < 0 || coord.col < 0 {
            return None;
        }
        self.grid
            .get(coord.row as usize)
            .and_then(|row| row.get(coord.col as usize))
            .copied()
    }

    /// A room's doors, in scan order (door "A" first)
    pub fn doors(&self, room: Room) -> &[Coord] {
        self.doors.get(&room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The hallway cells immediately outside a room's doors
    pub fn blocking_cells(&self, room: Room) -> &HashSet<Coord> {
        // Every room key is seeded at construction.
        self.blocking
            .get(&room)
            .expect("blocking sets exist for every room")
    }

    /// Where the room's secret passage leads, if it has one
    pub fn secret_target(&self, room: Room) -> Option<Room> {
        self.secret_passages.get(&room).copied()
    }

    /// All current player positions
    pub fn positions(&self) -> &HashMap<Suspect, Position> {
        &self.positions
    }

    /// A player's current position
    pub fn position(&self, player: Suspect) -> Option<Position> {
        self.positions.get(&player).copied()
    }

    /// Overwrite a token's position.
    ///
    /// Setup/testing seam; gameplay mutations go through `move_token`,
    /// suggestion teleports and elimination.
    pub fn set_position(&mut self, player: Suspect, position: Position) {
        self.positions.insert(player, position);
    }

    /// Move a suspect into a room without a dice roll (suggestion teleport)
    pub(crate) fn teleport_to_room(&mut self, player: Suspect, room: Room) {
        if self.positions.contains_key(&player) {
            self.positions.insert(player, Position::Room(room));
        }
    }

    /// Remove a token from the board (elimination)
    pub(crate) fn remove_token(&mut self, player: Suspect) -> Option<Position> {
        self.positions.remove(&player)
    }

    /// True iff every hallway cell outside the room's doors is occupied by
    /// some player, i.e. the room cannot be exited by rolling.
    pub fn is_blocked(&self, room: Room) -> bool {
        let occupied: HashSet<Coord> = self
            .positions
            .values()
            .filter_map(Position::coord)
            .collect();
        self.blocking
            .get(&room)
            .map(|cells| cells.is_subset(&occupied))
            .unwrap_or(false)
    }

    /// Validate and apply one move action for `player` with the given roll
    /// budget.
    ///
    /// Returns the entered room, or None for a hallway destination. The
    /// position map is only written at the single commit point (secret
    /// passage, door entry, or end-of-sequence hallway cell); any error
    /// leaves it untouched.
    pub fn move_token(
        &mut self,
        player: Suspect,
        roll: u32,
        moves: &[Move],
    ) -> Result<Option<Room>, MoveError> {
        let start = self
            .position(player)
            .ok_or(MoveError::UnknownPlayer(player))?;
        if moves.is_empty() {
            return Err(MoveError::EmptySequence);
        }

        let (mut at, steps, exited_room) = match start {
            Position::Room(room) => match moves[0].direction {
                MoveDirection::Secret => {
                    if moves.len() > 1 {
                        return Err(MoveError::SecretNotAlone);
                    }
                    let target = self
                        .secret_target(room)
                        .ok_or(MoveError::NoSecretPassage)?;
                    self.positions.insert(player, Position::Room(target));
                    return Ok(Some(target));
                }
                MoveDirection::Door => {
                    if moves.len() == 1 {
                        return Err(MoveError::DoorNeedsFollowUp);
                    }
                    let door = *self
                        .doors(room)
                        .get(moves[0].length as usize)
                        .ok_or(MoveError::NoSuchDoor)?;
                    (door, &moves[1..], Some(room))
                }
                _ => return Err(MoveError::MustUseDoorOrSecret),
            },
            Position::Hallway(coord) => (coord, moves, None),
        };

        if steps
            .iter()
            .any(|m| !m.direction.is_cardinal() || m.length == 0)
        {
            return Err(MoveError::InvalidStep);
        }

        let occupied: HashSet<Coord> = self
            .positions
            .iter()
            .filter(|(other, _)| **other != player)
            .filter_map(|(_, p)| p.coord())
            .collect();

        let mut budget = roll;
        for m in steps {
            for _ in 0..m.length {
                at = m.direction.translate(at);
                match self.cell(at) {
                    Some(Cell::Door(room)) => {
                        if self.entrance_exceptions.contains(&(room, m.direction)) {
                            return Err(MoveError::IllegalEntrance);
                        }
                        if exited_room == Some(room) {
                            return Err(MoveError::ReenterJustExited);
                        }
                        // Entering a room ends the move; leftover budget and
                        // queued steps are discarded.
                        self.positions.insert(player, Position::Room(room));
                        return Ok(Some(room));
                    }
                    Some(Cell::Hallway) => {
                        if budget == 0 {
                            return Err(MoveError::RollExceeded);
                        }
                        budget -= 1;
                        if occupied.contains(&at) {
                            return Err(MoveError::PositionOccupied);
                        }
                    }
                    Some(Cell::Interior(_)) => return Err(MoveError::IntoRoomInterior),
                    Some(Cell::Wall) | None => return Err(MoveError::OutOfBounds),
                }
            }
        }

        if budget > 0 {
            return Err(MoveError::RollNotUsed);
        }
        self.positions.insert(player, Position::Hallway(at));
        Ok(None)
    }

    /// Text view of the grid with suspect tokens overlaid.
    ///
    /// In-room tokens are placed on randomly sampled distinct interior
    /// cells, mirroring how the physical board scatters tokens in a room.
    pub fn render<R: Rng>(&self, rng: &mut R) -> String {
        let mut tokens: HashMap<Coord, Suspect> = HashMap::new();
        let mut by_room: HashMap<Room, Vec<Suspect>> = HashMap::new();

        for (suspect, position) in &self.positions {
            match position {
                Position::Hallway(coord) => {
                    tokens.insert(*coord, *suspect);
                }
                Position::Room(room) => by_room.entry(*room).or_default().push(*suspect),
            }
        }

        for (room, mut suspects) in by_room {
            suspects.sort();
            let cells = self.interiors.get(&room).map(Vec::as_slice).unwrap_or(&[]);
            for (coord, suspect) in cells
                .choose_multiple(rng, suspects.len())
                .zip(suspects.iter())
            {
                tokens.insert(*coord, *suspect);
            }
        }

        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let coord = Coord::new(row as i32, col as i32);
                if let Some(suspect) = tokens.get(&coord) {
                    out.push(suspect.token());
                } else {
                    out.push(match self.grid[row][col] {
                        Cell::Hallway => '0',
                        Cell::Wall => 'x',
                        Cell::Interior(room) => room.letter(),
                        Cell::Door(room) => (b'0' + room.id()) as char,
                    });
                }
            }
            if row + 1 < self.rows {
                out.push('\n');
            }
        }
        out
    }
}
