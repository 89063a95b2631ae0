//! Card sets and answer combinations.
//!
//! This module contains:
//! - The three disjoint card sets: suspects, weapons and rooms
//! - `Card`, the tagged union over all three sets
//! - `Scenario`, one (suspect, weapon, room) combination
//! - `Decks`, the owned card sets a game is constructed from

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a card name cannot be parsed from a command word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{input}'")]
pub struct ParseCardError {
    kind: &'static str,
    input: String,
}

impl ParseCardError {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

/// The six suspect cards.
///
/// Declaration order is the canonical board order: it fixes turn order,
/// starting positions and the token artwork index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Suspect {
    Scarlet,
    Mustard,
    White,
    Green,
    Peacock,
    Plum,
}

impl Suspect {
    /// All suspects in canonical board order
    pub const ALL: [Suspect; 6] = [
        Suspect::Scarlet,
        Suspect::Mustard,
        Suspect::White,
        Suspect::Green,
        Suspect::Peacock,
        Suspect::Plum,
    ];

    /// Printable card name
    pub fn name(&self) -> &'static str {
        match self {
            Suspect::Scarlet => "Ms. Scarlet",
            Suspect::Mustard => "Col. Mustard",
            Suspect::White => "Mrs. White",
            Suspect::Green => "Mr. Green",
            Suspect::Peacock => "Mrs. Peacock",
            Suspect::Plum => "Prof. Plum",
        }
    }

    /// Single-letter token used by the text board view. Lower case, so a
    /// token never collides with a room's interior letter.
    pub fn token(&self) -> char {
        match self {
            Suspect::Scarlet => 's',
            Suspect::Mustard => 'm',
            Suspect::White => 'w',
            Suspect::Green => 'g',
            Suspect::Peacock => 'p',
            Suspect::Plum => 'l',
        }
    }
}

impl fmt::Display for Suspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suspect {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scarlet" => Ok(Suspect::Scarlet),
            "mustard" => Ok(Suspect::Mustard),
            "white" => Ok(Suspect::White),
            "green" => Ok(Suspect::Green),
            "peacock" => Ok(Suspect::Peacock),
            "plum" => Ok(Suspect::Plum),
            _ => Err(ParseCardError::new("suspect", s)),
        }
    }
}

/// The six weapon cards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Weapon {
    Knife,
    Revolver,
    Pipe,
    Candlestick,
    Rope,
    Wrench,
}

impl Weapon {
    /// All weapons
    pub const ALL: [Weapon; 6] = [
        Weapon::Knife,
        Weapon::Revolver,
        Weapon::Pipe,
        Weapon::Candlestick,
        Weapon::Rope,
        Weapon::Wrench,
    ];

    /// Printable card name
    pub fn name(&self) -> &'static str {
        match self {
            Weapon::Knife => "Knife",
            Weapon::Revolver => "Revolver",
            Weapon::Pipe => "Lead Pipe",
            Weapon::Candlestick => "Candlestick",
            Weapon::Rope => "Rope",
            Weapon::Wrench => "Wrench",
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weapon {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "knife" => Ok(Weapon::Knife),
            "revolver" => Ok(Weapon::Revolver),
            "pipe" => Ok(Weapon::Pipe),
            "candlestick" => Ok(Weapon::Candlestick),
            "rope" => Ok(Weapon::Rope),
            "wrench" => Ok(Weapon::Wrench),
            _ => Err(ParseCardError::new("weapon", s)),
        }
    }
}

/// Room ambience, consumed only by flavor-text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ambience {
    Quiet,
    Stately,
}

/// The nine room cards.
///
/// Declaration order is canonical: it fixes each room's grid id (1-9) and
/// interior letter (A-I) used by the board text format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Room {
    Study,
    Hall,
    Lounge,
    Library,
    Billiard,
    Dining,
    Conservatory,
    Ballroom,
    Kitchen,
}

impl Room {
    /// All rooms in canonical order
    pub const ALL: [Room; 9] = [
        Room::Study,
        Room::Hall,
        Room::Lounge,
        Room::Library,
        Room::Billiard,
        Room::Dining,
        Room::Conservatory,
        Room::Ballroom,
        Room::Kitchen,
    ];

    /// Printable card name
    pub fn name(&self) -> &'static str {
        match self {
            Room::Study => "Study",
            Room::Hall => "Hall",
            Room::Lounge => "Lounge",
            Room::Library => "Library",
            Room::Billiard => "Billiard Room",
            Room::Dining => "Dining Room",
            Room::Conservatory => "Conservatory",
            Room::Ballroom => "Ballroom",
            Room::Kitchen => "Kitchen",
        }
    }

    /// Ambience category, flavor only
    pub fn ambience(&self) -> Ambience {
        match self {
            Room::Study | Room::Hall | Room::Billiard | Room::Dining | Room::Ballroom => {
                Ambience::Quiet
            }
            Room::Lounge | Room::Library | Room::Conservatory | Room::Kitchen => {
                Ambience::Stately
            }
        }
    }

    /// Numeric id used for door cells in the board text format (1-9)
    pub fn id(&self) -> u8 {
        Room::ALL.iter().position(|r| r == self).unwrap_or(0) as u8 + 1
    }

    /// Room for a door-cell digit
    pub fn from_id(id: u8) -> Option<Room> {
        match id {
            1..=9 => Some(Room::ALL[id as usize - 1]),
            _ => None,
        }
    }

    /// Interior letter used for room cells in the board text format (A-I)
    pub fn letter(&self) -> char {
        (b'A' + self.id() - 1) as char
    }

    /// Room for an interior-cell letter
    pub fn from_letter(letter: char) -> Option<Room> {
        match letter {
            'A'..='I' => Room::from_id(letter as u8 - b'A' + 1),
            _ => None,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Room {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "study" => Ok(Room::Study),
            "hall" => Ok(Room::Hall),
            "lounge" => Ok(Room::Lounge),
            "library" => Ok(Room::Library),
            "billiard" => Ok(Room::Billiard),
            "dining" => Ok(Room::Dining),
            "conservatory" => Ok(Room::Conservatory),
            // "ball" kept as the short command word for the Ballroom
            "ballroom" | "ball" => Ok(Room::Ballroom),
            "kitchen" => Ok(Room::Kitchen),
            _ => Err(ParseCardError::new("room", s)),
        }
    }
}

/// Any card from any of the three sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Suspect(Suspect),
    Weapon(Weapon),
    Room(Room),
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suspect(s) => s.fmt(f),
            Card::Weapon(w) => w.fmt(f),
            Card::Room(r) => r.fmt(f),
        }
    }
}

impl From<Suspect> for Card {
    fn from(s: Suspect) -> Self {
        Card::Suspect(s)
    }
}

impl From<Weapon> for Card {
    fn from(w: Weapon) -> Self {
        Card::Weapon(w)
    }
}

impl From<Room> for Card {
    fn from(r: Room) -> Self {
        Card::Room(r)
    }
}

/// One who/what/where combination.
///
/// Used for the hidden answer, the zipped answer pool, and the payload of
/// suggestions and accusations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: Room,
}

impl Scenario {
    /// Create a new scenario
    pub const fn new(suspect: Suspect, weapon: Weapon, room: Room) -> Self {
        Self {
            suspect,
            weapon,
            room,
        }
    }

    /// The three cards of this scenario, in suspect/weapon/room order
    pub fn cards(&self) -> [Card; 3] {
        [
            Card::Suspect(self.suspect),
            Card::Weapon(self.weapon),
            Card::Room(self.room),
        ]
    }

    /// Whether a card is part of this scenario
    pub fn contains(&self, card: Card) -> bool {
        self.cards().contains(&card)
    }

    /// The three unordered card pairs, in combination order
    pub fn pairs(&self) -> [(Card, Card); 3] {
        let [s, w, r] = self.cards();
        [(s, w), (s, r), (w, r)]
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} with the {} in the {}",
            self.suspect, self.weapon, self.room
        )
    }
}

/// The three card sets a game is built from.
///
/// Custom decks are allowed (e.g. trimmed sets for short games); the
/// standard decks are the full 6/6/9 card roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decks {
    pub suspects: Vec<Suspect>,
    pub weapons: Vec<Weapon>,
    pub rooms: Vec<Room>,
}

impl Decks {
    /// The standard full card sets
    pub fn standard() -> Self {
        Self {
            suspects: Suspect::ALL.to_vec(),
            weapons: Weapon::ALL.to_vec(),
            rooms: Room::ALL.to_vec(),
        }
    }

    /// Shuffle each set independently
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.suspects.shuffle(rng);
        self.weapons.shuffle(rng);
        self.rooms.shuffle(rng);
    }

    /// Every card of every set, in deck order
    pub fn all_cards(&self) -> Vec<Card> {
        self.suspects
            .iter()
            .copied()
            .map(Card::from)
            .chain(self.weapons.iter().copied().map(Card::from))
            .chain(self.rooms.iter().copied().map(Card::from))
            .collect()
    }
}

impl Default for Decks {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_room_ids_and_letters_round_trip() {
        for (i, room) in Room::ALL.iter().enumerate() {
            assert_eq!(room.id(), i as u8 + 1);
            assert_eq!(Room::from_id(room.id()), Some(*room));
            assert_eq!(Room::from_letter(room.letter()), Some(*room));
        }
        assert_eq!(Room::from_id(0), None);
        assert_eq!(Room::from_id(10), None);
        assert_eq!(Room::from_letter('J'), None);
    }

    #[test]
    fn test_card_names() {
        assert_eq!(Suspect::Scarlet.to_string(), "Ms. Scarlet");
        assert_eq!(Weapon::Pipe.to_string(), "Lead Pipe");
        assert_eq!(Room::Billiard.to_string(), "Billiard Room");
    }

    #[test]
    fn test_ambience_split() {
        assert_eq!(Room::Study.ambience(), Ambience::Quiet);
        assert_eq!(Room::Conservatory.ambience(), Ambience::Stately);
        let stately = Room::ALL
            .iter()
            .filter(|r| r.ambience() == Ambience::Stately)
            .count();
        assert_eq!(stately, 4);
    }

    #[test]
    fn test_parse_command_words() {
        assert_eq!("scarlet".parse::<Suspect>(), Ok(Suspect::Scarlet));
        assert_eq!("CANDLESTICK".parse::<Weapon>(), Ok(Weapon::Candlestick));
        assert_eq!("ballroom".parse::<Room>(), Ok(Room::Ballroom));
        assert_eq!("ball".parse::<Room>(), Ok(Room::Ballroom));
        assert!("poirot".parse::<Suspect>().is_err());
    }

    #[test]
    fn test_scenario_pairs_in_combination_order() {
        let scenario = Scenario::new(Suspect::Mustard, Weapon::Knife, Room::Study);
        let [sw, sr, wr] = scenario.pairs();
        assert_eq!(sw, (Card::from(Suspect::Mustard), Card::from(Weapon::Knife)));
        assert_eq!(sr, (Card::from(Suspect::Mustard), Card::from(Room::Study)));
        assert_eq!(wr, (Card::from(Weapon::Knife), Card::from(Room::Study)));
    }

    #[test]
    fn test_standard_decks_are_disjoint_and_complete() {
        let decks = Decks::standard();
        let cards = decks.all_cards();
        assert_eq!(cards.len(), 21);
        for (i, a) in cards.iter().enumerate() {
            for b in cards.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
