use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::rules::definitions::SetupError;

pub const BOARD_WIDTH: u8 = 8;

/// Coordinates of a board square. `x` is the file, `y` grows towards black's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    pub fn new(x: u8, y: u8) -> Option<Position> {
        if is_valid_coord(x as i16, y as i16) {
            Some(Position { x, y })
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn at(x: u8, y: u8) -> Position {
        debug_assert!(
            is_valid_coord(x as i16, y as i16),
            "Position ({x}, {y}) is outside the board!"
        );
        Position { x, y }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    /** Shift by `(dx, dy)`; `None` if the result leaves the board. */
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Position> {
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if is_valid_coord(x, y) {
            Some(Position {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    /// Playable squares of the starting layout.
    pub fn is_dark(&self) -> bool {
        (self.x + self.y) % 2 == 1
    }

    /** Number of steps between two squares on a common diagonal. */
    pub fn diagonal_distance(self, other: Position) -> Option<u8> {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx == dy && dx != 0 {
            Some(dx)
        } else {
            None
        }
    }

    /// Square jumped over when moving from `self` to `other`.
    pub fn between(self, other: Position) -> Option<Position> {
        match self.diagonal_distance(other) {
            Some(2) => Some(Position {
                x: (self.x + other.x) / 2,
                y: (self.y + other.y) / 2,
            }),
            _ => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        (self.y * BOARD_WIDTH + self.x) as usize
    }
}

impl TryFrom<(u8, u8)> for Position {
    type Error = SetupError;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        Position::new(x, y).ok_or(SetupError::OutOfBounds { x, y })
    }
}

impl From<Position> for (u8, u8) {
    fn from(value: Position) -> Self {
        (value.x, value.y)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(pos_to_str(*self))
    }
}

#[inline]
pub fn is_valid_coord(x: i16, y: i16) -> bool {
    (0..BOARD_WIDTH as i16).contains(&x) && (0..BOARD_WIDTH as i16).contains(&y)
}

/** Every square, row by row. */
pub fn all_positions() -> impl Iterator<Item = Position> {
    (0..BOARD_WIDTH).flat_map(|y| (0..BOARD_WIDTH).map(move |x| Position { x, y }))
}

#[rustfmt::skip]
const POS_TO_STRING: [&str; 64] = [
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2",
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3",
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5",
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6",
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7",
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8",
];

pub fn pos_to_str(pos: Position) -> &'static str {
    POS_TO_STRING[pos.index()]
}
