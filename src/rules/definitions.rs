use std::collections::HashSet;

use thiserror::Error;

use crate::rules::engine::{Color, Move, PieceId};
use crate::rules::utils::Position;

/// Square as seen by a renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub color: Color,
    pub king: bool,
    pub can_move: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellView {
    Empty,
    Figure(Figure),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameState {
    PlayerMove(Color),
    Finished { winner: Option<Color> },
}

/// Caller contract violations detected before a move touches the board.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    #[error("No piece with id {0}")]
    UnknownPiece(PieceId),

    #[error("Piece {0} is already captured")]
    PieceCaptured(PieceId),

    #[error("Piece {0} is not on the board")]
    PieceOffBoard(PieceId),

    #[error("Destination {0} is occupied")]
    DestinationOccupied(Position),

    #[error("Step from {from} to {to} is not a single diagonal move")]
    NotDiagonalStep { from: Position, to: Position },

    #[error("Jump from {from} to {to} does not span two diagonal squares")]
    NotDiagonalJump { from: Position, to: Position },

    #[error("Piece {piece} is not between {from} and {to}")]
    CapturedNotBetween {
        piece: PieceId,
        from: Position,
        to: Position,
    },

    #[error("No piece at ({x}, {y})")]
    EmptyCell { x: u8, y: u8 },

    #[error("Piece {piece} belongs to {owner}, but {player} is to move")]
    NotYourPiece {
        piece: PieceId,
        owner: Color,
        player: Color,
    },

    #[error("Move to {0} is not available")]
    NotAvailable(Position),

    #[error("Game is already finished")]
    GameFinished,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("Square ({x}, {y}) is outside the board")]
    OutOfBounds { x: u8, y: u8 },

    #[error("Square {0} is already occupied")]
    Occupied(Position),

    #[error("Setup rows must be within 1..=3, got {0}")]
    InvalidRows(u8),

    #[error("Unknown piece colour {0:?}")]
    UnknownColor(char),

    #[error("Board already holds the maximum number of pieces")]
    TooManyPieces,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot codec error: {0}")]
    Codec(#[from] postcard::Error),

    #[error("Inconsistent snapshot: {0}")]
    Inconsistent(String),
}

pub type MoveResult<T> = Result<T, MoveError>;

pub trait MatchInterface {
    fn current_board(&self) -> Vec<Vec<CellView>>;
    fn cell(&self, x: u8, y: u8) -> Option<CellView>;
    fn possible_moves(&self, x: u8, y: u8) -> Option<HashSet<Move>>;
    fn execute_move(&mut self, x: u8, y: u8, _move: Move) -> MoveResult<GameState>;
    // info
    fn current_player(&self) -> Color;
    fn game_ended(&self) -> bool;
}
