pub mod quit;
pub mod rules;

// module re-exports
pub use rules::definitions::{
    CellView, Figure, GameState, MatchInterface, MoveError, SetupError, SnapshotError,
};
pub use rules::engine::{Board, Cell, CheckersPiece, Color, Move, PieceId};
pub use rules::game::Game;
