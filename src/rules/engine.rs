use std::collections::HashSet;
use std::fmt::Display;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::rules::definitions::{MoveError, MoveResult, SetupError, SnapshotError};
use crate::rules::utils::{all_positions, Position, BOARD_WIDTH};

/// Rows filled per side by the standard starting layout.
pub const SETUP_ROWS: u8 = 3;

#[derive(PartialEq, Eq, Hash, Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /** Row where a man of this colour is crowned. */
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => BOARD_WIDTH - 1,
            Color::Black => 0,
        }
    }
}

impl TryFrom<char> for Color {
    type Error = SetupError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            other => Err(SetupError::UnknownColor(other)),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(if self == &Self::White {
            "White"
        } else {
            "Black"
        })
    }
}

/// Index of a piece in the board's arena. Stable for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u16);

impl PieceId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    piece: Option<PieceId>,
}

impl Cell {
    pub fn new(position: Position) -> Cell {
        Cell {
            position,
            piece: None,
        }
    }

    pub fn x(&self) -> u8 {
        self.position.x()
    }

    pub fn y(&self) -> u8 {
        self.position.y()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn piece(&self) -> Option<PieceId> {
        self.piece
    }

    /** Does not detach `piece` from the cell it was on before. */
    pub fn set_piece(&mut self, piece: Option<PieceId>) {
        self.piece = piece;
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckersPiece {
    id: PieceId,
    color: Color,
    king: bool,
    captured: bool,
    /// Mirror of the cell that holds this piece, kept in sync by `Move::execute`.
    position: Option<Position>,
}

const MAN_WHITE: &[i8] = &[1];
const MAN_BLACK: &[i8] = &[-1];
const KING: &[i8] = &[1, -1];

impl CheckersPiece {
    fn new(id: PieceId, color: Color, position: Position) -> CheckersPiece {
        CheckersPiece {
            id,
            color,
            king: false,
            captured: false,
            position: Some(position),
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_king(&self) -> bool {
        self.king
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    fn directions(&self) -> &'static [i8] {
        match (self.king, self.color) {
            (true, _) => KING,
            (false, Color::White) => MAN_WHITE,
            (false, Color::Black) => MAN_BLACK,
        }
    }

    /// Diagonal steps onto empty squares and jumps over any neighbouring piece,
    /// whatever its colour, onto an empty landing square.
    pub fn available_moves(&self, board: &Board) -> HashSet<Move> {
        let mut moves = HashSet::new();
        let origin = match self.position {
            Some(position) if !self.captured => position,
            _ => return moves,
        };
        for &dy in self.directions() {
            for dx in [-1, 1] {
                let Some(adjacent) = origin.offset(dx, dy) else {
                    continue;
                };
                match board.cell_at(adjacent).piece() {
                    None => {
                        moves.insert(Move::to(adjacent, None));
                    }
                    Some(jumped) => {
                        if let Some(landing) = adjacent.offset(dx, dy) {
                            if board.cell_at(landing).is_empty() {
                                moves.insert(Move::to(landing, Some(jumped)));
                            }
                        }
                    }
                }
            }
        }
        trace!("{} piece {} at {}: {} moves", self.color, self.id, origin, moves.len());
        moves
    }

    /** Crown the piece if it stands on its promotion row. Returns `true` on promotion. */
    pub fn check_promotion(&mut self) -> bool {
        if self.king || self.captured {
            return false;
        }
        match self.position {
            Some(position) if position.y() == self.color.promotion_row() => {
                self.king = true;
                debug!("{} piece {} crowned at {}", self.color, self.id, position);
                true
            }
            _ => false,
        }
    }
}

/// Destination plus the piece jumped on the way, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    destination: Position,
    captured: Option<PieceId>,
}

impl Move {
    pub fn new(destination: &Cell, captured: Option<PieceId>) -> Move {
        Move::to(destination.position(), captured)
    }

    pub fn to(destination: Position, captured: Option<PieceId>) -> Move {
        Move {
            destination,
            captured,
        }
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn captured(&self) -> Option<PieceId> {
        self.captured
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Relocate `mover` and remove the captured piece as one update.
    ///
    /// Nothing is touched unless the whole move checks out, so a rejected move
    /// (including a second execution of the same move) leaves the board as it was.
    pub fn execute(&self, board: &mut Board, mover: PieceId) -> MoveResult<()> {
        let origin = self.validate(board, mover)?;
        if let Some(captured) = self.captured {
            board.remove(captured);
            debug!("Piece {} captured by {}", captured, mover);
        }
        board.relocate(mover, origin, self.destination);
        debug!("Piece {} moved {} -> {}", mover, origin, self.destination);
        Ok(())
    }

    fn validate(&self, board: &Board, mover: PieceId) -> MoveResult<Position> {
        let origin = board.locate(mover)?;
        let destination = self.destination;
        if !board.cell_at(destination).is_empty() {
            return Err(MoveError::DestinationOccupied(destination));
        }
        match self.captured {
            None => {
                if origin.diagonal_distance(destination) != Some(1) {
                    return Err(MoveError::NotDiagonalStep {
                        from: origin,
                        to: destination,
                    });
                }
            }
            Some(captured) => {
                let middle = origin
                    .between(destination)
                    .ok_or(MoveError::NotDiagonalJump {
                        from: origin,
                        to: destination,
                    })?;
                if board.locate(captured)? != middle {
                    return Err(MoveError::CapturedNotBetween {
                        piece: captured,
                        from: origin,
                        to: destination,
                    });
                }
            }
        }
        Ok(origin)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.captured {
            Some(captured) => write!(f, "x{} -> {}", captured, self.destination),
            None => write!(f, "-> {}", self.destination),
        }
    }
}

/** 8x8 grid of cells, indexed `[y][x]`, plus every piece ever placed. */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_WIDTH as usize]; BOARD_WIDTH as usize],
    pieces: Vec<CheckersPiece>,
}

impl Board {
    /// Empty board.
    pub fn new() -> Board {
        Board {
            cells: std::array::from_fn(|y| {
                std::array::from_fn(|x| Cell::new(Position::at(x as u8, y as u8)))
            }),
            pieces: Vec::new(),
        }
    }

    /// Dark squares of the first `rows` rows on each side. White starts on row 0.
    pub fn with_setup_rows(rows: u8) -> Result<Board, SetupError> {
        if !(1..=SETUP_ROWS).contains(&rows) {
            return Err(SetupError::InvalidRows(rows));
        }
        Ok(Board::setup(rows))
    }

    fn setup(rows: u8) -> Board {
        let mut board = Board::new();
        let mut next = 0u16;
        for position in all_positions().filter(Position::is_dark) {
            let color = if position.y() < rows {
                Color::White
            } else if position.y() >= BOARD_WIDTH - rows {
                Color::Black
            } else {
                continue;
            };
            board.spawn(PieceId(next), position, color);
            next += 1;
        }
        board
    }

    pub fn place(&mut self, x: u8, y: u8, color: Color) -> Result<PieceId, SetupError> {
        let position = Position::new(x, y).ok_or(SetupError::OutOfBounds { x, y })?;
        if !self.cell_at(position).is_empty() {
            return Err(SetupError::Occupied(position));
        }
        // Captured pieces keep their slot, so the arena only grows.
        let id = u16::try_from(self.pieces.len())
            .map(PieceId)
            .map_err(|_| SetupError::TooManyPieces)?;
        Ok(self.spawn(id, position, color))
    }

    fn spawn(&mut self, id: PieceId, position: Position, color: Color) -> PieceId {
        self.pieces.push(CheckersPiece::new(id, color, position));
        self.cell_mut(position).set_piece(Some(id));
        id
    }

    pub fn cell(&self, x: u8, y: u8) -> Option<&Cell> {
        Position::new(x, y).map(|position| self.cell_at(position))
    }

    pub fn cell_at(&self, position: Position) -> &Cell {
        &self.cells[position.y() as usize][position.x() as usize]
    }

    fn cell_mut(&mut self, position: Position) -> &mut Cell {
        &mut self.cells[position.y() as usize][position.x() as usize]
    }

    pub fn piece(&self, id: PieceId) -> Option<&CheckersPiece> {
        self.pieces.get(id.index())
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut CheckersPiece> {
        self.pieces.get_mut(id.index())
    }

    pub fn piece_at(&self, x: u8, y: u8) -> Option<&CheckersPiece> {
        self.cell(x, y)?.piece().and_then(|id| self.piece(id))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &CheckersPiece> {
        self.pieces.iter()
    }

    pub fn active_pieces(&self, color: Color) -> impl Iterator<Item = &CheckersPiece> {
        self.pieces
            .iter()
            .filter(move |piece| !piece.captured && piece.color == color)
    }

    pub fn available_moves(&self, id: PieceId) -> MoveResult<HashSet<Move>> {
        self.piece(id)
            .map(|piece| piece.available_moves(self))
            .ok_or(MoveError::UnknownPiece(id))
    }

    pub fn has_moves(&self, color: Color) -> bool {
        self.active_pieces(color)
            .any(|piece| !piece.available_moves(self).is_empty())
    }

    pub fn check_promotion(&mut self, id: PieceId) -> MoveResult<bool> {
        self.piece_mut(id)
            .map(CheckersPiece::check_promotion)
            .ok_or(MoveError::UnknownPiece(id))
    }

    fn locate(&self, id: PieceId) -> MoveResult<Position> {
        let piece = self.piece(id).ok_or(MoveError::UnknownPiece(id))?;
        if piece.captured {
            return Err(MoveError::PieceCaptured(id));
        }
        piece.position.ok_or(MoveError::PieceOffBoard(id))
    }

    // Callers validate first; see `Move::validate`.
    fn remove(&mut self, id: PieceId) {
        let piece = &mut self.pieces[id.index()];
        piece.captured = true;
        if let Some(position) = piece.position.take() {
            self.cell_mut(position).set_piece(None);
        }
    }

    fn relocate(&mut self, id: PieceId, from: Position, to: Position) {
        self.cell_mut(from).set_piece(None);
        self.cell_mut(to).set_piece(Some(id));
        self.pieces[id.index()].position = Some(to);
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Board, SnapshotError> {
        let board: Board = postcard::from_bytes(bytes)?;
        board.check_consistency()?;
        Ok(board)
    }

    /** Grid occupancy and piece positions must describe the same layout. */
    fn check_consistency(&self) -> Result<(), SnapshotError> {
        let inconsistent = |msg: String| Err(SnapshotError::Inconsistent(msg));
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.position != Position::at(x as u8, y as u8) {
                    return inconsistent(format!(
                        "cell at ({x}, {y}) claims ({}, {})",
                        cell.x(),
                        cell.y()
                    ));
                }
            }
        }
        for (idx, piece) in self.pieces.iter().enumerate() {
            if piece.id.index() != idx {
                return inconsistent(format!("piece {} stored at slot {idx}", piece.id));
            }
            match (piece.captured, piece.position) {
                (true, None) => {}
                (true, Some(position)) => {
                    return inconsistent(format!("captured piece {} still at {position}", piece.id))
                }
                (false, None) => return inconsistent(format!("piece {} has no square", piece.id)),
                (false, Some(position)) => {
                    if self.cell_at(position).piece != Some(piece.id) {
                        return inconsistent(format!("square {position} does not hold {}", piece.id));
                    }
                }
            }
        }
        let occupied = self.cells().filter(|cell| !cell.is_empty()).count();
        let active = self.pieces.iter().filter(|piece| !piece.captured).count();
        if occupied != active {
            return inconsistent(format!("{occupied} occupied squares for {active} pieces"));
        }
        Ok(())
    }
}

impl Default for Board {
    /// Standard starting layout.
    fn default() -> Self {
        Board::setup(SETUP_ROWS)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (y, row) in self.cells.iter().enumerate() {
            write!(f, "{}", y + 1)?;
            for cell in row {
                let symbol = match cell.piece.and_then(|id| self.piece(id)) {
                    None => '.',
                    Some(piece) => match (piece.color, piece.king) {
                        (Color::White, false) => 'w',
                        (Color::White, true) => 'W',
                        (Color::Black, false) => 'b',
                        (Color::Black, true) => 'B',
                    },
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
