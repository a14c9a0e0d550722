use std::collections::HashSet;

use log::{debug, info, warn};

use crate::rules::definitions::{
    CellView, Figure, GameState, MatchInterface, MoveError, MoveResult,
};
use crate::rules::engine::{Board, Color, Move};

/// Row-major view of the board for renderers. `can_move` is only set for `player`'s pieces.
pub fn ui_board(board: &Board, player: Color) -> Vec<Vec<CellView>> {
    let mut view: Vec<Vec<CellView>> = Vec::with_capacity(8);
    for cell in board.cells() {
        if cell.x() == 0 {
            view.push(Vec::with_capacity(8));
        }
        let figure = cell
            .piece()
            .and_then(|id| board.piece(id))
            .map(|piece| {
                CellView::Figure(Figure {
                    color: piece.color(),
                    king: piece.is_king(),
                    can_move: piece.color() == player && !piece.available_moves(board).is_empty(),
                })
            })
            .unwrap_or(CellView::Empty);
        if let Some(row) = view.last_mut() {
            row.push(figure);
        }
    }
    view
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current_player: Color,
    finished: bool,
    winner: Option<Color>,
}

impl Game {
    pub fn new(board: Board) -> Game {
        Game::with_player(board, Color::White)
    }

    pub fn with_player(board: Board, player: Color) -> Game {
        let mut game = Game {
            board,
            current_player: player,
            finished: false,
            winner: None,
        };
        game.update_state();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn state(&self) -> GameState {
        if self.finished {
            GameState::Finished {
                winner: self.winner,
            }
        } else {
            GameState::PlayerMove(self.current_player)
        }
    }

    /** The side to move loses once it has nothing left to play. */
    fn update_state(&mut self) {
        if self.board.has_moves(self.current_player) {
            return;
        }
        let opponent = self.current_player.opposite();
        self.finished = true;
        self.winner = self
            .board
            .active_pieces(opponent)
            .next()
            .map(|_| opponent);
        info!("Game finished, winner: {:?}", self.winner);
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Default::default())
    }
}

impl MatchInterface for Game {
    fn current_board(&self) -> Vec<Vec<CellView>> {
        ui_board(&self.board, self.current_player)
    }

    fn cell(&self, x: u8, y: u8) -> Option<CellView> {
        let cell = self.board.cell(x, y)?;
        Some(match cell.piece().and_then(|id| self.board.piece(id)) {
            None => CellView::Empty,
            Some(piece) => CellView::Figure(Figure {
                color: piece.color(),
                king: piece.is_king(),
                can_move: !self.finished
                    && piece.color() == self.current_player
                    && !piece.available_moves(&self.board).is_empty(),
            }),
        })
    }

    fn possible_moves(&self, x: u8, y: u8) -> Option<HashSet<Move>> {
        let piece = self.board.piece_at(x, y)?;
        if self.finished || piece.color() != self.current_player {
            None
        } else {
            Some(piece.available_moves(&self.board))
        }
    }

    fn execute_move(&mut self, x: u8, y: u8, _move: Move) -> MoveResult<GameState> {
        if self.finished {
            return Err(MoveError::GameFinished);
        }
        let piece = self
            .board
            .piece_at(x, y)
            .ok_or(MoveError::EmptyCell { x, y })?;
        if piece.color() != self.current_player {
            return Err(MoveError::NotYourPiece {
                piece: piece.id(),
                owner: piece.color(),
                player: self.current_player,
            });
        }
        if !piece.available_moves(&self.board).contains(&_move) {
            warn!("Rejected move {} for piece {}", _move, piece.id());
            return Err(MoveError::NotAvailable(_move.destination()));
        }
        let mover = piece.id();
        _move.execute(&mut self.board, mover)?;
        self.board.check_promotion(mover)?;
        self.current_player = self.current_player.opposite();
        debug!("{} to move", self.current_player);
        self.update_state();
        Ok(self.state())
    }

    fn current_player(&self) -> Color {
        self.current_player
    }

    fn game_ended(&self) -> bool {
        self.finished
    }
}
