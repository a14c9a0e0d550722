use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use checkers_core::quit::{QuitEvent, QuitHandler, QuitResponse};
use checkers_core::rules::utils::Position;
use checkers_core::{Board, Game, GameState, MatchInterface};
use log::{debug, info};

const HELP: &str = "\
Commands:
  board                    print the board
  moves <x> <y>            list moves of the piece at (x, y)
  move <x> <y> <tx> <ty>   move the piece at (x, y) to (tx, ty)
  save <file>              write the board to a file
  load <file>              restart from a saved board
  help                     show this text
  quit                     leave";

struct App {
    game: Game,
    quit_armed: bool,
}

#[derive(Default)]
struct QuitDecision {
    quit: Option<bool>,
}

impl QuitResponse for QuitDecision {
    fn perform_quit(&mut self) {
        self.quit = Some(true);
    }

    fn cancel_quit(&mut self) {
        self.quit = Some(false);
    }
}

impl QuitHandler for App {
    fn handle_quit_request_with(&mut self, _event: QuitEvent, response: &mut dyn QuitResponse) {
        if self.game.game_ended() || self.quit_armed {
            response.perform_quit();
        } else {
            println!("Game in progress, type `quit` again to leave.");
            self.quit_armed = true;
            response.cancel_quit();
        }
    }
}

fn parse_coord(word: &str) -> Result<u8> {
    word.parse()
        .with_context(|| format!("`{word}` is not a coordinate"))
}

fn load_board(path: &str) -> Result<Board> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {path}"))?;
    Board::from_bytes(&bytes).with_context(|| format!("Failed to decode {path}"))
}

impl App {
    fn new(board: Board) -> App {
        App {
            game: Game::new(board),
            quit_armed: false,
        }
    }

    fn print_state(&self) {
        print!("{}", self.game.board());
        match self.game.state() {
            GameState::PlayerMove(color) => println!("{color} to move"),
            GameState::Finished { winner: Some(color) } => println!("{color} wins"),
            GameState::Finished { winner: None } => println!("Game over"),
        }
    }

    fn run_command(&mut self, words: &[&str]) -> Result<()> {
        match words {
            [] => {}
            ["board"] => self.print_state(),
            ["help"] => println!("{HELP}"),
            ["moves", x, y] => {
                let (x, y) = (parse_coord(x)?, parse_coord(y)?);
                let moves = self
                    .game
                    .possible_moves(x, y)
                    .ok_or_else(|| anyhow!("No movable piece of the player to move at ({x}, {y})"))?;
                let mut moves: Vec<_> = moves.into_iter().collect();
                moves.sort_by_key(|_move| (_move.destination().y(), _move.destination().x()));
                for _move in moves {
                    let target = _move.destination();
                    println!("  {} {} {}", target.x(), target.y(), _move);
                }
            }
            ["move", x, y, tx, ty] => {
                let (x, y) = (parse_coord(x)?, parse_coord(y)?);
                let (tx, ty) = (parse_coord(tx)?, parse_coord(ty)?);
                let target = Position::new(tx, ty)
                    .ok_or_else(|| anyhow!("({tx}, {ty}) is outside the board"))?;
                let chosen = self
                    .game
                    .possible_moves(x, y)
                    .and_then(|moves| moves.into_iter().find(|_move| _move.destination() == target))
                    .ok_or_else(|| anyhow!("Piece at ({x}, {y}) can't move to {target}"))?;
                self.game.execute_move(x, y, chosen)?;
                self.print_state();
            }
            ["save", path] => {
                let bytes = self.game.board().to_bytes()?;
                fs::write(path, bytes).with_context(|| format!("Failed to write {path}"))?;
                info!("Board saved to {path}");
            }
            ["load", path] => {
                *self = App::new(load_board(path)?);
                info!("Board loaded from {path}");
                self.print_state();
            }
            _ => bail!("Unknown command `{}`, try `help`", words.join(" ")),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let args: Vec<String> = env::args().skip(1).collect();
    let board = match args.as_slice() {
        [] => Board::default(),
        [flag, path] if flag == "--load" => load_board(path)?,
        [rows] => Board::with_setup_rows(parse_coord(rows)?)?,
        _ => bail!("Usage: checkers [setup_rows | --load <file>]"),
    };
    let mut app = App::new(board);
    app.print_state();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words == ["quit"] {
            let mut decision = QuitDecision::default();
            app.handle_quit_request_with(QuitEvent, &mut decision);
            if decision.quit == Some(true) {
                break;
            }
            continue;
        }
        app.quit_armed = false;
        if let Err(err) = app.run_command(&words) {
            debug!("Command failed: {err:?}");
            println!("Error: {err:#}");
        }
    }
    Ok(())
}
