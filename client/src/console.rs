use crate::events::{Diagnostic, UiEvent};
use common::{board_letter, ActiveBoard, Cell, GameState, Move, Outcome, Symbol, Winner, BOARD_LEN};
use std::fmt;

const BLOCK_SEPARATOR: &str = "------+-------+------";

pub fn present(event: &UiEvent) {
    println!("{}", render_event(event));
}

pub fn render_event(event: &UiEvent) -> String {
    match event {
        UiEvent::Greeting(message) => message.clone(),
        UiEvent::StateUpdated(game) => render_game(game),
        UiEvent::ActivityLogged(notice) => format!(
            "{} ({}) played {}",
            notice.player_name, notice.symbol, notice.mv
        ),
        UiEvent::Diagnostic(diagnostic) => render_diagnostic(diagnostic),
        UiEvent::ImportantNotice(message) => format!("*** {} ***", message),
        UiEvent::DrawOfferPrompt(message) => {
            format!("{} (type ACCEPT or DECLINE)", message)
        }
    }
}

fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::ServerError(message) => format!("Error: {}", message),
        Diagnostic::ServerInfo(message) => message.clone(),
        Diagnostic::Undecodable { raw, error } => {
            format!("Could not read server message ({}): {}", error, raw)
        }
        Diagnostic::Unexpected { kind } => format!("Ignored unexpected {} message", kind),
        Diagnostic::Rejected(err) => err.to_string(),
    }
}

fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::X => 'X',
        Cell::O => 'O',
    }
}

fn outcome_char(outcome: Outcome) -> char {
    match outcome {
        Outcome::Undecided => '-',
        Outcome::WonByX => 'X',
        Outcome::WonByO => 'O',
        Outcome::Draw => '=',
    }
}

pub fn render_game(game: &GameState) -> String {
    GameView(game).to_string()
}

// Renders the 9x9 grid as a 3x3 block of sub-boards, each labelled with its letter
pub struct GameView<'a>(pub &'a GameState);

impl GameView<'_> {
    fn player(&self, symbol: Symbol) -> String {
        format!("{} ({})", self.0.players()[symbol], symbol)
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, block_row: usize, cell_row: usize) -> fmt::Result {
        for block_col in 0..3 {
            if block_col > 0 {
                write!(f, " | ")?;
            }
            let sub_board = block_row * 3 + block_col;
            for cell_col in 0..3 {
                if cell_col > 0 {
                    write!(f, " ")?;
                }
                let mv = Move::new(sub_board, cell_row * 3 + cell_col);
                let symbol = mv.map_or('?', |mv| cell_char(self.0.board().cell(mv)));
                write!(f, "{}", symbol)?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for GameView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let game = self.0;
        let board = game.board();
        writeln!(
            f,
            "Game {}: {} vs {}",
            game.game_id(),
            self.player(Symbol::X),
            self.player(Symbol::O)
        )?;

        for block_row in 0..3 {
            if block_row > 0 {
                writeln!(f, "{}", BLOCK_SEPARATOR)?;
            }
            writeln!(
                f,
                "  {}       {}       {}",
                board_letter(block_row * 3),
                board_letter(block_row * 3 + 1),
                board_letter(block_row * 3 + 2)
            )?;
            for cell_row in 0..3 {
                self.write_row(f, block_row, cell_row)?;
            }
        }

        write!(f, "Boards:")?;
        for idx in 0..BOARD_LEN {
            write!(f, " {}:{}", board_letter(idx), outcome_char(board.outcome(idx)))?;
        }
        writeln!(f)?;

        if !game.moves().is_empty() {
            write!(f, "Moves:")?;
            for mv in game.moves() {
                write!(f, " {}", mv)?;
            }
            writeln!(f)?;
        }

        if game.is_finished() {
            return match game.winner() {
                Some(Winner::Player(symbol)) => write!(f, "Winner: {}", self.player(symbol)),
                Some(Winner::Draw) => write!(f, "Result: draw"),
                None => write!(f, "Game over"),
            };
        }
        write!(f, "You are {}. ", game.your_symbol())?;
        if game.is_your_turn() {
            write!(f, "Your turn")?;
        } else {
            write!(f, "Waiting for {}", self.player(game.current_turn()))?;
        }
        match board.active() {
            ActiveBoard::Any => write!(f, ", play on any open board"),
            ActiveBoard::Board(idx) => write!(f, ", play on board {}", board_letter(idx)),
        }
    }
}
