use crate::uttt::board::{ActiveBoard, Board};
use crate::uttt::game_state::GameStatus;
use crate::uttt::notation::{board_letter, Move};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IllegalMove {
    #[error("The game is not in progress")]
    GameNotInProgress,
    #[error("It is not your turn")]
    NotYourTurn,
    #[error("You must play on board {}", letter(.required))]
    WrongSubBoard { required: usize },
    #[error("Board {} has already been decided", letter(.sub_board))]
    SubBoardAlreadyDecided { sub_board: usize },
    #[error("Cell {0} is already taken")]
    CellAlreadyTaken(Move),
}

fn letter(idx: &usize) -> char {
    board_letter(*idx)
}

// A move that passed the local checks against the last known snapshot.
// The server may still reject it if the snapshot is stale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ValidMove(Move);

impl ValidMove {
    // validates, in order:
    // - game status
    // - turn
    // - active sub-board
    // - sub-board outcome
    // - cell occupancy
    pub fn new(
        mv: Move,
        board: &Board,
        is_your_turn: bool,
        status: GameStatus,
    ) -> Result<Self, IllegalMove> {
        if status != GameStatus::InProgress {
            return Err(IllegalMove::GameNotInProgress);
        }
        if !is_your_turn {
            return Err(IllegalMove::NotYourTurn);
        }
        if let ActiveBoard::Board(required) = board.active() {
            if required != mv.sub_board() {
                return Err(IllegalMove::WrongSubBoard { required });
            }
        }
        if board.outcome(mv.sub_board()).is_decided() {
            return Err(IllegalMove::SubBoardAlreadyDecided {
                sub_board: mv.sub_board(),
            });
        }
        if !board.cell(mv).is_empty() {
            return Err(IllegalMove::CellAlreadyTaken(mv));
        }
        Ok(ValidMove(mv))
    }

    pub fn get(self) -> Move {
        self.0
    }
}

pub fn is_legal(
    board: &Board,
    is_your_turn: bool,
    status: GameStatus,
    mv: Move,
) -> Result<(), IllegalMove> {
    ValidMove::new(mv, board, is_your_turn, status).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uttt::board::{Cell, Outcome, SubBoard};
    use crate::uttt::notation::BOARD_LEN;

    fn mv(sub_board: usize, cell: usize) -> Move {
        Move::new(sub_board, cell).unwrap()
    }

    fn board_with(active: ActiveBoard, edit: impl Fn(usize) -> SubBoard) -> Board {
        Board::new(std::array::from_fn(edit), active)
    }

    #[test]
    fn test_fresh_board_any_active() {
        let board = Board::default();
        assert_eq!(is_legal(&board, true, GameStatus::InProgress, mv(0, 4)), Ok(()));
        let valid = ValidMove::new(mv(0, 4), &board, true, GameStatus::InProgress).unwrap();
        assert_eq!(valid.get(), mv(0, 4));
    }

    #[test]
    fn test_finished_game_wins_over_everything() {
        let taken = board_with(ActiveBoard::Board(3), |_| {
            SubBoard::new([Cell::X; BOARD_LEN], Outcome::WonByX)
        });
        for board in [Board::default(), taken] {
            for is_your_turn in [true, false] {
                assert_eq!(
                    is_legal(&board, is_your_turn, GameStatus::Finished, mv(4, 0)),
                    Err(IllegalMove::GameNotInProgress)
                );
            }
        }
    }

    #[test]
    fn test_not_your_turn() {
        assert_eq!(
            is_legal(&Board::default(), false, GameStatus::InProgress, mv(0, 0)),
            Err(IllegalMove::NotYourTurn)
        );
    }

    #[test]
    fn test_wrong_sub_board() {
        let board = board_with(ActiveBoard::Board(3), |_| SubBoard::default());
        assert_eq!(
            is_legal(&board, true, GameStatus::InProgress, mv(4, 0)),
            Err(IllegalMove::WrongSubBoard { required: 3 })
        );

        let board = board_with(ActiveBoard::Board(5), |_| SubBoard::default());
        let err = is_legal(&board, true, GameStatus::InProgress, mv(2, 0)).unwrap_err();
        assert_eq!(err, IllegalMove::WrongSubBoard { required: 5 });
        assert_eq!(err.to_string(), "You must play on board F");
        assert_eq!(is_legal(&board, true, GameStatus::InProgress, mv(5, 0)), Ok(()));
    }

    #[test]
    fn test_decided_sub_board() {
        let board = board_with(ActiveBoard::Any, |idx| {
            if idx == 2 {
                let mut cells = [Cell::Empty; BOARD_LEN];
                cells[0] = Cell::X;
                cells[4] = Cell::X;
                cells[8] = Cell::X;
                SubBoard::new(cells, Outcome::WonByX)
            } else {
                SubBoard::default()
            }
        });
        for cell in 0..BOARD_LEN {
            assert_eq!(
                is_legal(&board, true, GameStatus::InProgress, mv(2, cell)),
                Err(IllegalMove::SubBoardAlreadyDecided { sub_board: 2 })
            );
        }
    }

    #[test]
    fn test_cell_already_taken() {
        let board = board_with(ActiveBoard::Board(7), |idx| {
            let mut cells = [Cell::Empty; BOARD_LEN];
            if idx == 7 {
                cells[1] = Cell::O;
            }
            SubBoard::new(cells, Outcome::Undecided)
        });
        assert_eq!(
            is_legal(&board, true, GameStatus::InProgress, mv(7, 1)),
            Err(IllegalMove::CellAlreadyTaken(mv(7, 1)))
        );
        assert_eq!(is_legal(&board, true, GameStatus::InProgress, mv(7, 2)), Ok(()));
    }
}
