mod board;
mod game_state;
mod input;
mod notation;
mod player;
mod ugn;

pub use board::{ActiveBoard, ActiveBoardError, Board, Cell, Outcome, SubBoard};
pub use game_state::{GameState, GameStatus, SnapshotError, Winner};
pub use input::{is_legal, IllegalMove, ValidMove};
pub use notation::{board_letter, Move, NotationError, BOARD_LEN};
pub use player::{Players, Symbol};
pub use ugn::{Annotations, UgnError, UgnMove, UgnRecord};
