pub mod attack;
pub mod board;
pub mod coord;
pub mod driver;
pub mod error;
pub mod evaluation;
pub mod movegen;
pub mod moves;
pub mod notation;
pub mod ordering;
pub mod perft;
pub mod position;
pub mod search;
pub mod transposition;
pub mod zobrist;

pub use board::{Color, Piece, PieceKind};
pub use coord::Location;
pub use error::{MoveError, NotationError};
pub use moves::Move;
pub use position::{GameState, Position};
pub use search::{Search, SearchConfig, SearchResult};
