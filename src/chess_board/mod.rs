pub mod fen;
pub mod model;
pub use model::{ChessField, Color, Move, Piece, PieceType, Square};
pub(crate) use model::Undo;

mod chess_board;
mod move_generation;
mod perft;
#[cfg(test)]
pub mod test_utils;
pub use chess_board::{ChessBoard, BLACK_KING_SIDE, BLACK_QUEEN_SIDE, WHITE_KING_SIDE, WHITE_QUEEN_SIDE};
pub use move_generation::GameStatus;
