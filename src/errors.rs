use thiserror::Error;

/// Errors raised by the rules engine and the search.
///
/// Apart from FEN and notation parsing these are programmer errors: the
/// make/unmake protocol was violated or the search was asked for something
/// it cannot do. They are reported immediately and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidMove(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("move {0} is already made on a board")]
    MoveAlreadyMade(String),

    #[error("move {0} was never made")]
    MoveNotMade(String),

    #[error("move {mv} is not the last move made (made at ply {move_ply}, board is at ply {board_ply})")]
    UnmakeOutOfOrder { mv: String, move_ply: u32, board_ply: u32 },

    #[error("search depth must be positive, got {0}")]
    InvalidDepth(u32),

    #[error("unknown difficulty '{0}', expected easy, medium or hard")]
    InvalidDifficulty(String),

    #[error("search worker failed: {0}")]
    SearchWorker(String),
}

pub type ChessResult<T> = Result<T, ChessError>;
