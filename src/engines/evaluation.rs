use crate::chess_board::{ChessBoard, Color, PieceType};

/// Scores above this favour white in `verdict`, below its negation black.
pub const VERDICT_MARGIN: i32 = 50;

// Tables are written from white's point of view, first row is rank 8.
#[rustfmt::skip]
const PAWN_SQUARE_TABLE: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [ 50,  50,  50,  50,  50,  50,  50,  50],
    [ 10,  10,  20,  30,  30,  20,  10,  10],
    [  5,   5,  10,  25,  25,  10,   5,   5],
    [  0,   0,   0,  20,  20,   0,   0,   0],
    [  5,  -5, -10,   0,   0, -10,  -5,   5],
    [  5,  10,  10, -20, -20,  10,  10,   5],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

#[rustfmt::skip]
const KNIGHT_SQUARE_TABLE: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20,   0,   0,   0,   0, -20, -40],
    [-30,   0,  10,  15,  15,  10,   0, -30],
    [-30,   5,  15,  20,  20,  15,   5, -30],
    [-30,   0,  15,  20,  20,  15,   0, -30],
    [-30,   5,  10,  15,  15,  10,   5, -30],
    [-40, -20,   0,   5,   5,   0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

pub fn piece_value(kind: PieceType) -> i32 {
    match kind {
        PieceType::Pawn => 100,
        PieceType::Knight => 320,
        PieceType::Bishop => 330,
        PieceType::Rook => 500,
        PieceType::Queen => 900,
        PieceType::King => 20_000,
    }
}

/// Evaluates the board state and assigns a score based on material balance
/// and piece placement. Positive values favour white.
pub fn evaluate_board(board: &ChessBoard) -> i32 {
    let mut evaluation = 0;

    for (field, piece) in board.pieces_with_coordinates() {
        //Check position value, mirrored for black
        let (row, col) = (field.row() as usize, field.col() as usize);
        let psq_row = match piece.color {
            Color::White => row,
            Color::Black => 7 - row,
        };

        let position_value = match piece.kind {
            PieceType::Pawn => PAWN_SQUARE_TABLE[psq_row][col],
            PieceType::Knight => KNIGHT_SQUARE_TABLE[psq_row][col],
            _ => 0,
        };

        let piece_evaluation = piece_value(piece.kind) + position_value;
        evaluation += match piece.color {
            Color::White => piece_evaluation,
            Color::Black => -piece_evaluation,
        };
    }

    evaluation
}

/// Static evaluation from the point of view of the side to move, the sign
/// convention negamax relies on.
pub fn evaluate(board: &ChessBoard) -> i32 {
    white_relative(evaluate_board(board), board)
}

/// Converts between a side-relative score and white's point of view. The
/// conversion is its own inverse.
pub fn white_relative(score: i32, board: &ChessBoard) -> i32 {
    match board.active_color {
        Color::White => score,
        Color::Black => -score,
    }
}

/// A one-line human reading of a white-relative score.
pub fn verdict(white_score: i32) -> &'static str {
    if white_score > VERDICT_MARGIN {
        "White is better"
    } else if white_score < -VERDICT_MARGIN {
        "Black is better"
    } else {
        "Balanced"
    }
}
