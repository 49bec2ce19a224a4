use super::{ChessBoard, ChessField, Move};

pub fn assert_moves<I: Iterator<Item = Move>>(generated: I, mut expected: Vec<&str>) {
    let mut generated_converted: Vec<_> = generated.map(|m| m.as_algebraic()).collect();
    generated_converted.sort();
    expected.sort();

    assert_eq!(generated_converted, expected);
}

/// Pseudo-legal moves of the piece on an algebraic square like "e2".
pub fn pseudo_from(board: &ChessBoard, square: &str) -> Vec<Move> {
    board.generate_pseudo_moves_from_field(ChessField::from_algebraic(square).unwrap())
}
