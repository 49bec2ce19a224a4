use super::{ChessBoard, ChessField, Color, Piece, Square};
use crate::errors::{ChessError, ChessResult};

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn invalid(reason: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(reason.into())
}

/// Parses a FEN string and sets up a ChessBoard.
///
/// The halfmove clock and fullmove number are optional and ignored, the
/// board keeps no clocks. Of the en passant square only the file is kept.
pub fn from_fen(fen: &str) -> ChessResult<ChessBoard> {
    let mut board = ChessBoard::new();
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 4 && parts.len() != 6 {
        return Err(invalid(format!("expected 4 or 6 fields, got {}", parts.len())));
    }

    // Parse board squares, first row is rank 8
    let rows: Vec<&str> = parts[0].split('/').collect();
    if rows.len() != 8 {
        return Err(invalid("expected 8 rows"));
    }

    for (row_index, row) in rows.iter().enumerate() {
        let mut col_index = 0u8;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 || u32::from(col_index) + skip > 8 {
                    return Err(invalid(format!("invalid empty square count in row {}", row_index + 1)));
                }
                col_index += skip as u8;
            } else if let Some(piece) = Piece::from_char(c) {
                if col_index > 7 {
                    return Err(invalid(format!("too many squares in row {}", row_index + 1)));
                }
                board.squares[ChessField::new(row_index as u8, col_index).index()] = Square::Occupied(piece);
                col_index += 1;
            } else {
                return Err(invalid(format!("invalid piece character: {}", c)));
            }
        }
        if col_index != 8 {
            return Err(invalid(format!("row {} covers {} squares", row_index + 1, col_index)));
        }
    }

    board.active_color = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(invalid(format!("invalid active color: {}", other))),
    };

    if parts[2] != "-" && !parts[2].chars().all(|c| "KQkq".contains(c)) {
        return Err(invalid(format!("invalid castling field: {}", parts[2])));
    }
    board.castling_rights = [
        parts[2].contains('K'), // White king-side castling
        parts[2].contains('Q'), // White queen-side castling
        parts[2].contains('k'), // Black king-side castling
        parts[2].contains('q'), // Black queen-side castling
    ];

    board.en_passant_file = if parts[3] == "-" {
        None
    } else {
        let field = ChessField::from_algebraic(parts[3])
            .map_err(|_| invalid(format!("invalid en passant square: {}", parts[3])))?;
        Some(field.col())
    };

    if parts.len() == 6 {
        for counter in &parts[4..] {
            counter
                .parse::<u32>()
                .map_err(|_| invalid(format!("move counter is not a valid number: {}", counter)))?;
        }
    }

    Ok(board)
}

pub fn to_fen(board: &ChessBoard) -> String {
    let mut board_representation = String::new();

    for row in 0..8u8 {
        let mut empty_count = 0;

        for col in 0..8u8 {
            match board.square(ChessField::new(row, col)) {
                Square::Occupied(piece) => {
                    if empty_count > 0 {
                        board_representation.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    board_representation.push(piece.to_char());
                }
                Square::Empty => {
                    empty_count += 1;
                }
            }
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if row < 7 {
            board_representation.push('/');
        }
    }

    let active_color = if board.active_color == Color::White { "w" } else { "b" };

    let mut castling = String::from("KQkq");
    for (i, right) in board.castling_rights.iter().enumerate().rev() {
        if !*right {
            castling.remove(i);
        }
    }
    if castling.is_empty() {
        castling = "-".to_string();
    }

    // The square behind the pawn that just advanced, seen from the side to move
    let en_passant_square = match board.en_passant_file {
        Some(col) => {
            let row = if board.active_color == Color::White { 2 } else { 5 };
            ChessField::new(row, col).as_algebraic()
        }
        None => "-".to_string(),
    };

    format!("{} {} {} {} 0 1", board_representation, active_color, castling, en_passant_square)
}
