use super::chess_board::{BLACK_KING_SIDE, BLACK_QUEEN_SIDE, KNIGHT_JUMPS, WHITE_KING_SIDE, WHITE_QUEEN_SIDE};
use super::{ChessBoard, ChessField, Color, Move, PieceType, Square};
use crate::errors::{ChessError, ChessResult};

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

/// Outcome of a position from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
}

impl ChessBoard {
    /// Moves that follow the piece movement rules for the side to move but
    /// may leave its own king in check.
    pub fn generate_pseudo_moves(&self) -> Vec<Move> {
        let mut all_moves: Vec<Move> = Vec::with_capacity(128);

        for (field, piece) in self.pieces_with_coordinates() {
            if piece.color == self.active_color {
                self.generate_pseudo_moves_into(field, piece.kind, &mut all_moves);
            }
        }

        all_moves
    }

    pub fn generate_pseudo_moves_from_field(&self, field: ChessField) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Square::Occupied(piece) = self.square(field) {
            if piece.color == self.active_color {
                self.generate_pseudo_moves_into(field, piece.kind, &mut moves);
            }
        }
        moves
    }

    fn generate_pseudo_moves_into(&self, field: ChessField, kind: PieceType, moves: &mut Vec<Move>) {
        match kind {
            PieceType::Pawn => self.generate_pawn_moves(field, moves),
            PieceType::Knight => self.generate_moves_from_directions(field, &KNIGHT_JUMPS, moves),
            PieceType::Bishop => self.generate_sliding_moves(field, &BISHOP_DIRECTIONS, moves),
            PieceType::Rook => self.generate_sliding_moves(field, &ROOK_DIRECTIONS, moves),
            PieceType::Queen => self.generate_sliding_moves(field, &QUEEN_DIRECTIONS, moves),
            PieceType::King => self.generate_king_moves(field, moves),
        }
    }

    fn generate_pawn_moves(&self, field: ChessField, moves: &mut Vec<Move>) {
        let (forward, start_row, promotion_row, en_passant_row) = match self.active_color {
            Color::White => (-1, 6, 0, 2),
            Color::Black => (1, 1, 7, 5),
        };

        let Some(one_forward) = field.offset(forward, 0) else {
            return;
        };

        if self.square(one_forward).is_empty() {
            moves.push(Self::pawn_move(field, one_forward, promotion_row));

            // Double move from start position
            if field.row() == start_row {
                if let Some(two_forward) = field.offset(2 * forward, 0) {
                    if self.square(two_forward).is_empty() {
                        moves.push(Move::new(field, two_forward));
                    }
                }
            }
        }

        for d_col in [-1, 1] {
            let Some(target) = field.offset(forward, d_col) else {
                continue;
            };
            match self.square(target) {
                Square::Occupied(piece) if piece.color != self.active_color => {
                    moves.push(Self::pawn_move(field, target, promotion_row));
                }
                Square::Empty
                    if target.row() == en_passant_row && self.en_passant_file == Some(target.col()) =>
                {
                    moves.push(Move::en_passant(field, target));
                }
                _ => {}
            }
        }
    }

    /// Pawn moves onto the last row promote to a queen. Callers wanting
    /// another piece overwrite `promotion` before making the move.
    fn pawn_move(from: ChessField, to: ChessField, promotion_row: u8) -> Move {
        let mv = Move::new(from, to);
        if to.row() == promotion_row {
            mv.with_promotion(PieceType::Queen)
        } else {
            mv
        }
    }

    /// Generate sliding piece moves (bishop, rook, queen).
    fn generate_sliding_moves(&self, field: ChessField, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(d_row, d_col) in directions {
            let mut next = field.offset(d_row, d_col);
            while let Some(target) = next {
                match self.square(target) {
                    Square::Empty => moves.push(Move::new(field, target)),
                    Square::Occupied(p) => {
                        if p.color != self.active_color {
                            moves.push(Move::new(field, target));
                        }
                        break; // Block sliding
                    }
                }
                next = target.offset(d_row, d_col);
            }
        }
    }

    /// Generate king moves (including castling).
    fn generate_king_moves(&self, field: ChessField, moves: &mut Vec<Move>) {
        self.generate_moves_from_directions(field, &QUEEN_DIRECTIONS, moves);

        let color = self.active_color;
        if field != ChessBoard::king_home(color) || self.is_check(color) {
            return;
        }
        let (king_side, queen_side) = match color {
            Color::White => (WHITE_KING_SIDE, WHITE_QUEEN_SIDE),
            Color::Black => (BLACK_KING_SIDE, BLACK_QUEEN_SIDE),
        };
        let row = field.row();
        let empty = |col: u8| self.square(ChessField::new(row, col)).is_empty();
        let safe = |col: u8| !self.is_square_attacked(ChessField::new(row, col));

        if self.castling_rights[king_side] && empty(5) && empty(6) && safe(5) && safe(6) {
            moves.push(Move::castle(field, ChessField::new(row, 6)));
        }

        if self.castling_rights[queen_side] && empty(3) && empty(2) && empty(1) && safe(3) && safe(2) {
            moves.push(Move::castle(field, ChessField::new(row, 2)));
        }
    }

    fn generate_moves_from_directions(&self, field: ChessField, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(d_row, d_col) in directions {
            if let Some(target) = field.offset(d_row, d_col) {
                if !self.square(target).has_color(self.active_color) {
                    moves.push(Move::new(field, target));
                }
            }
        }
    }

    /// Pseudo-legal moves that do not leave the mover's own king in check.
    ///
    /// Every candidate is made and unmade on a scratch copy of the board, so
    /// the result is recomputed on each call and `self` is left untouched.
    pub fn generate_legal_moves(&self) -> Vec<Move> {
        let mover = self.active_color;
        let mut scratch = self.clone();
        let mut legal_moves = Vec::new();

        for mv in self.generate_pseudo_moves() {
            let undo = match scratch.apply(&mv) {
                Ok(undo) => undo,
                Err(e) => {
                    // the generator only emits moves whose origin holds a piece
                    debug_assert!(false, "generated move {} does not apply: {}", mv, e);
                    tracing::error!(%mv, error = %e, "generated move does not apply, skipped");
                    continue;
                }
            };
            let leaves_king_in_check = scratch.is_check(mover);
            scratch.revert(&mv, undo);
            if !leaves_king_in_check {
                legal_moves.push(mv);
            }
        }
        legal_moves
    }

    pub fn generate_legal_moves_from_field(&self, field: ChessField) -> Vec<Move> {
        self.generate_legal_moves()
            .into_iter()
            .filter(|mv| mv.from == field)
            .collect()
    }

    /// The legal move between two fields, as an interactive caller would pick
    /// it. Promotions come back as queen promotions.
    pub fn find_legal_move(&self, from: ChessField, to: ChessField) -> ChessResult<Move> {
        self.generate_legal_moves()
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to)
            .ok_or_else(|| ChessError::IllegalMove(format!("{}{}", from, to)))
    }

    /// Resolves coordinate notation like `e2e4` or `e7e8n` into a legal move.
    pub fn parse_legal_move(&self, algebraic: &str) -> ChessResult<Move> {
        let parsed = Move::from_algebraic(algebraic)?;
        let mut mv = self.find_legal_move(parsed.from, parsed.to)?;
        if parsed.promotion.is_some() {
            if mv.promotion.is_none() {
                return Err(ChessError::IllegalMove(algebraic.to_string()));
            }
            mv.promotion = parsed.promotion;
        }
        Ok(mv)
    }

    pub fn status(&self) -> GameStatus {
        if !self.generate_legal_moves().is_empty() {
            GameStatus::Ongoing
        } else if self.is_check(self.active_color) {
            GameStatus::Checkmate {
                winner: self.active_color.opposite(),
            }
        } else {
            GameStatus::Stalemate
        }
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.status(), GameStatus::Checkmate { .. })
    }

    pub fn is_stalemate(&self) -> bool {
        self.status() == GameStatus::Stalemate
    }
}
