use std::sync::atomic::{AtomicU64, Ordering};

use super::{fen, ChessField, Color, Move, Piece, PieceType, Square, Undo};
use crate::errors::{ChessError, ChessResult};

/// Tags every make with a number no other make in the process shares.
static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

pub const WHITE_KING_SIDE: usize = 0;
pub const WHITE_QUEEN_SIDE: usize = 1;
pub const BLACK_KING_SIDE: usize = 2;
pub const BLACK_QUEEN_SIDE: usize = 3;

const WHITE_KING_HOME: ChessField = ChessField::new(7, 4);
const BLACK_KING_HOME: ChessField = ChessField::new(0, 4);

/// Rook home fields and the castling right each one guards.
const ROOK_HOMES: [(ChessField, usize); 4] = [
    (ChessField::new(0, 0), BLACK_QUEEN_SIDE),
    (ChessField::new(0, 7), BLACK_KING_SIDE),
    (ChessField::new(7, 0), WHITE_QUEEN_SIDE),
    (ChessField::new(7, 7), WHITE_KING_SIDE),
];

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

pub(crate) const KNIGHT_JUMPS: [(i8, i8); 8] =
    [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];

/// The 8 ray directions, orthogonal ones flagged with `true`.
const RAYS: [(i8, i8, bool); 8] = [
    (-1, -1, false),
    (-1, 0, true),
    (-1, 1, false),
    (0, -1, true),
    (0, 1, true),
    (1, -1, false),
    (1, 0, true),
    (1, 1, false),
];

/// The state of a game: piece placement, side to move, castling rights and
/// the en passant file.
///
/// Search mutates one board in place with `make`/`unmake`. Hand a search its
/// own `copy()`; a board must never be mutated by two callers at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessBoard {
    pub squares: [Square; 64],
    pub active_color: Color,
    pub castling_rights: [bool; 4],
    /// Column of a pawn that advanced two squares on the previous ply.
    pub en_passant_file: Option<u8>,
    /// Origin and destination of the last applied move, for highlighting.
    pub last_move: Option<(ChessField, ChessField)>,
    /// Serials of the moves made and not yet unmade, most recent last.
    history: Vec<u64>,
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::standard()
    }
}

impl ChessBoard {
    /// Creates an empty chess board
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 64],
            active_color: Color::White,
            castling_rights: [false; 4],
            en_passant_file: None,
            last_move: None,
            history: Vec::new(),
        }
    }

    /// The standard starting position, white to move, all castling rights.
    pub fn standard() -> Self {
        let mut board = Self::new();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.squares[ChessField::new(0, col).index()] = Square::Occupied(Piece::new(Color::Black, *kind));
            board.squares[ChessField::new(1, col).index()] =
                Square::Occupied(Piece::new(Color::Black, PieceType::Pawn));
            board.squares[ChessField::new(6, col).index()] =
                Square::Occupied(Piece::new(Color::White, PieceType::Pawn));
            board.squares[ChessField::new(7, col).index()] = Square::Occupied(Piece::new(Color::White, *kind));
        }
        board.castling_rights = [true; 4];
        board
    }

    /// Delegates FEN parsing to the `fen` module.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        fen::from_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        fen::to_fen(self)
    }

    /// An independent snapshot of this board.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn square(&self, field: ChessField) -> Square {
        self.squares[field.index()]
    }

    /// Number of moves currently made on this board and not yet unmade.
    pub fn ply(&self) -> u32 {
        self.history.len() as u32
    }

    /// Returns an iterator over all pieces on the board along with their fields.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (ChessField, Piece)> + '_ {
        ChessField::all().filter_map(move |field| self.square(field).piece().map(|piece| (field, piece)))
    }

    /// Applies `mv` and records what is needed to take it back in the move.
    ///
    /// Fails without touching the board when the move is already made or has
    /// no piece on its origin.
    pub fn make(&mut self, mv: &mut Move) -> ChessResult<()> {
        if mv.is_made() {
            return Err(ChessError::MoveAlreadyMade(mv.as_algebraic()));
        }
        let mut undo = self.apply(mv)?;
        undo.serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        self.history.push(undo.serial);
        undo.ply = self.ply();
        mv.undo = Some(undo);
        Ok(())
    }

    /// Takes back `mv`, which must be the move most recently made on this board.
    ///
    /// A clone of a move taken before an earlier unmake, or a move made on a
    /// different board, is rejected even when the ply numbers line up.
    pub fn unmake(&mut self, mv: &mut Move) -> ChessResult<()> {
        let undo = mv
            .undo
            .take()
            .ok_or_else(|| ChessError::MoveNotMade(mv.as_algebraic()))?;
        if self.history.last() != Some(&undo.serial) {
            mv.undo = Some(undo);
            return Err(ChessError::UnmakeOutOfOrder {
                mv: mv.as_algebraic(),
                move_ply: undo.ply,
                board_ply: self.ply(),
            });
        }
        self.history.pop();
        self.revert(mv, undo);
        Ok(())
    }

    pub(crate) fn apply(&mut self, mv: &Move) -> ChessResult<Undo> {
        let Some(piece) = self.square(mv.from).piece() else {
            return Err(ChessError::IllegalMove(format!("{}: no piece on {}", mv, mv.from)));
        };
        let en_passant_victim = if mv.is_en_passant {
            let victim = en_passant_victim(mv.to, self.active_color)
                .ok_or_else(|| ChessError::IllegalMove(format!("{}: not an en passant target", mv)))?;
            Some(victim)
        } else {
            None
        };
        let rook_transfer = if mv.is_castle {
            let transfer = castling_rook_transfer(mv.to)
                .ok_or_else(|| ChessError::IllegalMove(format!("{}: not a castling destination", mv)))?;
            Some(transfer)
        } else {
            None
        };

        let mut undo = Undo {
            moved: piece,
            captured: self.square(mv.to),
            active_color: self.active_color,
            en_passant_file: self.en_passant_file,
            castling_rights: self.castling_rights,
            last_move: self.last_move,
            ply: 0,
            serial: 0,
        };

        let placed = match mv.promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        self.squares[mv.from.index()] = Square::Empty;
        self.squares[mv.to.index()] = Square::Occupied(placed);

        if let Some((rook_from, rook_to)) = rook_transfer {
            self.squares[rook_to.index()] = self.squares[rook_from.index()];
            self.squares[rook_from.index()] = Square::Empty;
        }

        if let Some(victim) = en_passant_victim {
            undo.captured = self.square(victim);
            self.squares[victim.index()] = Square::Empty;
        }

        self.en_passant_file = None;
        if piece.kind == PieceType::Pawn && mv.from.row().abs_diff(mv.to.row()) == 2 {
            self.en_passant_file = Some(mv.from.col());
        }

        self.update_castling_rights(piece, mv.from);
        for (home, right) in ROOK_HOMES {
            if mv.to == home {
                self.castling_rights[right] = false;
            }
        }

        self.active_color = self.active_color.opposite();
        self.last_move = Some((mv.from, mv.to));
        Ok(undo)
    }

    pub(crate) fn revert(&mut self, mv: &Move, undo: Undo) {
        self.active_color = undo.active_color;
        self.en_passant_file = undo.en_passant_file;
        self.castling_rights = undo.castling_rights;
        self.last_move = undo.last_move;

        self.squares[mv.from.index()] = Square::Occupied(undo.moved);
        self.squares[mv.to.index()] = undo.captured;

        if mv.is_en_passant {
            self.squares[mv.to.index()] = Square::Empty;
            if let Some(victim) = en_passant_victim(mv.to, self.active_color) {
                self.squares[victim.index()] = undo.captured;
            }
        }

        if mv.is_castle {
            if let Some((rook_from, rook_to)) = castling_rook_transfer(mv.to) {
                self.squares[rook_from.index()] = self.squares[rook_to.index()];
                self.squares[rook_to.index()] = Square::Empty;
            }
        }
    }

    fn update_castling_rights(&mut self, piece: Piece, from: ChessField) {
        match (piece.color, piece.kind) {
            (Color::White, PieceType::King) => {
                self.castling_rights[WHITE_KING_SIDE] = false;
                self.castling_rights[WHITE_QUEEN_SIDE] = false;
            }
            (Color::Black, PieceType::King) => {
                self.castling_rights[BLACK_KING_SIDE] = false;
                self.castling_rights[BLACK_QUEEN_SIDE] = false;
            }
            (_, PieceType::Rook) => {
                for (home, right) in ROOK_HOMES {
                    if from == home {
                        self.castling_rights[right] = false;
                    }
                }
            }
            _ => {}
        }
    }

    pub fn find_king_position(&self, color: Color) -> Option<ChessField> {
        ChessField::all().find(|field| self.square(*field) == Square::Occupied(Piece::new(color, PieceType::King)))
    }

    /// Whether `color`'s king is attacked. A board without that king counts
    /// as check.
    pub fn is_check(&self, color: Color) -> bool {
        match self.find_king_position(color) {
            Some(king) => self.is_square_attacked_by_color(king, color.opposite()),
            None => true,
        }
    }

    /// Whether the opponent of the side to move attacks `field`.
    pub fn is_square_attacked(&self, field: ChessField) -> bool {
        self.is_square_attacked_by_color(field, self.active_color.opposite())
    }

    pub fn is_square_attacked_by_color(&self, field: ChessField, attacker: Color) -> bool {
        // white pawns attack towards row 0, so they sit one row below the target
        let pawn_row = match attacker {
            Color::White => 1,
            Color::Black => -1,
        };
        for d_col in [-1, 1] {
            if self.holds(field.offset(pawn_row, d_col), attacker, |kind| kind == PieceType::Pawn) {
                return true;
            }
        }

        for (d_row, d_col) in KNIGHT_JUMPS {
            if self.holds(field.offset(d_row, d_col), attacker, |kind| kind == PieceType::Knight) {
                return true;
            }
        }

        for (d_row, d_col, orthogonal) in RAYS {
            let mut distance = 1;
            let mut next = field.offset(d_row, d_col);
            while let Some(target) = next {
                if let Square::Occupied(piece) = self.square(target) {
                    if piece.color == attacker {
                        let attacks = match piece.kind {
                            PieceType::Queen => true,
                            PieceType::Rook => orthogonal,
                            PieceType::Bishop => !orthogonal,
                            PieceType::King => distance == 1,
                            _ => false,
                        };
                        if attacks {
                            return true;
                        }
                    }
                    break;
                }
                distance += 1;
                next = target.offset(d_row, d_col);
            }
        }
        false
    }

    fn holds(&self, field: Option<ChessField>, color: Color, kind: impl Fn(PieceType) -> bool) -> bool {
        match field.map(|f| self.square(f)) {
            Some(Square::Occupied(piece)) => piece.color == color && kind(piece.kind),
            _ => false,
        }
    }

    pub(crate) fn king_home(color: Color) -> ChessField {
        match color {
            Color::White => WHITE_KING_HOME,
            Color::Black => BLACK_KING_HOME,
        }
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for row in 0..8u8 {
            let rank = 8 - row;
            board_representation.push_str(&format!("{} │", rank));
            for col in 0..8u8 {
                let square = match self.square(ChessField::new(row, col)) {
                    Square::Empty => ' ',
                    Square::Occupied(piece) => piece.to_char(),
                };
                board_representation.push_str(&format!(" {} │", square));
            }
            board_representation.push_str(&format!(" {}\n", rank));

            if row < 7 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

/// The field of the pawn taken by an en passant capture landing on `to`,
/// `mover` being the capturing side.
fn en_passant_victim(to: ChessField, mover: Color) -> Option<ChessField> {
    match mover {
        Color::White => to.offset(1, 0),
        Color::Black => to.offset(-1, 0),
    }
}

/// Rook origin and destination for a castling king landing on `king_to`.
fn castling_rook_transfer(king_to: ChessField) -> Option<(ChessField, ChessField)> {
    match (king_to.row(), king_to.col()) {
        (7, 6) => Some((ChessField::new(7, 7), ChessField::new(7, 5))),
        (7, 2) => Some((ChessField::new(7, 0), ChessField::new(7, 3))),
        (0, 6) => Some((ChessField::new(0, 7), ChessField::new(0, 5))),
        (0, 2) => Some((ChessField::new(0, 0), ChessField::new(0, 3))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(s: &str) -> ChessField {
        ChessField::from_algebraic(s).unwrap()
    }

    fn legal(board: &ChessBoard, uci: &str) -> Move {
        let mv = Move::from_algebraic(uci).unwrap();
        board.find_legal_move(mv.from, mv.to).unwrap()
    }

    fn assert_round_trip(fen: &str, uci: &str) {
        let mut board = ChessBoard::from_fen(fen).unwrap();
        let before = board.clone();
        let mut mv = legal(&board, uci);
        board.make(&mut mv).unwrap();
        assert_ne!(board, before, "{} did not change the board", uci);
        board.unmake(&mut mv).unwrap();
        assert_eq!(board, before, "unmake of {} did not restore {}", uci, fen);
        assert!(!mv.is_made());
    }

    #[test]
    fn test_standard_position() {
        let board = ChessBoard::standard();
        assert_eq!(board.to_fen(), fen::INITIAL_POSITION);
        assert_eq!(board.square(field("e1")), Square::Occupied(Piece::new(Color::White, PieceType::King)));
        assert_eq!(board.square(field("d8")), Square::Occupied(Piece::new(Color::Black, PieceType::Queen)));
        assert_eq!(board.en_passant_file, None);
        assert_eq!(board.castling_rights, [true; 4]);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut board = ChessBoard::standard();
        let snapshot = board.copy();
        let mut mv = legal(&board, "e2e4");
        board.make(&mut mv).unwrap();
        assert_eq!(snapshot, ChessBoard::standard());
        assert_ne!(snapshot, board);
    }

    #[test]
    fn test_make_move_sets_en_passant_file() {
        let mut board = ChessBoard::standard();
        let mut e4 = legal(&board, "e2e4");
        board.make(&mut e4).unwrap();
        assert_eq!(board.en_passant_file, Some(4));
        assert_eq!(board.last_move, Some((field("e2"), field("e4"))));

        let mut nf6 = legal(&board, "g8f6");
        board.make(&mut nf6).unwrap();
        assert_eq!(board.en_passant_file, None);

        let mut d4 = legal(&board, "d2d4");
        board.make(&mut d4).unwrap();
        assert_eq!(board.en_passant_file, Some(3));
        let mut e6 = legal(&board, "e7e6");
        board.make(&mut e6).unwrap();
        assert_eq!(board.en_passant_file, None);
    }

    #[test]
    fn test_make_move_castling() {
        let mut board = ChessBoard::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let mut mv = legal(&board, "e1g1");
        assert!(mv.is_castle);
        board.make(&mut mv).unwrap();
        assert_eq!(board.square(ChessField::new(7, 6)), Square::Occupied(Piece::new(Color::White, PieceType::King)));
        assert_eq!(board.square(ChessField::new(7, 5)), Square::Occupied(Piece::new(Color::White, PieceType::Rook)));
        assert_eq!(board.square(ChessField::new(7, 7)), Square::Empty);
        assert_eq!(board.square(ChessField::new(7, 4)), Square::Empty);
        assert_eq!(board.castling_rights, [false, false, true, true]);

        let mut mv = legal(&board, "e8c8");
        board.make(&mut mv).unwrap();
        assert_eq!(board.square(field("c8")), Square::Occupied(Piece::new(Color::Black, PieceType::King)));
        assert_eq!(board.square(field("d8")), Square::Occupied(Piece::new(Color::Black, PieceType::Rook)));
        assert_eq!(board.square(field("a8")), Square::Empty);
        assert_eq!(board.castling_rights, [false; 4]);
    }

    #[test]
    fn test_rook_and_king_moves_clear_castling_rights() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        let cases = [
            ("a1b1", [true, false, true, true]),
            ("h1g1", [false, true, true, true]),
            ("e1d1", [false, false, true, true]),
        ];
        for (uci, rights) in cases {
            let mut board = ChessBoard::from_fen(fen).unwrap();
            let mut mv = legal(&board, uci);
            board.make(&mut mv).unwrap();
            assert_eq!(board.castling_rights, rights, "after {}", uci);
        }

        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1";
        let cases = [
            ("a8b8", [true, true, true, false]),
            ("h8g8", [true, true, false, true]),
            ("e8d8", [true, true, false, false]),
        ];
        for (uci, rights) in cases {
            let mut board = ChessBoard::from_fen(fen).unwrap();
            let mut mv = legal(&board, uci);
            board.make(&mut mv).unwrap();
            assert_eq!(board.castling_rights, rights, "after {}", uci);
        }
    }

    #[test]
    fn test_make_move_capture_rook_invalidates_castling() {
        let mut board = ChessBoard::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/P7/1PP1NnPP/RNBQK2R b KQ - 0 8").unwrap();
        let mut mv = legal(&board, "f2h1");
        board.make(&mut mv).unwrap();
        assert!(!board.castling_rights[WHITE_KING_SIDE]);
        assert!(board.castling_rights[WHITE_QUEEN_SIDE]);
        board.unmake(&mut mv).unwrap();
        assert!(board.castling_rights[WHITE_KING_SIDE]);
    }

    #[test]
    fn test_make_move_promotion() {
        let mut board = ChessBoard::from_fen("8/2P5/1p6/8/8/p7/PP6/k6K w - - 0 1").unwrap();
        let mut mv = legal(&board, "c7c8");
        assert_eq!(mv.promotion, Some(PieceType::Queen));
        board.make(&mut mv).unwrap();
        assert_eq!(board.square(field("c8")), Square::Occupied(Piece::new(Color::White, PieceType::Queen)));
        board.unmake(&mut mv).unwrap();
        assert_eq!(board.square(field("c7")), Square::Occupied(Piece::new(Color::White, PieceType::Pawn)));
        assert_eq!(board.square(field("c8")), Square::Empty);
    }

    #[test]
    fn test_caller_chosen_under_promotion() {
        let mut board = ChessBoard::from_fen("3r4/2P5/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let before = board.clone();
        let mut mv = legal(&board, "c7d8");
        mv.set_promotion(PieceType::Knight);
        board.make(&mut mv).unwrap();
        assert_eq!(board.square(field("d8")), Square::Occupied(Piece::new(Color::White, PieceType::Knight)));
        board.unmake(&mut mv).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_en_passant_capture_removes_passed_pawn() {
        let fen = "r3k2r/p2pqpb1/bn2pnp1/2pPN3/1pB1P3/2N2Q1p/PPPB1PPP/R3K2R w KQkq c6 0 2";
        let mut board = ChessBoard::from_fen(fen).unwrap();
        let before = board.clone();
        let mut mv = legal(&board, "d5c6");
        assert!(mv.is_en_passant);
        board.make(&mut mv).unwrap();
        assert_eq!(board.square(field("c5")), Square::Empty);
        assert_eq!(board.square(field("c6")), Square::Occupied(Piece::new(Color::White, PieceType::Pawn)));
        board.unmake(&mut mv).unwrap();
        assert_eq!(board, before);
        assert_eq!(board.square(field("c5")), Square::Occupied(Piece::new(Color::Black, PieceType::Pawn)));
        assert_eq!(board.square(field("c6")), Square::Empty);

        // black capturing towards rank 3
        let mut board = ChessBoard::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        let mut mv = legal(&board, "e4d3");
        assert!(mv.is_en_passant);
        board.make(&mut mv).unwrap();
        assert_eq!(board.square(field("d4")), Square::Empty);
        assert_eq!(board.square(field("d3")), Square::Occupied(Piece::new(Color::Black, PieceType::Pawn)));
    }

    #[test]
    fn test_unmake_round_trips() {
        let cases = [
            (fen::INITIAL_POSITION, "e2e4"),
            (fen::INITIAL_POSITION, "g1f3"),
            ("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1", "e1g1"),
            ("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1", "e1c1"),
            ("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1", "e8g8"),
            ("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1", "e8c8"),
            ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", "e5f7"),
            ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", "e2a6"),
            ("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1", "g2h1"),
            ("rnbq1k1r/pp1Pbppp/2p5/8/2B5/P7/1PP1NnPP/RNBQK2R b KQ - 0 8", "f2h1"),
        ];
        for (fen, uci) in cases {
            assert_round_trip(fen, uci);
        }
    }

    #[test]
    fn test_protocol_misuse_fails_fast() {
        let mut board = ChessBoard::standard();
        let before = board.clone();

        let mut never_made = legal(&board, "e2e4");
        assert_eq!(board.unmake(&mut never_made), Err(ChessError::MoveNotMade("e2e4".to_string())));
        assert_eq!(board, before);

        let mut e4 = legal(&board, "e2e4");
        board.make(&mut e4).unwrap();
        let after_e4 = board.clone();
        assert_eq!(board.make(&mut e4), Err(ChessError::MoveAlreadyMade("e2e4".to_string())));
        assert_eq!(board, after_e4);

        let mut e5 = legal(&board, "e7e5");
        board.make(&mut e5).unwrap();
        assert!(matches!(
            board.unmake(&mut e4),
            Err(ChessError::UnmakeOutOfOrder { move_ply: 1, board_ply: 2, .. })
        ));
        assert!(e4.is_made());

        board.unmake(&mut e5).unwrap();
        board.unmake(&mut e4).unwrap();
        assert_eq!(board, before);

        let mut from_empty = Move::new(field("e4"), field("e5"));
        assert!(matches!(board.make(&mut from_empty), Err(ChessError::IllegalMove(_))));
        assert_eq!(board, before);
    }

    #[test]
    fn test_stale_copy_of_unmade_move_is_rejected() {
        let mut board = ChessBoard::standard();
        let mut e4 = legal(&board, "e2e4");
        board.make(&mut e4).unwrap();
        let mut stale = e4.clone();
        board.unmake(&mut e4).unwrap();

        // same ply as the stale copy, but a different move
        let mut nf3 = legal(&board, "g1f3");
        board.make(&mut nf3).unwrap();
        let after_nf3 = board.clone();
        assert!(matches!(
            board.unmake(&mut stale),
            Err(ChessError::UnmakeOutOfOrder { move_ply: 1, board_ply: 1, .. })
        ));
        assert_eq!(board, after_nf3);
        assert!(stale.is_made());

        board.unmake(&mut nf3).unwrap();
        assert_eq!(board, ChessBoard::standard());
    }

    #[test]
    fn test_move_made_on_another_board_is_rejected() {
        let mut first = ChessBoard::standard();
        let mut second = ChessBoard::standard();
        let mut e4 = legal(&first, "e2e4");
        let mut d4 = legal(&second, "d2d4");
        first.make(&mut e4).unwrap();
        second.make(&mut d4).unwrap();

        let first_after_e4 = first.clone();
        assert!(matches!(
            first.unmake(&mut d4),
            Err(ChessError::UnmakeOutOfOrder { move_ply: 1, board_ply: 1, .. })
        ));
        assert_eq!(first, first_after_e4);
        assert!(e4.is_made());
        assert!(d4.is_made());

        second.unmake(&mut d4).unwrap();
        first.unmake(&mut e4).unwrap();
        assert_eq!(first, ChessBoard::standard());
        assert_eq!(second, ChessBoard::standard());
    }

    #[test]
    fn test_copy_of_board_shares_pending_moves() {
        let mut board = ChessBoard::standard();
        let mut e4 = legal(&board, "e2e4");
        board.make(&mut e4).unwrap();

        // the copy holds the same position and history, so it may take e4 back
        let mut copy = board.copy();
        let mut e4_for_copy = e4.clone();
        copy.unmake(&mut e4_for_copy).unwrap();
        assert_eq!(copy, ChessBoard::standard());

        board.unmake(&mut e4).unwrap();
        assert_eq!(board, ChessBoard::standard());
    }

    #[test]
    fn test_if_field_is_attacked() {
        let board = ChessBoard::from_fen("8/2P5/8/8/8/8/3p4/8 w - - 0 1").unwrap();
        assert!(board.is_square_attacked_by_color(field("b8"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("c8"), Color::White));
        assert!(board.is_square_attacked_by_color(field("d8"), Color::White));

        assert!(board.is_square_attacked_by_color(field("c1"), Color::Black));
        assert!(!board.is_square_attacked_by_color(field("d1"), Color::Black));
        assert!(board.is_square_attacked_by_color(field("e1"), Color::Black));
        assert!(!board.is_square_attacked(field("b8")));
        assert!(board.is_square_attacked(field("e1")));
    }

    #[test]
    fn test_attacks_do_not_wrap_or_pass_blockers() {
        // pawn on h5 must not attack a-file squares
        let board = ChessBoard::from_fen("8/8/8/7P/8/8/8/8 w - - 0 1").unwrap();
        assert!(board.is_square_attacked_by_color(field("g6"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("a7"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("a6"), Color::White));

        let board = ChessBoard::from_fen("8/8/8/8/8/8/8/R1n4N w - - 0 1").unwrap();
        assert!(board.is_square_attacked_by_color(field("b1"), Color::White));
        assert!(board.is_square_attacked_by_color(field("c1"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("d1"), Color::White));
        assert!(board.is_square_attacked_by_color(field("a2"), Color::White));

        // a lone knight on h1 jumps to g3 and f2 only
        let board = ChessBoard::from_fen("8/8/8/8/8/8/8/7N w - - 0 1").unwrap();
        assert!(board.is_square_attacked_by_color(field("g3"), Color::White));
        assert!(board.is_square_attacked_by_color(field("f2"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("a2"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("b3"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("h3"), Color::White));

        // the king on e5 stops the bishop's diagonal
        let board = ChessBoard::from_fen("8/8/8/4k3/8/8/8/B7 w - - 0 1").unwrap();
        assert!(board.is_square_attacked_by_color(field("d4"), Color::White));
        assert!(board.is_square_attacked_by_color(field("e5"), Color::White));
        assert!(!board.is_square_attacked_by_color(field("f6"), Color::White));
        assert!(board.is_square_attacked_by_color(field("f6"), Color::Black));
        assert!(!board.is_square_attacked_by_color(field("g7"), Color::Black));
    }

    #[test]
    fn test_is_check() {
        let board = ChessBoard::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        assert!(board.is_check(Color::White));
        assert!(!board.is_check(Color::Black));

        let board = ChessBoard::from_fen("4k3/8/8/8/8/8/4P3/4K2r w - - 0 1").unwrap();
        assert!(board.is_check(Color::White));
        let board = ChessBoard::from_fen("4k3/8/8/8/8/8/8/4KP1r w - - 0 1").unwrap();
        assert!(!board.is_check(Color::White));
    }

    #[test]
    fn test_missing_king_counts_as_check() {
        let board = ChessBoard::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!board.is_check(Color::White));
        assert!(board.is_check(Color::Black));
    }

    #[test]
    fn test_render() {
        let rendered = ChessBoard::standard().render_to_string();
        assert!(rendered.starts_with("    a   b   c   d   e   f   g   h"));
        assert!(rendered.contains("8 │ r │ n │ b │ q │ k │ b │ n │ r │ 8"));
        assert!(rendered.contains("1 │ R │ N │ B │ Q │ K │ B │ N │ R │ 1"));
    }
}
