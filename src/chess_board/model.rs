use std::fmt;

use crate::errors::{ChessError, ChessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

/// Contents of one of the 64 squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    Occupied(Piece),
    Empty,
}

impl Square {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Square::Occupied(piece) => Some(*piece),
            Square::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Square::Empty)
    }

    pub fn has_color(&self, color: Color) -> bool {
        matches!(self, Square::Occupied(piece) if piece.color == color)
    }
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { color, kind })
    }
}

/// A square index in `0..64`, row-major. Row 0 is rank 8 (black's back rank),
/// row 7 is rank 1 (white's back rank).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct ChessField(u8);

impl ChessField {
    pub const fn new(row: u8, col: u8) -> Self {
        Self(row * 8 + col)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn row(&self) -> u8 {
        self.0 / 8
    }

    pub fn col(&self) -> u8 {
        self.0 % 8
    }

    /// The field `d_row` rows and `d_col` columns away, or `None` when that
    /// leaves the board. Never wraps around a board edge.
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = ChessField> {
        (0..64u8).map(ChessField)
    }

    pub fn from_algebraic(algebraic: &str) -> ChessResult<Self> {
        let bytes = algebraic.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(algebraic.to_string()));
        }
        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ChessError::InvalidSquare(algebraic.to_string()));
        }
        Ok(Self::new(b'8' - rank, file - b'a'))
    }

    pub fn as_algebraic(&self) -> String {
        let file = (b'a' + self.col()) as char;
        let rank = (b'8' - self.row()) as char;
        format!("{}{}", file, rank)
    }
}

impl fmt::Display for ChessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

/// State a `make` overwrites, kept on the move so `unmake` can put it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Undo {
    pub moved: Piece,
    pub captured: Square,
    pub active_color: Color,
    pub en_passant_file: Option<u8>,
    pub castling_rights: [bool; 4],
    pub last_move: Option<(ChessField, ChessField)>,
    /// Board ply right after the make.
    pub ply: u32,
    /// Identifies the make that filled this payload.
    pub serial: u64,
}

/// A transition between two fields plus the flags needed to replay it.
///
/// A move produced by the generator is "fresh". `ChessBoard::make` fills in
/// its undo payload and `ChessBoard::unmake` consumes it again, so the same
/// value can be made once, then unmade once, then reused.
#[derive(Debug, Clone)]
pub struct Move {
    pub from: ChessField,
    pub to: ChessField,
    pub promotion: Option<PieceType>,
    pub is_castle: bool,
    pub is_en_passant: bool,
    pub(crate) undo: Option<Undo>,
}

// The undo payload is bookkeeping, two moves are equal when they describe
// the same transition.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.promotion == other.promotion
            && self.is_castle == other.is_castle
            && self.is_en_passant == other.is_en_passant
    }
}

impl Eq for Move {}

impl Move {
    pub fn new(from: ChessField, to: ChessField) -> Self {
        Self {
            from,
            to,
            promotion: None,
            is_castle: false,
            is_en_passant: false,
            undo: None,
        }
    }

    pub fn castle(from: ChessField, to: ChessField) -> Self {
        Self {
            is_castle: true,
            ..Self::new(from, to)
        }
    }

    pub fn en_passant(from: ChessField, to: ChessField) -> Self {
        Self {
            is_en_passant: true,
            ..Self::new(from, to)
        }
    }

    pub fn with_promotion(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// Replaces the default queen promotion of a generated move. Must be
    /// called before the move is made.
    pub fn set_promotion(&mut self, promotion: PieceType) {
        self.promotion = Some(promotion);
    }

    /// True between a `make` and its matching `unmake`.
    pub fn is_made(&self) -> bool {
        self.undo.is_some()
    }

    pub fn as_algebraic(&self) -> String {
        let base_move = format!("{}{}", self.from.as_algebraic(), self.to.as_algebraic());
        if let Some(promo) = self.promotion {
            base_move + &promo.to_string().to_lowercase()
        } else {
            base_move
        }
    }

    /// Parses coordinate notation like `e2e4` or `e7e8n`.
    ///
    /// Only the coordinates and the promotion piece are known afterwards, use
    /// `ChessBoard::find_legal_move` to get the castle and en passant flags.
    pub fn from_algebraic(algebraic: &str) -> ChessResult<Self> {
        if !algebraic.is_ascii() || !(4..=5).contains(&algebraic.len()) {
            return Err(ChessError::InvalidMove(algebraic.to_string()));
        }
        let from = ChessField::from_algebraic(&algebraic[0..2])?;
        let to = ChessField::from_algebraic(&algebraic[2..4])?;

        let promotion = match algebraic.chars().nth(4) {
            None => None,
            Some(c) => match c.to_ascii_lowercase() {
                'q' => Some(PieceType::Queen),
                'r' => Some(PieceType::Rook),
                'b' => Some(PieceType::Bishop),
                'n' => Some(PieceType::Knight),
                _ => return Err(ChessError::InvalidMove(algebraic.to_string())),
            },
        };
        Ok(Self {
            promotion,
            ..Self::new(from, to)
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}
