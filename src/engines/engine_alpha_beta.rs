use super::evaluation::evaluate;
use crate::chess_board::{ChessBoard, Move};
use crate::errors::{ChessError, ChessResult};

pub const INF: i32 = 100_000_000;
/// Score of a position whose side to move is checkmated. The same for every
/// distance to mate.
pub const MATED: i32 = -INF + 100;
const DRAW: i32 = 0;

/// Fixed-depth negamax search with alpha-beta pruning.
///
/// The engine keeps no state between searches apart from the statistics of
/// the last one.
#[derive(Debug, Default)]
pub struct AlphaBetaEngine {
    node_count: u64,
    best_value: Option<i32>,
}

impl AlphaBetaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions visited by the last search, root included.
    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    /// Side-relative value of the move returned by the last search.
    pub fn best_value(&self) -> Option<i32> {
        self.best_value
    }

    /// Searches `depth` plies and returns the best move for the side to move,
    /// or `None` when it has no legal move.
    ///
    /// The board is mutated with make/unmake during the search and is back
    /// in its original state afterwards. Progress lines go to `log`.
    pub fn get_best_move(
        &mut self,
        board: &mut ChessBoard,
        depth: u32,
        log: &mut dyn FnMut(&str),
    ) -> ChessResult<Option<Move>> {
        if depth == 0 {
            return Err(ChessError::InvalidDepth(depth));
        }
        self.node_count = 1;
        self.best_value = None;

        let mut moves = board.generate_legal_moves();
        log(&format!("Found {} legal moves.", moves.len()));
        order_moves(board, &mut moves);

        let mut best_move: Option<Move> = None;
        let mut best_value = -INF;
        let mut alpha = -INF;
        let beta = INF;

        for mut mv in moves {
            board.make(&mut mv)?;
            let value = -self.negamax(board, depth - 1, -beta, -alpha)?;
            board.unmake(&mut mv)?;

            if best_move.is_none() || value > best_value {
                best_value = value;
                log(&format!("New best move: {} value={}", mv, value));
                best_move = Some(mv);
            }
            alpha = alpha.max(value);
        }

        if best_move.is_some() {
            self.best_value = Some(best_value);
        }
        Ok(best_move)
    }

    fn negamax(&mut self, board: &mut ChessBoard, depth: u32, alpha: i32, beta: i32) -> ChessResult<i32> {
        self.node_count += 1;
        if depth == 0 {
            return Ok(evaluate(board));
        }

        let moves = board.generate_legal_moves();
        if moves.is_empty() {
            // Handle checkmate or stalemate
            return Ok(if board.is_check(board.active_color) { MATED } else { DRAW });
        }

        let mut alpha = alpha;
        for mut mv in moves {
            board.make(&mut mv)?;
            let value = -self.negamax(board, depth - 1, -beta, -alpha)?;
            board.unmake(&mut mv)?;

            if value >= beta {
                // Beta cutoff fail hard
                return Ok(beta);
            }
            alpha = alpha.max(value);
        }
        Ok(alpha)
    }
}

/// Captures first. Ordering within both groups is kept.
pub fn order_moves(board: &ChessBoard, moves: &mut [Move]) {
    moves.sort_by_key(|mv| board.square(mv.to).is_empty());
}
