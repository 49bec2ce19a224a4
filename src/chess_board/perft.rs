use super::{ChessBoard, Move};
use crate::errors::ChessResult;

impl ChessBoard {
    /// Counts the leaf nodes of the legal move tree `depth` plies deep.
    ///
    /// Walks the tree with `make`/`unmake` on this board, which is restored
    /// when the count returns.
    pub fn perft(&mut self, depth: u8) -> ChessResult<u64> {
        if depth == 0 {
            return Ok(1);
        }

        let mut node_count = 0u64;
        for mut mv in self.generate_legal_moves() {
            if depth == 1 {
                node_count += 1;
                continue;
            }
            self.make(&mut mv)?;
            node_count += self.perft(depth - 1)?;
            self.unmake(&mut mv)?;
        }
        Ok(node_count)
    }

    /// Perft split by root move, in generation order.
    pub fn perft_divide(&mut self, depth: u8) -> ChessResult<Vec<(Move, u64)>> {
        let mut result = Vec::new();
        if depth == 0 {
            return Ok(result);
        }
        for mut mv in self.generate_legal_moves() {
            self.make(&mut mv)?;
            let count = self.perft(depth - 1)?;
            self.unmake(&mut mv)?;
            result.push((mv, count));
        }
        Ok(result)
    }
}
