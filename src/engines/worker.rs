use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::AlphaBetaEngine;
use crate::chess_board::{ChessBoard, Move};
use crate::errors::{ChessError, ChessResult};

/// What a finished background search delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    /// Side-relative value of `best_move`.
    pub value: Option<i32>,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// A search running on its own thread. Log lines and the result arrive over
/// channels so the caller's thread is never blocked by the search itself.
pub struct SearchHandle {
    log_receiver: Receiver<String>,
    result_receiver: Receiver<ChessResult<SearchOutcome>>,
    thread: JoinHandle<()>,
}

/// Starts a search of `depth` plies on `board`. The worker owns the board,
/// pass it a copy of the game position.
pub fn spawn_search(board: ChessBoard, depth: u32) -> SearchHandle {
    let (log_sender, log_receiver) = mpsc::channel::<String>();
    let (result_sender, result_receiver) = mpsc::channel();

    let thread = thread::spawn(move || {
        let mut board = board;
        let mut engine = AlphaBetaEngine::new();
        let start_time = Instant::now();
        tracing::debug!(depth, "search worker started");

        let result = engine
            .get_best_move(&mut board, depth, &mut |line: &str| {
                // the receiver may already be gone, the search runs to completion anyway
                let _ = log_sender.send(line.to_string());
            })
            .map(|best_move| SearchOutcome {
                best_move,
                value: engine.best_value(),
                nodes: engine.node_count(),
                elapsed: start_time.elapsed(),
            });
        drop(log_sender);

        tracing::debug!(elapsed = ?start_time.elapsed(), nodes = engine.node_count(), "search worker finished");
        let _ = result_sender.send(result);
    });

    SearchHandle {
        log_receiver,
        result_receiver,
        thread,
    }
}

impl SearchHandle {
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Blocks until the search completes. Log lines are handed to `on_log`
    /// on the calling thread in the order the search produced them.
    pub fn wait(self, mut on_log: impl FnMut(&str)) -> ChessResult<SearchOutcome> {
        for line in self.log_receiver.iter() {
            on_log(&line);
        }
        let result = self.result_receiver.recv();
        if self.thread.join().is_err() {
            return Err(ChessError::SearchWorker("search thread panicked".to_string()));
        }
        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(ChessError::SearchWorker("worker exited without a result".to_string())),
        }
    }
}
