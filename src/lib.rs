//! International Draughts (10×10) Rules & AI Engine
//!
//! 国际跳棋规则与 AI 引擎 - 支持 FEN 输入输出

pub mod ai;
pub mod board;
pub mod captures;
pub mod fen;
pub mod game;
pub mod types;

pub use ai::{
    evaluate, get_node_count, make_ai_move, minimax, reset_node_count, AIConfig, AIEngine,
    AIStrategy, MinimaxAI, RandomAI, ScoredMove,
};
pub use board::{promote_if_eligible, Board, PLAYABLE_SQUARES};
pub use captures::{can_capture, find_capture_sequences, longest_capture_sequence};
pub use fen::{board_to_fen, initial_fen, parse_fen, to_fen, FenState};
pub use game::{ClickOutcome, Game, RejectReason, Snapshot};
pub use types::{CaptureSequence, Difficulty, Move, Piece, Position, Rank, Side};
