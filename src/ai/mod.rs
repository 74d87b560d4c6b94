//! AI 策略模块
//!
//! 提供按难度分级的机器走法选择：beginner 纯随机，
//! 其余难度使用带 Alpha-Beta 剪枝的 Minimax 搜索

mod eval;
mod minimax;
mod random;

pub use eval::evaluate;
pub use minimax::{minimax, MinimaxAI};
pub use random::RandomAI;

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::board::Board;
use crate::fen::parse_fen;
use crate::types::{Difficulty, Move, Side};

/// 全局节点计数器
pub static NODE_COUNT: AtomicU64 = AtomicU64::new(0);

/// 重置节点计数器
pub fn reset_node_count() {
    NODE_COUNT.store(0, AtomicOrdering::Relaxed);
}

/// 获取当前节点计数
pub fn get_node_count() -> u64 {
    NODE_COUNT.load(AtomicOrdering::Relaxed)
}

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// 难度等级（决定搜索深度）
    pub difficulty: Difficulty,
    /// 随机种子（随机落子与并列兜底用）
    pub seed: Option<u64>,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            difficulty: Difficulty::Intermediate,
            seed: None,
        }
    }
}

/// 走法评分
#[derive(Debug, Clone)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f64,
}

/// AI 策略接口
pub trait AIStrategy {
    /// 为 `side` 选择走法（返回带评分的走法列表，按分数降序）
    fn select_moves(&self, board: &Board, side: Side, n: usize) -> Vec<ScoredMove>;

    /// 选择最佳走法；无棋可走时返回 None
    fn select_best_move(&self, board: &Board, side: Side) -> Option<Move> {
        self.select_moves(board, side, 1).first().map(|sm| sm.mv)
    }
}

/// 排序辅助函数
pub(crate) fn sort_and_truncate(scored: &mut Vec<ScoredMove>, n: usize) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(n);
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 按难度创建：beginner 随机，其余按深度映射使用 Minimax
    pub fn from_difficulty(config: &AIConfig) -> Self {
        let strategy: Box<dyn AIStrategy> = match config.difficulty.search_depth() {
            None => Box::new(RandomAI::new(config.seed)),
            Some(depth) => Box::new(MinimaxAI::new(depth, config.seed)),
        };
        AIEngine { strategy }
    }

    /// 选择最佳走法
    pub fn select_best_move(&self, board: &Board, side: Side) -> Option<Move> {
        self.strategy.select_best_move(board, side)
    }

    /// 选择走法（带评分）
    pub fn select_moves(&self, board: &Board, side: Side, n: usize) -> Vec<ScoredMove> {
        self.strategy.select_moves(board, side, n)
    }

    /// 从 FEN 选择走法（返回带评分的走法字符串）
    pub fn select_moves_fen(&self, fen: &str, n: usize) -> Result<Vec<(String, f64)>, String> {
        let state = parse_fen(fen)?;
        let moves = self.strategy.select_moves(&state.board, state.turn, n);
        Ok(moves
            .into_iter()
            .map(|sm| (sm.mv.to_fen_str(), sm.score))
            .collect())
    }

    /// 从 FEN 选择最佳走法
    pub fn select_best_move_fen(&self, fen: &str) -> Result<Option<String>, String> {
        let state = parse_fen(fen)?;
        Ok(self
            .strategy
            .select_best_move(&state.board, state.turn)
            .map(|m| m.to_fen_str()))
    }
}

/// 为机器方选择走法；无棋可走时返回 None（表示机器方落败）
pub fn make_ai_move(
    board: &Board,
    side: Side,
    difficulty: Difficulty,
    seed: Option<u64>,
) -> Option<Move> {
    let engine = AIEngine::from_difficulty(&AIConfig { difficulty, seed });
    engine.select_best_move(board, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::initial_fen;
    use crate::types::Position;

    #[test]
    fn test_random_ai_from_initial() {
        let config = AIConfig {
            difficulty: Difficulty::Beginner,
            seed: Some(42),
        };
        let ai = AIEngine::from_difficulty(&config);
        let moves = ai.select_moves_fen(&initial_fen(), 5).unwrap();
        assert_eq!(moves.len(), 5);
    }

    #[test]
    fn test_minimax_ai_from_initial() {
        let config = AIConfig {
            difficulty: Difficulty::Intermediate,
            seed: Some(42),
        };
        let ai = AIEngine::from_difficulty(&config);
        let best = ai.select_best_move_fen(&initial_fen()).unwrap();
        assert!(best.is_some());
    }

    #[test]
    fn test_no_legal_move_returns_none() {
        // Dark 只剩一枚被完全封死的兵
        let fen = "10/10/10/10/10/10/10/2M7/1M8/m9 d";
        let state = parse_fen(fen).unwrap();
        assert!(state.board.all_legal_moves(Side::Dark).is_empty());
        assert_eq!(
            make_ai_move(&state.board, Side::Dark, Difficulty::Intermediate, Some(1)),
            None
        );
    }

    #[test]
    fn test_ai_determinism_at_intermediate() {
        let board = Board::initial();
        let first = make_ai_move(&board, Side::Dark, Difficulty::Intermediate, Some(7));
        for _ in 0..3 {
            let again = make_ai_move(&board, Side::Dark, Difficulty::Intermediate, Some(7));
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_mandatory_capture_is_taken() {
        // Dark 有一个必吃跳：(5,4) 跳过 (4,3) 落 (3,2)
        let fen = "10/10/10/10/3M6/4m5/10/10/10/10 d";
        let state = parse_fen(fen).unwrap();
        let mv = make_ai_move(&state.board, Side::Dark, Difficulty::Intermediate, Some(1)).unwrap();
        assert_eq!(mv.from, Position::new(5, 4));
        assert_eq!(mv.to, Position::new(3, 2));
    }
}
