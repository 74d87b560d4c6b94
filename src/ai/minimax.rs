//! Minimax AI 策略
//!
//! 带 Alpha-Beta 剪枝的定深搜索。吃子走法在搜索中按"整条链算一步"处理：
//! 执行第一跳后，若落点仍有吃子机会，则以最长后续链（并列取先枚举者）
//! 补完整条链再进入下一层。

use super::{evaluate, sort_and_truncate, AIStrategy, ScoredMove, NODE_COUNT};
use crate::board::Board;
use crate::captures::longest_capture_sequence;
use crate::types::{Move, Side};
use log::debug;
use rand::prelude::*;
use std::sync::atomic::Ordering;

/// 无棋可走的终局分数（对走子方近似必败）
const TERMINAL_SCORE: f64 = 1000.0;

/// Minimax AI - 使用 Alpha-Beta 剪枝
pub struct MinimaxAI {
    depth: u32,
    seed: Option<u64>,
}

impl MinimaxAI {
    pub fn new(depth: u32, seed: Option<u64>) -> Self {
        MinimaxAI { depth, seed }
    }

    fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        }
    }
}

/// 执行第一跳；若为吃子则以最长后续链补完整条链
///
/// 搜索专用：把多跳吃子当作一个整体回合评估
fn play_with_chain(board: &Board, mv: Move) -> Board {
    let pieces_before = board.piece_count(Side::Light) + board.piece_count(Side::Dark);
    let mut next = board.execute_move(mv.from, mv.to);
    let was_capture =
        next.piece_count(Side::Light) + next.piece_count(Side::Dark) < pieces_before;

    if was_capture {
        if let Some(chain) = longest_capture_sequence(&next, mv.to) {
            let mut cursor = chain[0];
            for &hop in &chain[1..] {
                next = next.execute_move(cursor, hop);
                cursor = hop;
            }
        }
    }
    next
}

/// Minimax 搜索（带 Alpha-Beta 剪枝）
///
/// `machine` 是评估视角方；depth 为 0 时返回静态评估，
/// 无棋可走时返回 ±TERMINAL_SCORE（符号按 maximizing）
pub fn minimax(
    board: &Board,
    depth: u32,
    mut alpha: f64,
    mut beta: f64,
    maximizing: bool,
    to_move: Side,
    machine: Side,
) -> f64 {
    NODE_COUNT.fetch_add(1, Ordering::Relaxed);

    if depth == 0 {
        return evaluate(board, machine);
    }

    let moves = board.all_legal_moves(to_move);
    if moves.is_empty() {
        // 走子方无棋可走：对其近似必败
        return if maximizing {
            -TERMINAL_SCORE
        } else {
            TERMINAL_SCORE
        };
    }

    if maximizing {
        let mut max_eval = f64::NEG_INFINITY;
        for mv in moves {
            let next = play_with_chain(board, mv);
            let eval = minimax(
                &next,
                depth - 1,
                alpha,
                beta,
                false,
                to_move.opposite(),
                machine,
            );
            max_eval = max_eval.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        max_eval
    } else {
        let mut min_eval = f64::INFINITY;
        for mv in moves {
            let next = play_with_chain(board, mv);
            let eval = minimax(
                &next,
                depth - 1,
                alpha,
                beta,
                true,
                to_move.opposite(),
                machine,
            );
            min_eval = min_eval.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        min_eval
    }
}

impl AIStrategy for MinimaxAI {
    fn select_moves(&self, board: &Board, side: Side, n: usize) -> Vec<ScoredMove> {
        let moves = board.all_legal_moves(side);

        let mut scored: Vec<ScoredMove> = moves
            .into_iter()
            .map(|mv| {
                let next = play_with_chain(board, mv);
                let score = minimax(
                    &next,
                    self.depth - 1,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    false,
                    side.opposite(),
                    side,
                );
                ScoredMove { mv, score }
            })
            .collect();

        sort_and_truncate(&mut scored, n);
        scored
    }

    fn select_best_move(&self, board: &Board, side: Side) -> Option<Move> {
        let moves = board.all_legal_moves(side);
        if moves.is_empty() {
            return None;
        }

        // 兜底走法随机选取；之后只有严格更高的分数才会替换，
        // 因此固定枚举顺序下结果是确定的
        let mut rng = self.make_rng();
        let mut best_move = *moves.choose(&mut rng).expect("moves is non-empty");
        let mut best_score = f64::NEG_INFINITY;

        for &mv in &moves {
            let next = play_with_chain(board, mv);
            let score = minimax(
                &next,
                self.depth - 1,
                f64::NEG_INFINITY,
                f64::INFINITY,
                false,
                side.opposite(),
                side,
            );
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }

        debug!(
            "minimax depth={} side={} best={} score={:.2} nodes={}",
            self.depth,
            side,
            best_move,
            best_score,
            NODE_COUNT.load(Ordering::Relaxed)
        );
        Some(best_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, Position};

    #[test]
    fn test_depth_zero_is_static_eval() {
        let board = Board::initial();
        let score = minimax(
            &board,
            0,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            Side::Dark,
            Side::Dark,
        );
        assert_eq!(score, evaluate(&board, Side::Dark));
    }

    #[test]
    fn test_terminal_score_for_moveless_side() {
        // 空棋盘：双方都无棋可走
        let board = Board::empty();
        let max_view = minimax(
            &board,
            3,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            Side::Dark,
            Side::Dark,
        );
        assert_eq!(max_view, -TERMINAL_SCORE);

        let min_view = minimax(
            &board,
            3,
            f64::NEG_INFINITY,
            f64::INFINITY,
            false,
            Side::Light,
            Side::Dark,
        );
        assert_eq!(min_view, TERMINAL_SCORE);
    }

    #[test]
    fn test_search_prefers_capture_gain() {
        // Dark 可以安全吃掉一枚 Light 兵
        let mut board = Board::empty();
        board.set(Position::new(5, 4), Some(Piece::man(Side::Dark)));
        board.set(Position::new(4, 3), Some(Piece::man(Side::Light)));
        board.set(Position::new(9, 0), Some(Piece::man(Side::Dark)));
        board.set(Position::new(0, 9), Some(Piece::man(Side::Light)));

        let ai = MinimaxAI::new(3, Some(1));
        let mv = ai.select_best_move(&board, Side::Dark).unwrap();
        assert_eq!(mv, Move::new(Position::new(5, 4), Position::new(3, 2)));
    }

    #[test]
    fn test_full_chain_counts_as_one_ply() {
        // 第一跳后还有一跳：play_with_chain 应吃掉两枚
        let mut board = Board::empty();
        board.set(Position::new(3, 2), Some(Piece::man(Side::Light)));
        board.set(Position::new(4, 3), Some(Piece::man(Side::Dark)));
        board.set(Position::new(6, 5), Some(Piece::man(Side::Dark)));

        let after = play_with_chain(&board, Move::new(Position::new(3, 2), Position::new(5, 4)));
        assert_eq!(after.piece_count(Side::Dark), 0);
        assert_eq!(
            after.get(Position::new(7, 6)),
            Some(Piece::man(Side::Light))
        );
    }

    #[test]
    fn test_select_best_move_deterministic() {
        let board = Board::initial();
        let ai = MinimaxAI::new(3, Some(99));
        let first = ai.select_best_move(&board, Side::Dark);
        let second = ai.select_best_move(&board, Side::Dark);
        assert_eq!(first, second);
    }
}
