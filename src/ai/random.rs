//! 随机 AI 策略（beginner 难度）

use super::{sort_and_truncate, AIStrategy, ScoredMove};
use crate::board::Board;
use crate::types::Side;
use rand::prelude::*;

/// 随机 AI - 在合法走法中均匀随机选择
pub struct RandomAI {
    seed: Option<u64>,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        RandomAI { seed }
    }
}

impl AIStrategy for RandomAI {
    fn select_moves(&self, board: &Board, side: Side, n: usize) -> Vec<ScoredMove> {
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut scored: Vec<ScoredMove> = board
            .all_legal_moves(side)
            .into_iter()
            .map(|mv| ScoredMove {
                mv,
                score: rng.gen::<f64>(),
            })
            .collect();

        sort_and_truncate(&mut scored, n);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let board = Board::initial();
        let ai = RandomAI::new(Some(42));
        let first = ai.select_best_move(&board, Side::Light);
        let second = ai.select_best_move(&board, Side::Light);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_only_legal_moves_selected() {
        let board = Board::initial();
        let legal = board.all_legal_moves(Side::Light);
        let ai = RandomAI::new(Some(7));
        for sm in ai.select_moves(&board, Side::Light, 10) {
            assert!(legal.contains(&sm.mv));
        }
    }
}
