//! 静态局面评估
//!
//! 纯函数，无副作用；正分对 machine 方有利。评估本身不判定终局，
//! 无棋可走的终局分数由搜索层给出。

use crate::board::{Board, PLAYABLE_SQUARES};
use crate::types::Side;

/// 评估局面，正分对 `machine` 方有利
///
/// 子力：兵 1 分、王 3 分，己方为正对方为负；
/// machine 方棋子另加推进奖励（每前进一行 +0.1）和
/// 中心列奖励（(5 - |col - 4.5|) * 0.05）
pub fn evaluate(board: &Board, machine: Side) -> f64 {
    let mut score = 0.0;

    for &pos in PLAYABLE_SQUARES.iter() {
        let piece = match board.get(pos) {
            Some(p) => p,
            None => continue,
        };

        let value = piece.rank.value();
        if piece.side == machine {
            score += value;
        } else {
            score -= value;
        }

        if piece.side == machine {
            // 推进奖励：从己方底线算起前进的行数
            let advanced = match machine {
                Side::Light => pos.row as f64,
                Side::Dark => (9 - pos.row) as f64,
            };
            score += advanced * 0.1;

            // 中心列奖励
            let center_distance = (pos.col as f64 - 4.5).abs();
            score += (5.0 - center_distance) * 0.05;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, Position};

    #[test]
    fn test_initial_position_is_balanced_in_material() {
        let board = Board::initial();
        let score = evaluate(&board, Side::Dark);
        // 子力相等，残差只来自位置奖励项
        let light_view = evaluate(&board, Side::Light);
        assert!(score.abs() < 10.0);
        assert!((score - light_view).abs() < 1e-9);
    }

    #[test]
    fn test_material_advantage() {
        let mut board = Board::empty();
        board.set(Position::new(5, 4), Some(Piece::man(Side::Dark)));
        board.set(Position::new(6, 5), Some(Piece::man(Side::Dark)));
        board.set(Position::new(3, 2), Some(Piece::man(Side::Light)));

        assert!(evaluate(&board, Side::Dark) > 0.0);
        assert!(evaluate(&board, Side::Light) < 0.0);
    }

    #[test]
    fn test_king_worth_more_than_man() {
        let mut man_board = Board::empty();
        man_board.set(Position::new(5, 4), Some(Piece::man(Side::Dark)));
        let mut king_board = Board::empty();
        king_board.set(Position::new(5, 4), Some(Piece::king(Side::Dark)));

        assert!(evaluate(&king_board, Side::Dark) > evaluate(&man_board, Side::Dark));
    }

    #[test]
    fn test_advancement_bonus() {
        let mut back = Board::empty();
        back.set(Position::new(8, 3), Some(Piece::man(Side::Dark)));
        let mut forward = Board::empty();
        forward.set(Position::new(2, 3), Some(Piece::man(Side::Dark)));

        assert!(evaluate(&forward, Side::Dark) > evaluate(&back, Side::Dark));
    }

    #[test]
    fn test_evaluate_is_pure() {
        let board = Board::initial();
        let first = evaluate(&board, Side::Dark);
        let second = evaluate(&board, Side::Dark);
        assert_eq!(first, second);
    }
}
