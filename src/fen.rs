//! FEN 解析和生成
//!
//! 跳棋局面记法
//!
//! 格式: `<棋盘> <回合>`
//!
//! 棋盘部分从 0 行到 9 行，以 `/` 分隔：
//! - Light 方：M(兵) K(王)
//! - Dark 方：m(兵) k(王)
//! - 空格：十进制数字（整行空为 `10`）
//!
//! 回合部分：`l` 或 `d`
//!
//! 初始局面：
//! `1M1M1M1M1M/M1M1M1M1M1/1M1M1M1M1M/M1M1M1M1M1/10/10/1m1m1m1m1m/m1m1m1m1m1/1m1m1m1m1m/m1m1m1m1m1 l`

use crate::board::Board;
use crate::types::{Piece, Position, Side};

/// FEN 解析后的状态
#[derive(Clone)]
pub struct FenState {
    pub board: Board,
    pub turn: Side,
}

/// 解析 FEN 字符串
pub fn parse_fen(fen: &str) -> Result<FenState, String> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid FEN format: expected '<board> <turn>', got: {}",
            fen
        ));
    }

    let board = parse_board_part(parts[0])?;

    let turn_chars: Vec<char> = parts[1].chars().collect();
    let turn = match turn_chars.as_slice() {
        [c] => Side::from_fen_char(*c)
            .ok_or_else(|| format!("Invalid turn field: {}", parts[1]))?,
        _ => return Err(format!("Invalid turn field: {}", parts[1])),
    };

    Ok(FenState { board, turn })
}

fn parse_board_part(s: &str) -> Result<Board, String> {
    let rows: Vec<&str> = s.split('/').collect();
    if rows.len() != 10 {
        return Err(format!(
            "Invalid board: expected 10 rows, got {}",
            rows.len()
        ));
    }

    let mut board = Board::empty();
    for (row_idx, row_str) in rows.iter().enumerate() {
        let mut col: i32 = 0;
        let mut empty_run: i32 = 0;

        for c in row_str.chars() {
            if let Some(digit) = c.to_digit(10) {
                empty_run = empty_run * 10 + digit as i32;
                // 一行最多 10 个空格，更长的数字串直接拒绝，避免累加溢出
                if empty_run > 10 {
                    return Err(format!(
                        "Row {} has empty run {} exceeding 10 columns",
                        row_idx, empty_run
                    ));
                }
                continue;
            }

            col += empty_run;
            empty_run = 0;

            let piece = Piece::from_fen_char(c)
                .ok_or_else(|| format!("Invalid board character: {}", c))?;
            if col > 9 {
                return Err(format!("Row {} overflows 10 columns", row_idx));
            }
            let pos = Position::new(row_idx as i8, col as i8);
            if !pos.is_playable() {
                return Err(format!("Piece on non-playable square {}", pos));
            }
            board.set(pos, Some(piece));
            col += 1;
        }

        col += empty_run;
        if col != 10 {
            return Err(format!(
                "Row {} describes {} columns, expected 10",
                row_idx, col
            ));
        }
    }

    Ok(board)
}

/// 生成棋盘部分的 FEN
pub fn board_to_fen(board: &Board) -> String {
    let mut rows = Vec::with_capacity(10);

    for row in 0..10 {
        let mut row_str = String::new();
        let mut empty_run = 0;

        for col in 0..10 {
            match board.get(Position::new(row, col)) {
                Some(piece) => {
                    if empty_run > 0 {
                        row_str.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    row_str.push(piece.to_fen_char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            row_str.push_str(&empty_run.to_string());
        }
        rows.push(row_str);
    }

    rows.join("/")
}

/// 生成完整 FEN（棋盘 + 回合）
pub fn to_fen(board: &Board, turn: Side) -> String {
    format!("{} {}", board_to_fen(board), turn.to_fen_char())
}

/// 初始局面的 FEN
pub fn initial_fen() -> String {
    to_fen(&Board::initial(), Side::Light)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;

    const INITIAL: &str =
        "1M1M1M1M1M/M1M1M1M1M1/1M1M1M1M1M/M1M1M1M1M1/10/10/1m1m1m1m1m/m1m1m1m1m1/1m1m1m1m1m/m1m1m1m1m1 l";

    #[test]
    fn test_initial_fen() {
        assert_eq!(initial_fen(), INITIAL);
    }

    #[test]
    fn test_parse_initial() {
        let state = parse_fen(INITIAL).unwrap();
        assert_eq!(state.turn, Side::Light);
        assert_eq!(state.board.piece_count(Side::Light), 20);
        assert_eq!(state.board.piece_count(Side::Dark), 20);
    }

    #[test]
    fn test_roundtrip() {
        let state = parse_fen(INITIAL).unwrap();
        assert_eq!(to_fen(&state.board, state.turn), INITIAL);

        let sparse = "10/10/10/10/3k6/10/5M4/10/10/10 d";
        let state = parse_fen(sparse).unwrap();
        assert_eq!(state.turn, Side::Dark);
        let king = state.board.get(Position::new(4, 3)).unwrap();
        assert_eq!(king.side, Side::Dark);
        assert_eq!(king.rank, Rank::King);
        assert_eq!(to_fen(&state.board, state.turn), sparse);
    }

    #[test]
    fn test_parse_errors() {
        // 行数不足
        assert!(parse_fen("10/10 l").is_err());
        // 回合字段非法
        assert!(parse_fen("10/10/10/10/10/10/10/10/10/10 x").is_err());
        // 行宽不匹配
        assert!(parse_fen("9/10/10/10/10/10/10/10/10/10 l").is_err());
        // 浅色格上有棋子
        assert!(parse_fen("M9/10/10/10/10/10/10/10/10/10 l").is_err());
        // 未知棋子字符
        assert!(parse_fen("1Q8/10/10/10/10/10/10/10/10/10 l").is_err());
    }

    #[test]
    fn test_oversized_empty_run_is_rejected_not_panic() {
        // 超长数字串必须返回 Err，不能在累加时溢出
        assert!(parse_fen("999999/10/10/10/10/10/10/10/10/10 l").is_err());
        assert!(parse_fen("2147483647/10/10/10/10/10/10/10/10/10 l").is_err());
        assert!(parse_fen("11/10/10/10/10/10/10/10/10/10 l").is_err());
    }
}
