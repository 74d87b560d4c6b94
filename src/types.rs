//! 国际跳棋核心类型定义
//!
//! 定义 10×10 国际跳棋中所有基础数据类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 棋子阵营
///
/// Light 先手，从 0-3 行向大行号方向前进；Dark 从 6-9 行向小行号方向前进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Light,
    Dark,
}

impl Side {
    /// 获取对方阵营
    pub fn opposite(&self) -> Side {
        match self {
            Side::Light => Side::Dark,
            Side::Dark => Side::Light,
        }
    }

    /// 前进方向（行号增量）
    #[inline]
    pub fn forward(&self) -> i8 {
        match self {
            Side::Light => 1,
            Side::Dark => -1,
        }
    }

    /// 升变行（兵到达后升王）
    #[inline]
    pub fn promotion_row(&self) -> i8 {
        match self {
            Side::Light => 9,
            Side::Dark => 0,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'l' => Some(Side::Light),
            'd' => Some(Side::Dark),
            _ => None,
        }
    }

    /// 转换为 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::Light => 'l',
            Side::Dark => 'd',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Light => write!(f, "Light"),
            Side::Dark => write!(f, "Dark"),
        }
    }
}

/// 棋子等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    /// 兵：只能向前走一格，跳吃时可以向后
    Man,
    /// 王：沿对角线任意距离滑行，飞跃吃子
    King,
}

impl Rank {
    /// 获取棋子的评估值
    pub fn value(&self) -> f64 {
        match self {
            Rank::Man => 1.0,
            Rank::King => 3.0,
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub rank: Rank,
}

impl Piece {
    pub fn man(side: Side) -> Self {
        Piece {
            side,
            rank: Rank::Man,
        }
    }

    pub fn king(side: Side) -> Self {
        Piece {
            side,
            rank: Rank::King,
        }
    }

    /// 快照中的整数编码：±1 兵，±2 王，Light 为正
    pub fn to_code(&self) -> i8 {
        let magnitude = match self.rank {
            Rank::Man => 1,
            Rank::King => 2,
        };
        match self.side {
            Side::Light => magnitude,
            Side::Dark => -magnitude,
        }
    }

    /// 从整数编码解析（0 表示空格，返回 None）
    pub fn from_code(code: i8) -> Result<Option<Piece>, String> {
        let piece = match code {
            0 => None,
            1 => Some(Piece::man(Side::Light)),
            2 => Some(Piece::king(Side::Light)),
            -1 => Some(Piece::man(Side::Dark)),
            -2 => Some(Piece::king(Side::Dark)),
            _ => return Err(format!("Unknown piece code: {}", code)),
        };
        Ok(piece)
    }

    /// 转换为 FEN 字符：Light 大写 M/K，Dark 小写 m/k
    pub fn to_fen_char(&self) -> char {
        match (self.side, self.rank) {
            (Side::Light, Rank::Man) => 'M',
            (Side::Light, Rank::King) => 'K',
            (Side::Dark, Rank::Man) => 'm',
            (Side::Dark, Rank::King) => 'k',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        match c {
            'M' => Some(Piece::man(Side::Light)),
            'K' => Some(Piece::king(Side::Light)),
            'm' => Some(Piece::man(Side::Dark)),
            'k' => Some(Piece::king(Side::Dark)),
            _ => None,
        }
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9 (0 是 Light 方底线，9 是 Dark 方底线)
/// col: 0-9 (从左到右)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..=9).contains(&self.row) && (0..=9).contains(&self.col)
    }

    /// 检查是否为可用格（深色格，行列和为奇数）
    #[inline]
    pub fn is_playable(&self) -> bool {
        self.is_valid() && (self.row + self.col) % 2 == 1
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 转换为数组下标
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * 10 + (self.col as usize)
    }

    /// 从数组下标还原
    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            row: (idx / 10) as i8,
            col: (idx % 10) as i8,
        }
    }

    /// 从坐标字符串解析（如 "a0"，列字母 a-j + 行数字 0-9）
    pub fn from_fen_str(s: &str) -> Option<Position> {
        let mut chars = s.chars();
        let col = match chars.next()? {
            c @ 'a'..='j' => (c as i8) - ('a' as i8),
            _ => return None,
        };
        let row = match chars.next()? {
            c @ '0'..='9' => (c as i8) - ('0' as i8),
            _ => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Position { row, col })
    }

    /// 转换为坐标字符串（如 "a0"）
    pub fn to_fen_str(&self) -> String {
        let col_char = (b'a' + self.col as u8) as char;
        format!("{}{}", col_char, self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_str())
    }
}

/// 吃子序列：首元素为起点，之后每个元素为一跳的落点
///
/// 长度 >= 2 才表示真正的吃子链
pub type CaptureSequence = Vec<Position>;

/// 走法：单步 / 滑行 / 吃子链的第一跳
///
/// 多跳吃子链由控制器逐跳执行，每跳都基于当前棋盘重新推导合法性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// 从走法字符串解析（如 "b3c4"）
    pub fn from_fen_str(s: &str) -> Option<Move> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 4 {
            return None;
        }
        let from = Position::from_fen_str(&chars[0..2].iter().collect::<String>())?;
        let to = Position::from_fen_str(&chars[2..4].iter().collect::<String>())?;
        Some(Move { from, to })
    }

    /// 转换为走法字符串
    pub fn to_fen_str(&self) -> String {
        format!("{}{}", self.from.to_fen_str(), self.to.to_fen_str())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_str())
    }
}

/// AI 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// 搜索深度；Beginner 不搜索，纯随机
    pub fn search_depth(&self) -> Option<u32> {
        match self {
            Difficulty::Beginner => None,
            Difficulty::Intermediate => Some(3),
            Difficulty::Advanced => Some(5),
            Difficulty::Expert => Some(7),
        }
    }

    /// 从名称解析
    pub fn from_name(name: &str) -> Result<Difficulty, String> {
        match name.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(format!(
                "Unknown difficulty: {}. Available: beginner, intermediate, advanced, expert",
                name
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_fen_str() {
        assert_eq!(Position::from_fen_str("a0"), Some(Position::new(0, 0)));
        assert_eq!(Position::from_fen_str("e4"), Some(Position::new(4, 4)));
        assert_eq!(Position::from_fen_str("j9"), Some(Position::new(9, 9)));
        assert_eq!(Position::from_fen_str("k0"), None);
        assert_eq!(Position::from_fen_str("a10"), None);
    }

    #[test]
    fn test_position_to_fen_str() {
        assert_eq!(Position::new(0, 0).to_fen_str(), "a0");
        assert_eq!(Position::new(4, 4).to_fen_str(), "e4");
        assert_eq!(Position::new(9, 9).to_fen_str(), "j9");
    }

    #[test]
    fn test_position_playable() {
        assert!(Position::new(0, 1).is_playable());
        assert!(Position::new(9, 0).is_playable());
        assert!(!Position::new(0, 0).is_playable());
        assert!(!Position::new(10, 1).is_playable());
    }

    #[test]
    fn test_position_index_roundtrip() {
        for row in 0..10 {
            for col in 0..10 {
                let pos = Position::new(row, col);
                assert_eq!(Position::from_index(pos.to_index()), pos);
            }
        }
    }

    #[test]
    fn test_move_from_fen_str() {
        let m = Move::from_fen_str("b3c4").unwrap();
        assert_eq!(m.from, Position::new(3, 1));
        assert_eq!(m.to, Position::new(4, 2));
        assert_eq!(m.to_fen_str(), "b3c4");
        assert!(Move::from_fen_str("b3").is_none());
    }

    #[test]
    fn test_piece_code_roundtrip() {
        for code in [-2i8, -1, 0, 1, 2] {
            let piece = Piece::from_code(code).unwrap();
            assert_eq!(piece.map_or(0, |p| p.to_code()), code);
        }
        assert!(Piece::from_code(3).is_err());
    }

    #[test]
    fn test_difficulty_depth() {
        assert_eq!(Difficulty::Beginner.search_depth(), None);
        assert_eq!(Difficulty::Intermediate.search_depth(), Some(3));
        assert_eq!(Difficulty::Advanced.search_depth(), Some(5));
        assert_eq!(Difficulty::Expert.search_depth(), Some(7));
        assert!(Difficulty::from_name("nightmare").is_err());
    }
}
