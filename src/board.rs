//! 跳棋棋盘模型
//!
//! 使用 100 格数组存储棋子。棋盘按值不可变：每次落子都生成新的棋盘副本，
//! 前后两个局面之间不共享可变状态。

use lazy_static::lazy_static;

use crate::captures::{can_capture, find_capture_sequences};
use crate::types::{Move, Piece, Position, Rank, Side};

/// 四个对角线方向
pub(crate) const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

lazy_static! {
    /// 50 个可用格（深色格），按行优先顺序。枚举走法时只需遍历这张表
    pub static ref PLAYABLE_SQUARES: Vec<Position> = (0..100)
        .map(Position::from_index)
        .filter(Position::is_playable)
        .collect();
}

/// 兵到达对方底线时升王；王不会降级
pub fn promote_if_eligible(piece: Piece, landing_row: i8) -> Piece {
    if piece.rank == Rank::Man && landing_row == piece.side.promotion_row() {
        Piece::king(piece.side)
    } else {
        piece
    }
}

/// 10×10 跳棋棋盘
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 100],
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; 100],
        }
    }

    /// 初始局面：0-3 行 Light 兵，6-9 行 Dark 兵，各 20 枚
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for &pos in PLAYABLE_SQUARES.iter() {
            if pos.row < 4 {
                board.set(pos, Some(Piece::man(Side::Light)));
            } else if pos.row > 5 {
                board.set(pos, Some(Piece::man(Side::Dark)));
            }
        }
        board
    }

    /// 获取某位置的棋子
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()]
    }

    /// 检查位置是否为棋盘内的空格
    #[inline]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        pos.is_valid() && self.squares[pos.to_index()].is_none()
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: Position, cell: Option<Piece>) {
        debug_assert!(
            cell.is_none() || pos.is_playable(),
            "piece placed on non-playable square {}",
            pos
        );
        self.squares[pos.to_index()] = cell;
    }

    /// 某方棋子数量
    pub fn piece_count(&self, side: Side) -> usize {
        self.squares
            .iter()
            .filter(|cell| cell.map_or(false, |p| p.side == side))
            .count()
    }

    /// 某方所有棋子及其位置
    pub fn pieces(&self, side: Side) -> Vec<(Position, Piece)> {
        PLAYABLE_SQUARES
            .iter()
            .filter_map(|&pos| self.get(pos).map(|p| (pos, p)))
            .filter(|(_, p)| p.side == side)
            .collect()
    }

    /// 执行一跳，吃掉路径上的敌子（如有），生成新棋盘
    ///
    /// 只执行单跳；多跳吃子链由控制器逐跳调用本函数，
    /// 每跳重新基于当前棋盘推导。落点升变在此处应用，链中途也会升变。
    pub fn execute_move(&self, from: Position, to: Position) -> Board {
        debug_assert!((to.row - from.row).abs() == (to.col - from.col).abs());

        let mut board = self.clone();
        let piece = match board.get(from) {
            Some(p) => p,
            None => return board,
        };

        // 扫描 from 与 to 之间的格子，移除其中唯一的敌子
        let dr = (to.row - from.row).signum();
        let dc = (to.col - from.col).signum();
        let mut cursor = from.offset(dr, dc);
        while cursor != to {
            if let Some(target) = board.get(cursor) {
                if target.side != piece.side {
                    board.set(cursor, None);
                    break;
                }
            }
            cursor = cursor.offset(dr, dc);
        }

        board.set(from, None);
        board.set(to, Some(promote_if_eligible(piece, to.row)));
        board
    }

    /// 吃子搜索用的单跳：移除指定被吃子并迁移棋子（含升变）
    pub(crate) fn apply_jump(&self, from: Position, captured: Position, to: Position) -> Board {
        let mut board = self.clone();
        let piece = self.get(from).expect("apply_jump from empty square");
        board.set(captured, None);
        board.set(from, None);
        board.set(to, Some(promote_if_eligible(piece, to.row)));
        board
    }

    /// 某方是否存在至少一个吃子机会
    ///
    /// 强制吃子规则：返回 true 时该方所有非吃子走法均不合法
    pub fn has_any_capture(&self, side: Side) -> bool {
        PLAYABLE_SQUARES.iter().any(|&pos| {
            self.get(pos).map_or(false, |p| p.side == side) && can_capture(self, pos)
        })
    }

    /// 棋子的安静走法落点（不含吃子）
    ///
    /// 兵：斜前方一格；王：沿畅通对角线任意距离
    pub fn quiet_destinations(&self, pos: Position) -> Vec<Position> {
        let piece = match self.get(pos) {
            Some(p) => p,
            None => return Vec::new(),
        };

        let mut destinations = Vec::new();
        match piece.rank {
            Rank::Man => {
                let forward = piece.side.forward();
                for dc in [-1, 1] {
                    let dest = pos.offset(forward, dc);
                    if self.is_empty_at(dest) {
                        destinations.push(dest);
                    }
                }
            }
            Rank::King => {
                for (dr, dc) in DIAGONALS {
                    let mut dest = pos.offset(dr, dc);
                    while self.is_empty_at(dest) {
                        destinations.push(dest);
                        dest = dest.offset(dr, dc);
                    }
                }
            }
        }
        destinations
    }

    /// 检查一步走法是否合法
    ///
    /// 有吃子机会时，只有某条吃子链的第一跳才合法；
    /// 否则兵走斜前一格、王沿畅通对角线滑行
    pub fn is_legal_move(&self, from: Position, to: Position) -> bool {
        if !from.is_playable() || !to.is_playable() {
            return false;
        }
        let piece = match self.get(from) {
            Some(p) => p,
            None => return false,
        };
        if !self.is_empty_at(to) {
            return false;
        }

        if self.has_any_capture(piece.side) {
            return find_capture_sequences(self, from)
                .iter()
                .any(|seq| seq.len() > 1 && seq[1] == to);
        }

        self.quiet_destinations(from).contains(&to)
    }

    /// 枚举某方全部合法走法
    ///
    /// 有吃子机会时只返回吃子走法（每条极大吃子链的第一跳）；
    /// 空结果表示该方无棋可走（用于终局判定）
    pub fn all_legal_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();

        if self.has_any_capture(side) {
            for (pos, _) in self.pieces(side) {
                for seq in find_capture_sequences(self, pos) {
                    if seq.len() > 1 {
                        let mv = Move::new(pos, seq[1]);
                        if !moves.contains(&mv) {
                            moves.push(mv);
                        }
                    }
                }
            }
            return moves;
        }

        for (pos, _) in self.pieces(side) {
            for dest in self.quiet_destinations(pos) {
                moves.push(Move::new(pos, dest));
            }
        }
        moves
    }

    /// 快照编码：10×10 整数网格（0 空，±1 兵，±2 王，Light 为正）
    pub fn to_grid(&self) -> Vec<Vec<i8>> {
        (0..10)
            .map(|row| {
                (0..10)
                    .map(|col| {
                        self.get(Position::new(row, col))
                            .map_or(0, |p| p.to_code())
                    })
                    .collect()
            })
            .collect()
    }

    /// 从快照网格还原棋盘，校验尺寸、编码与可用格约束
    pub fn from_grid(grid: &[Vec<i8>]) -> Result<Board, String> {
        if grid.len() != 10 {
            return Err(format!("Invalid grid: expected 10 rows, got {}", grid.len()));
        }
        let mut board = Board::empty();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != 10 {
                return Err(format!(
                    "Invalid grid: row {} has {} columns, expected 10",
                    row,
                    cells.len()
                ));
            }
            for (col, &code) in cells.iter().enumerate() {
                let pos = Position::new(row as i8, col as i8);
                if let Some(piece) = Piece::from_code(code)? {
                    if !pos.is_playable() {
                        return Err(format!("Piece on non-playable square {}", pos));
                    }
                    board.set(pos, Some(piece));
                }
            }
        }
        Ok(board)
    }
}
