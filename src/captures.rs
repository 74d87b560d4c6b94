//! 吃子序列搜索
//!
//! 递归枚举一枚棋子从某格出发的所有极大吃子链。兵跳相邻敌子，
//! 王沿对角线飞跃：越过一枚敌子后，其后每个连续空格都是独立落点，
//! 因此开阔射线上的王会产生组合数量级的分支。
//!
//! 每一跳都在移除被吃子后的新棋盘副本上继续递归，各分支互不干扰。

use crate::board::{Board, DIAGONALS};
use crate::types::{CaptureSequence, Piece, Position, Rank};

/// 一次合法跳吃：被吃子所在格与落点
type Jump = (Position, Position);

/// 枚举某格棋子当前可立即执行的所有跳吃
fn jumps_from(board: &Board, pos: Position, piece: Piece) -> Vec<Jump> {
    let mut jumps = Vec::new();

    match piece.rank {
        Rank::Man => {
            // 兵的候选跳：四个对角方向各两格，允许向后跳吃
            for (dr, dc) in DIAGONALS {
                let mid = pos.offset(dr, dc);
                let landing = pos.offset(2 * dr, 2 * dc);
                let is_enemy = board.get(mid).map_or(false, |p| p.side != piece.side);
                if is_enemy && board.is_empty_at(landing) {
                    jumps.push((mid, landing));
                }
            }
        }
        Rank::King => {
            // 王沿射线扫描：跳过若干空格，遇到恰好一枚敌子，
            // 其后每个连续空格都是一个落点分支
            for (dr, dc) in DIAGONALS {
                let mut cursor = pos.offset(dr, dc);
                while board.is_empty_at(cursor) {
                    cursor = cursor.offset(dr, dc);
                }
                let target = cursor;
                let is_enemy = board.get(target).map_or(false, |p| p.side != piece.side);
                if !is_enemy {
                    continue;
                }
                let mut landing = target.offset(dr, dc);
                while board.is_empty_at(landing) {
                    jumps.push((target, landing));
                    landing = landing.offset(dr, dc);
                }
            }
        }
    }

    jumps
}

/// 快速判断某格棋子是否存在至少一个跳吃
pub fn can_capture(board: &Board, pos: Position) -> bool {
    match board.get(pos) {
        Some(piece) => !jumps_from(board, pos, piece).is_empty(),
        None => false,
    }
}

/// 枚举从 start 出发的所有极大吃子序列
///
/// 每条序列首元素为 start，之后依次为各跳落点；没有吃子机会时返回空。
/// 序列顺序由方向枚举顺序决定，调用方只能依赖"所有极大链都在结果中"。
pub fn find_capture_sequences(board: &Board, start: Position) -> Vec<CaptureSequence> {
    let mut all = Vec::new();
    if board.get(start).is_some() {
        extend_chain(board, start, vec![start], &mut all);
    }
    all
}

/// 从 start 出发的最长吃子序列（并列时保留先枚举到的那条）
///
/// 机器走子的整链补完启发式；不作为对人类玩家的规则强制
pub fn longest_capture_sequence(board: &Board, start: Position) -> Option<CaptureSequence> {
    let mut best: Option<CaptureSequence> = None;
    for seq in find_capture_sequences(board, start) {
        if seq.len() > 1 && best.as_ref().map_or(true, |b| seq.len() > b.len()) {
            best = Some(seq);
        }
    }
    best
}

fn extend_chain(
    board: &Board,
    pos: Position,
    sequence: CaptureSequence,
    all: &mut Vec<CaptureSequence>,
) {
    let piece = match board.get(pos) {
        Some(p) => p,
        None => return,
    };

    let jumps = jumps_from(board, pos, piece);

    // 无后续跳时记录当前链；只含起点的序列不是吃子，丢弃
    if jumps.is_empty() {
        if sequence.len() > 1 {
            all.push(sequence);
        }
        return;
    }

    for (captured, landing) in jumps {
        // 链中途升变立即生效：apply_jump 内部按落点行升变
        let next_board = board.apply_jump(pos, captured, landing);
        let mut next_sequence = sequence.clone();
        next_sequence.push(landing);
        extend_chain(&next_board, landing, next_sequence, all);
    }
}
