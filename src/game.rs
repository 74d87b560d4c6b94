//! 对局控制器
//!
//! 持有棋盘与回合状态，驱动选子/走子/吃子链的状态机：
//! Idle → Selected →（ChainInProgress → Selected）* → TurnComplete。
//! 吃子链的每一跳都基于当前棋盘重新计算后续，强制吃子规则在每跳重新生效，
//! 不会把玩家锁定在最初选择的分支上。
//!
//! 渲染层通过 `submit_click` / 读取器与控制器交互；
//! 联机模式通过 `snapshot` / `apply_remote` 与远端会话存储交换局面。

use log::info;
use serde::{Deserialize, Serialize};

use crate::ai::make_ai_move;
use crate::board::Board;
use crate::captures::{find_capture_sequences, longest_capture_sequence};
use crate::types::{Difficulty, Move, Position, Side};

/// 点击被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 坐标越界
    OutOfBounds,
    /// 选择了空格或对方棋子
    NotYourPiece,
    /// 目标不合法（含强制吃子规则的违反）
    IllegalMove,
    /// 吃子链未完成，必须继续吃
    MustContinueCapture,
    /// 对局已结束
    GameOver,
}

/// 一次点击的处理结果，供渲染层反馈
///
/// 拒绝只复位选择，不改动棋盘，也不会 panic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// 选中了己方棋子
    Selected(Position),
    /// 完成一跳但落点仍有吃子机会，选择停留在落点
    ChainContinues(Position),
    /// 回合完成，轮到对方
    TurnComplete,
    /// 回合完成且对局分出胜负
    GameOver(Side),
    /// 输入被拒绝
    Rejected(RejectReason),
}

/// 联机同步快照
///
/// 棋盘编码为 10×10 整数网格（0 空，±1 兵，±2 王，Light 为正），
/// 传输层只需序列化这张网格和几个标量字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Vec<Vec<i8>>,
    pub turn: Side,
    pub game_over: bool,
    pub winner: Option<Side>,
}

/// 对局控制器
pub struct Game {
    board: Board,
    turn: Side,
    selected: Option<Position>,
    chain_in_progress: bool,
    /// 每次改动棋盘前压入的 (棋盘, 回合) 快照，用于悔棋
    history: Vec<(Board, Side)>,
    light_score: u32,
    dark_score: u32,
    game_over: bool,
    winner: Option<Side>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// 新对局：初始棋盘，Light 先行
    pub fn new() -> Game {
        Game {
            board: Board::initial(),
            turn: Side::Light,
            selected: None,
            chain_in_progress: false,
            history: Vec::new(),
            light_score: 0,
            dark_score: 0,
            game_over: false,
            winner: None,
        }
    }

    /// 重开一局，胜场计数保留
    pub fn new_game(&mut self) {
        self.board = Board::initial();
        self.turn = Side::Light;
        self.reset_selection();
        self.history.clear();
        self.game_over = false;
        self.winner = None;
    }

    /// 清零胜场计数
    pub fn reset_scores(&mut self) {
        self.light_score = 0;
        self.dark_score = 0;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// (Light 胜场, Dark 胜场)
    pub fn scores(&self) -> (u32, u32) {
        (self.light_score, self.dark_score)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// 某格棋子当前可达的落点（供渲染层高亮）
    ///
    /// 吃子链进行中只返回链上当前格的后续落点
    pub fn legal_destinations(&self, pos: Position) -> Vec<Position> {
        if self.game_over {
            return Vec::new();
        }
        if self.chain_in_progress && self.selected != Some(pos) {
            return Vec::new();
        }
        match self.board.get(pos) {
            Some(p) if p.side == self.turn => {}
            _ => return Vec::new(),
        }

        if self.board.has_any_capture(self.turn) {
            let mut destinations = Vec::new();
            for seq in find_capture_sequences(&self.board, pos) {
                if seq.len() > 1 && !destinations.contains(&seq[1]) {
                    destinations.push(seq[1]);
                }
            }
            destinations
        } else {
            self.board.quiet_destinations(pos)
        }
    }

    /// 处理一次行/列点击，驱动选子与走子状态机
    pub fn submit_click(&mut self, row: i8, col: i8) -> ClickOutcome {
        if self.game_over {
            return ClickOutcome::Rejected(RejectReason::GameOver);
        }

        let pos = Position::new(row, col);
        if !pos.is_valid() {
            if !self.chain_in_progress {
                self.reset_selection();
            }
            return ClickOutcome::Rejected(RejectReason::OutOfBounds);
        }

        match self.selected {
            None => self.select(pos),
            Some(from) => self.try_move(from, pos),
        }
    }

    fn select(&mut self, pos: Position) -> ClickOutcome {
        match self.board.get(pos) {
            Some(p) if p.side == self.turn => {
                self.selected = Some(pos);
                ClickOutcome::Selected(pos)
            }
            _ => ClickOutcome::Rejected(RejectReason::NotYourPiece),
        }
    }

    fn try_move(&mut self, from: Position, to: Position) -> ClickOutcome {
        // 吃子链的下一跳？基于当前棋盘重新计算
        let sequences = find_capture_sequences(&self.board, from);
        let is_capture_hop = sequences.iter().any(|seq| seq.len() > 1 && seq[1] == to);

        if is_capture_hop {
            self.history.push((self.board.clone(), self.turn));
            self.board = self.board.execute_move(from, to);

            // 落点仍有吃子机会则必须继续
            let has_continuation = find_capture_sequences(&self.board, to)
                .iter()
                .any(|seq| seq.len() > 1);
            if has_continuation {
                self.selected = Some(to);
                self.chain_in_progress = true;
                return ClickOutcome::ChainContinues(to);
            }
            return self.finish_turn();
        }

        if self.chain_in_progress {
            // 链未完成，选择停留在链上
            return ClickOutcome::Rejected(RejectReason::MustContinueCapture);
        }

        if self.board.is_legal_move(from, to) {
            self.history.push((self.board.clone(), self.turn));
            self.board = self.board.execute_move(from, to);
            return self.finish_turn();
        }

        self.reset_selection();
        ClickOutcome::Rejected(RejectReason::IllegalMove)
    }

    /// 让机器方（当前回合方）按难度走一步
    ///
    /// 机器的吃子链用"最长链"启发式补完，每跳仍基于当前棋盘逐跳执行；
    /// 机器无棋可走时直接判对方获胜
    pub fn submit_ai_move(&mut self, difficulty: Difficulty, seed: Option<u64>) -> ClickOutcome {
        if self.game_over {
            return ClickOutcome::Rejected(RejectReason::GameOver);
        }

        let side = self.turn;
        let mv = match make_ai_move(&self.board, side, difficulty, seed) {
            Some(mv) => mv,
            None => {
                let opponent = side.opposite();
                self.handle_win(opponent);
                return ClickOutcome::GameOver(opponent);
            }
        };

        self.history.push((self.board.clone(), side));

        let pieces_before = self.total_pieces();
        self.board = self.board.execute_move(mv.from, mv.to);
        let was_capture = self.total_pieces() < pieces_before;

        if was_capture {
            let mut landing = mv.to;
            while let Some(seq) = longest_capture_sequence(&self.board, landing) {
                self.board = self.board.execute_move(landing, seq[1]);
                landing = seq[1];
            }
        }

        self.finish_turn()
    }

    /// 悔棋：恢复最近一次改动前的 (棋盘, 回合) 快照
    pub fn undo(&mut self) {
        if let Some((board, turn)) = self.history.pop() {
            self.board = board;
            self.turn = turn;
            self.reset_selection();
        }
    }

    /// 导出联机同步快照
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.to_grid(),
            turn: self.turn,
            game_over: self.game_over,
            winner: self.winner,
        }
    }

    /// 应用远端快照，覆盖本地局面
    ///
    /// 最后写入者生效；本引擎不仲裁并发冲突。
    /// 校验失败时本地状态不变
    pub fn apply_remote(&mut self, snapshot: &Snapshot) -> Result<(), String> {
        let board = Board::from_grid(&snapshot.board)?;
        self.board = board;
        self.turn = snapshot.turn;
        self.game_over = snapshot.game_over;
        self.winner = snapshot.winner;
        self.reset_selection();
        // 远端覆盖后本地悔棋线失效
        self.history.clear();
        Ok(())
    }

    fn reset_selection(&mut self) {
        self.selected = None;
        self.chain_in_progress = false;
    }

    fn total_pieces(&self) -> usize {
        self.board.piece_count(Side::Light) + self.board.piece_count(Side::Dark)
    }

    fn finish_turn(&mut self) -> ClickOutcome {
        self.reset_selection();
        self.turn = self.turn.opposite();

        if let Some(winner) = self.detect_game_over() {
            self.handle_win(winner);
            return ClickOutcome::GameOver(winner);
        }
        ClickOutcome::TurnComplete
    }

    /// 终局判定：先看双方子数，再看即将行棋方是否无棋可走
    fn detect_game_over(&self) -> Option<Side> {
        if self.board.piece_count(Side::Light) <= 1 {
            return Some(Side::Dark);
        }
        if self.board.piece_count(Side::Dark) <= 1 {
            return Some(Side::Light);
        }
        if self.board.all_legal_moves(self.turn).is_empty() {
            return Some(self.turn.opposite());
        }
        None
    }

    fn handle_win(&mut self, winner: Side) {
        self.game_over = true;
        self.winner = Some(winner);
        match winner {
            Side::Light => self.light_score += 1,
            Side::Dark => self.dark_score += 1,
        }
        info!("game over: {} wins", winner);
    }

    /// 用于测试与联机覆盖的裸状态构造
    pub fn from_position(board: Board, turn: Side) -> Game {
        Game {
            board,
            turn,
            selected: None,
            chain_in_progress: false,
            history: Vec::new(),
            light_score: 0,
            dark_score: 0,
            game_over: false,
            winner: None,
        }
    }
}
