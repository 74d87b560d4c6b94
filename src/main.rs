//! Draughts AI CLI
//!
//! 命令行界面，用于驱动跳棋引擎
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信（联机会话存储的接入点）

use clap::{Parser, Subcommand};
use draughts_ai::{
    evaluate, get_node_count, parse_fen, reset_node_count, to_fen, AIConfig, AIEngine, Difficulty,
    Move, Position, Side,
};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "draughts-ai")]
#[command(about = "International Draughts (10x10) AI Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// FEN 字符串
        #[arg(long)]
        fen: String,
    },

    /// 选择最佳走法
    Best {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// AI 难度 (beginner, intermediate, advanced, expert)
        #[arg(long, default_value = "intermediate")]
        difficulty: String,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 返回的走法数量
        #[arg(long, default_value = "1")]
        n: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数（走子方视角）
    Eval {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 执行一跳并输出新局面
    Apply {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// 走法（如 b3c4）
        #[arg(long)]
        mv: String,

        /// 吃子链进行中时链上棋子所在格（上一跳响应的 chain_from）
        #[arg(long)]
        chain: Option<String>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

#[derive(Serialize, Deserialize)]
struct MoveResult {
    #[serde(rename = "move")]
    mv: String,
    score: f64,
}

#[derive(Serialize, Deserialize)]
struct MovesResponse {
    moves: Vec<MoveResult>,
    total: usize,
}

/// apply 命令的结果：执行一跳之后的局面
#[derive(Serialize, Deserialize)]
struct ApplyResult {
    fen: String,
    /// 吃子链未完成：走子方不变，必须从落点继续吃
    chain: bool,
    /// 链未完成时链上棋子所在格；下一次 apply 必须以它为起点并回传
    #[serde(skip_serializing_if = "Option::is_none")]
    chain_from: Option<String>,
    game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<String>,
}

/// eval 命令的结果
#[derive(Serialize, Deserialize)]
struct EvalResult {
    fen: String,
    turn: String,
    score: f64,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    n: Option<usize>,
    #[serde(default)]
    mv: Option<String>,
    #[serde(default)]
    chain: Option<String>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<MoveResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    // eval 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<String>,
    // apply 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    fen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_over: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<String>,
}

impl ServerResponse {
    fn success_moves(moves: Vec<MoveResult>, nodes: u64, nps: f64, elapsed_ms: f64) -> Self {
        Self {
            ok: true,
            moves: Some(moves),
            nodes: Some(nodes),
            nps: Some(nps),
            elapsed_ms: Some(elapsed_ms),
            ..Default::default()
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_eval(eval_score: f64, turn: &str) -> Self {
        Self {
            ok: true,
            eval: Some(eval_score),
            turn: Some(turn.to_string()),
            ..Default::default()
        }
    }

    fn success_apply(result: ApplyResult) -> Self {
        Self {
            ok: true,
            fen: Some(result.fen),
            chain: Some(result.chain),
            chain_from: result.chain_from,
            game_over: Some(result.game_over),
            winner: result.winner,
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn side_to_str(side: Side) -> &'static str {
    if side == Side::Light {
        "light"
    } else {
        "dark"
    }
}

fn calc_nps(nodes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        nodes as f64 / elapsed_secs
    } else {
        0.0
    }
}

/// 列出走子方的合法走法
fn legal_moves_from_fen(fen: &str) -> Result<Vec<String>, String> {
    let state = parse_fen(fen)?;
    Ok(state
        .board
        .all_legal_moves(state.turn)
        .iter()
        .map(|m| m.to_fen_str())
        .collect())
}

/// 执行一跳，返回新局面与对局状态
///
/// `chain_from` 为上一跳落点时表示吃子链进行中：本跳必须由链上棋子继续，
/// 换别的棋子走会被拒绝（与控制器的 MustContinueCapture 规则一致）
fn apply_move_to_fen(
    fen: &str,
    mv_str: &str,
    chain_from: Option<&str>,
) -> Result<ApplyResult, String> {
    let state = parse_fen(fen)?;
    let mv = Move::from_fen_str(mv_str).ok_or_else(|| format!("Invalid move: {}", mv_str))?;

    if let Some(chain_str) = chain_from {
        let chain_pos = Position::from_fen_str(chain_str)
            .ok_or_else(|| format!("Invalid chain square: {}", chain_str))?;
        if mv.from != chain_pos {
            return Err(format!(
                "Capture chain must continue from {}, got move from {}",
                chain_pos, mv.from
            ));
        }
    }

    let mover = match state.board.get(mv.from) {
        Some(p) => p.side,
        None => return Err(format!("No piece at {}", mv.from)),
    };
    if mover != state.turn {
        return Err(format!("Not {}'s piece at {}", state.turn, mv.from));
    }
    if !state.board.is_legal_move(mv.from, mv.to) {
        return Err(format!("Illegal move: {}", mv_str));
    }

    let pieces_before =
        state.board.piece_count(Side::Light) + state.board.piece_count(Side::Dark);
    let board = state.board.execute_move(mv.from, mv.to);
    let was_capture =
        board.piece_count(Side::Light) + board.piece_count(Side::Dark) < pieces_before;

    // 吃子后落点仍有后续：回合不切换
    let chain = was_capture
        && draughts_ai::find_capture_sequences(&board, mv.to)
            .iter()
            .any(|seq| seq.len() > 1);

    let turn = if chain { state.turn } else { state.turn.opposite() };

    let winner = if chain {
        None
    } else if board.piece_count(Side::Light) <= 1 {
        Some(Side::Dark)
    } else if board.piece_count(Side::Dark) <= 1 {
        Some(Side::Light)
    } else if board.all_legal_moves(turn).is_empty() {
        Some(turn.opposite())
    } else {
        None
    };

    Ok(ApplyResult {
        fen: to_fen(&board, turn),
        chain,
        chain_from: chain.then(|| mv.to.to_fen_str()),
        game_over: winner.is_some(),
        winner: winner.map(|s| side_to_str(s).to_string()),
    })
}

fn parse_ai_config(difficulty: &str, seed: Option<u64>) -> Result<AIConfig, String> {
    Ok(AIConfig {
        difficulty: Difficulty::from_name(difficulty)?,
        seed,
    })
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen } => match legal_moves_from_fen(&fen) {
            Ok(moves) => {
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Best {
            fen,
            difficulty,
            seed,
            n,
            json,
        } => {
            let ai = match parse_ai_config(&difficulty, seed) {
                Ok(config) => AIEngine::from_difficulty(&config),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            reset_node_count();
            let start = Instant::now();

            match ai.select_moves_fen(&fen, n) {
                Ok(moves) => {
                    let elapsed = start.elapsed().as_secs_f64();
                    let nodes = get_node_count();
                    let nps = calc_nps(nodes, elapsed);

                    if json {
                        let response = MovesResponse {
                            total: moves.len(),
                            moves: moves
                                .into_iter()
                                .map(|(mv, score)| MoveResult { mv, score })
                                .collect(),
                        };
                        println!("{}", serde_json::to_string_pretty(&response).unwrap());
                        eprintln!(
                            "Stats: nodes={}, time={:.3}s, nps={:.0}",
                            nodes, elapsed, nps
                        );
                    } else {
                        println!("Best moves (difficulty={}):", difficulty);
                        for (mv, score) in moves {
                            println!("  {} (score: {:.2})", mv, score);
                        }
                        println!(
                            "\nStats: nodes={}, time={:.3}s, nps={:.0}",
                            nodes, elapsed, nps
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Eval { fen, json } => match parse_fen(&fen) {
            Ok(state) => {
                let score = evaluate(&state.board, state.turn);
                if json {
                    let result = EvalResult {
                        fen: fen.clone(),
                        turn: side_to_str(state.turn).to_string(),
                        score,
                    };
                    println!("{}", serde_json::to_string_pretty(&result).unwrap());
                } else {
                    println!("Evaluation ({} to move): {:.2}", state.turn, score);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Apply {
            fen,
            mv,
            chain,
            json,
        } => match apply_move_to_fen(&fen, &mv, chain.as_deref()) {
            Ok(result) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&result).unwrap());
                } else {
                    println!("{}", result.fen);
                    if let Some(square) = &result.chain_from {
                        println!("Capture chain continues at {}", square);
                    }
                    if let Some(winner) = &result.winner {
                        println!("Game over: {} wins", winner);
                    }
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Server => {
            run_server();
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", serde_json::to_string(&response).unwrap());
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match request.cmd.as_str() {
            "best" => handle_best_request(&request),
            "moves" => handle_moves_request(&request),
            "eval" => handle_eval_request(&request),
            "apply" => handle_apply_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        // 返回响应
        println!("{}", serde_json::to_string(&response).unwrap());
        let _ = stdout.flush();
    }
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let difficulty = request.difficulty.as_deref().unwrap_or("intermediate");
    let n = request.n.unwrap_or(1);

    let ai = match parse_ai_config(difficulty, request.seed) {
        Ok(config) => AIEngine::from_difficulty(&config),
        Err(e) => return ServerResponse::error(&format!("Invalid difficulty: {}", e)),
    };

    reset_node_count();
    let start = Instant::now();

    match ai.select_moves_fen(&request.fen, n) {
        Ok(moves) => {
            let elapsed = start.elapsed().as_secs_f64();
            let nodes = get_node_count();
            let nps = calc_nps(nodes, elapsed);

            let move_results: Vec<MoveResult> = moves
                .into_iter()
                .map(|(mv, score)| MoveResult { mv, score })
                .collect();

            ServerResponse::success_moves(move_results, nodes, nps, elapsed * 1000.0)
        }
        Err(e) => ServerResponse::error(&format!("AI error: {}", e)),
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    match legal_moves_from_fen(&request.fen) {
        Ok(moves) => ServerResponse::success_legal_moves(moves),
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}

/// 处理 eval 命令（静态评估）
fn handle_eval_request(request: &ServerRequest) -> ServerResponse {
    match parse_fen(&request.fen) {
        Ok(state) => {
            let score = evaluate(&state.board, state.turn);
            ServerResponse::success_eval(score, side_to_str(state.turn))
        }
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}

/// 处理 apply 命令（执行一跳）
fn handle_apply_request(request: &ServerRequest) -> ServerResponse {
    let mv = match request.mv.as_deref() {
        Some(mv) => mv,
        None => return ServerResponse::error("Missing field: mv"),
    };
    match apply_move_to_fen(&request.fen, mv, request.chain.as_deref()) {
        Ok(result) => ServerResponse::success_apply(result),
        Err(e) => ServerResponse::error(&format!("Apply error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_ai::initial_fen;

    // Light (3,2) 有两跳链，(3,8) 另有一个独立的吃子机会
    const CHAIN_FEN: &str = "10/10/10/2M5M1/3m3m2/10/5m4/10/10/10 l";

    #[test]
    fn test_apply_reports_chain_square() {
        let result = apply_move_to_fen(CHAIN_FEN, "c3e5", None).unwrap();
        assert!(result.chain);
        assert_eq!(result.chain_from.as_deref(), Some("e5"));
        assert!(!result.game_over);
        // 链未完成，走子方不变
        assert!(result.fen.ends_with(" l"));
    }

    #[test]
    fn test_apply_rejects_switching_piece_mid_chain() {
        let first = apply_move_to_fen(CHAIN_FEN, "c3e5", None).unwrap();
        let chain_square = first.chain_from.as_deref().unwrap();

        // 链进行中换另一枚可吃子的棋子：必须被拒绝
        assert!(apply_move_to_fen(&first.fen, "i3g5", Some(chain_square)).is_err());
        // 链上棋子继续吃则成功
        let second = apply_move_to_fen(&first.fen, "e5g7", Some(chain_square)).unwrap();
        assert!(!second.chain);
        assert_eq!(second.chain_from, None);
        // Dark 只剩一枚，Light 获胜
        assert!(second.game_over);
        assert_eq!(second.winner.as_deref(), Some("light"));
    }

    #[test]
    fn test_apply_rejects_invalid_chain_square() {
        let first = apply_move_to_fen(CHAIN_FEN, "c3e5", None).unwrap();
        assert!(apply_move_to_fen(&first.fen, "e5g7", Some("z9")).is_err());
    }

    #[test]
    fn test_server_apply_enforces_chain() {
        let first = apply_move_to_fen(CHAIN_FEN, "c3e5", None).unwrap();

        let request = ServerRequest {
            cmd: "apply".to_string(),
            fen: first.fen.clone(),
            difficulty: None,
            seed: None,
            n: None,
            mv: Some("i3g5".to_string()),
            chain: first.chain_from.clone(),
        };
        let response = handle_apply_request(&request);
        assert!(!response.ok);
        assert!(response.error.is_some());
    }

    #[test]
    fn test_eval_result_is_valid_json() {
        let result = EvalResult {
            fen: initial_fen(),
            turn: "light".to_string(),
            score: 0.5,
        };
        let json = serde_json::to_string(&result).unwrap();
        let parsed: EvalResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.turn, "light");
    }
}
