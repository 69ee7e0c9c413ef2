//! Depth-bounded negamax search with alpha-beta pruning.
//!
//! Every node is produced with the same primitive a real turn uses: clone
//! the board, apply the movement, fire the mover's laser and apply the
//! result. Depth 1 is the plain greedy choice over material; deeper searches
//! assume the opponent answers with its own best reply.
//!
//! Iterative deepening keeps the result of the last fully searched depth, so
//! a time budget or a cancellation request never yields a half-searched
//! answer. Depth 1 always completes.
//!
//! Ties keep the first movement in enumeration order, which makes the search
//! deterministic for a given board and side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::game_state::board::Board;
use crate::game_state::board_rules::RulesConfig;
use crate::game_state::board_types::Color;
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::game_state::movement::Movement;
use crate::laser::hit_table::HitTable;
use crate::move_generation::movement_validator::candidate_moves;
use crate::search::board_scoring::{BoardScorer, MaterialScorer};

const INFINITY: i32 = i32::MAX / 2;

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub movetime_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            movetime_ms: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best_move: Option<Movement>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

/// Everything a search needs besides the position.
pub struct SearchContext<'a, S: BoardScorer> {
    pub hit_table: &'a HitTable,
    pub rules: &'a RulesConfig,
    pub scorer: &'a S,
    pub cancel: Option<&'a AtomicBool>,
}

struct Limits<'a> {
    deadline: Option<Instant>,
    cancel: Option<&'a AtomicBool>,
}

impl Limits<'_> {
    #[inline]
    fn expired(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Aborted iterations unwind with this marker instead of a score.
struct Aborted;

/// The greedy depth-1 choice: the movement with the best material balance
/// after its own laser shot.
pub fn choose_move(
    board: &Board,
    color: Color,
    hit_table: &HitTable,
    rules: &RulesConfig,
) -> LaserChessResult<Movement> {
    let ctx = SearchContext {
        hit_table,
        rules,
        scorer: &MaterialScorer,
        cancel: None,
    };
    let result = search_best_move(board, color, &ctx, SearchConfig::default())?;
    result.best_move.ok_or_else(|| no_moves(color))
}

pub fn search_best_move<S: BoardScorer>(
    board: &Board,
    color: Color,
    ctx: &SearchContext<'_, S>,
    config: SearchConfig,
) -> LaserChessResult<SearchResult> {
    let started = Instant::now();
    let limits = Limits {
        deadline: config
            .movetime_ms
            .map(|ms| started + Duration::from_millis(ms)),
        cancel: ctx.cancel,
    };

    let root_moves = candidate_moves(board, color, ctx.rules);
    if root_moves.is_empty() {
        return Err(no_moves(color));
    }

    // Root children are shared by every iteration.
    let mut children = Vec::with_capacity(root_moves.len());
    for movement in root_moves {
        let (next, _) = board.successor(&movement, color, ctx.hit_table)?;
        children.push((movement, next));
    }

    let mut result = SearchResult::default();
    let max_depth = config.max_depth.max(1);

    for depth in 1..=max_depth {
        let mut nodes = 0u64;
        // Depth 1 ignores the limits so there is always an answer.
        let iteration_limits = if depth == 1 {
            Limits {
                deadline: None,
                cancel: None,
            }
        } else {
            Limits {
                deadline: limits.deadline,
                cancel: limits.cancel,
            }
        };

        match search_root(&children, color, ctx, depth, &iteration_limits, &mut nodes)? {
            Ok((best_move, best_score)) => {
                result.best_move = Some(best_move);
                result.best_score = best_score;
                result.reached_depth = depth;
                result.nodes += nodes;
            }
            Err(Aborted) => break,
        }

        if limits.expired() {
            break;
        }
    }

    result.elapsed_ms = started.elapsed().as_millis() as u64;
    Ok(result)
}

type RootOutcome = Result<(Movement, i32), Aborted>;

fn search_root<S: BoardScorer>(
    children: &[(Movement, Board)],
    color: Color,
    ctx: &SearchContext<'_, S>,
    depth: u8,
    limits: &Limits<'_>,
    nodes: &mut u64,
) -> LaserChessResult<RootOutcome> {
    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut best: Option<(Movement, i32)> = None;

    for (movement, child) in children {
        let searched = negamax(
            child,
            color.opposite(),
            ctx,
            depth - 1,
            -beta,
            -alpha,
            limits,
            nodes,
        )?;
        let score = match searched {
            Ok(value) => -value,
            Err(Aborted) => return Ok(Err(Aborted)),
        };

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((*movement, score));
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(best.ok_or(Aborted))
}

#[allow(clippy::too_many_arguments)]
fn negamax<S: BoardScorer>(
    board: &Board,
    to_move: Color,
    ctx: &SearchContext<'_, S>,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    limits: &Limits<'_>,
    nodes: &mut u64,
) -> LaserChessResult<Result<i32, Aborted>> {
    *nodes += 1;

    if depth == 0 || board.winner().is_some() {
        return Ok(Ok(ctx.scorer.score(board, to_move)));
    }
    if limits.expired() {
        return Ok(Err(Aborted));
    }

    let moves = candidate_moves(board, to_move, ctx.rules);
    if moves.is_empty() {
        return Ok(Ok(ctx.scorer.score(board, to_move)));
    }

    let mut best = -INFINITY;
    for movement in moves {
        let (next, _) = board.successor(&movement, to_move, ctx.hit_table)?;
        let searched = negamax(
            &next,
            to_move.opposite(),
            ctx,
            depth - 1,
            -beta,
            -alpha,
            limits,
            nodes,
        )?;
        let score = match searched {
            Ok(value) => -value,
            Err(Aborted) => return Ok(Err(Aborted)),
        };

        if score > best {
            best = score;
        }
        if best > alpha {
            alpha = best;
        }
        if alpha >= beta {
            break;
        }
    }

    Ok(Ok(best))
}

fn no_moves(color: Color) -> LaserChessError {
    LaserChessError::NoMovesAvailable {
        color: color.name().to_owned(),
    }
}
