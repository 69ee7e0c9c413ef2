//! Minimal head-to-head engine match harness for local testing.
//!
//! Runs two `Engine` implementations against each other through a
//! `GameSession`, without console I/O. Series pick a seeded layout per game
//! and randomize which player takes Blue.

use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

use crate::engines::engine_trait::{Engine, SearchParams};
use crate::game_state::board::Board;
use crate::game_state::board_rules::{Layout, RulesConfig};
use crate::game_state::board_types::Color;
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::laser::laser_route::LaserEngine;
use crate::session::game_session::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win(Color),
    DrawMaxPlies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    Player1,
    Player2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOutcome {
    PlayerWin { player: PlayerId, color: Color },
    DrawMaxPlies,
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_plies: u16,
    pub params: SearchParams,
    pub rules: RulesConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 200,
            params: SearchParams::default(),
            rules: RulesConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub layout: Layout,
    pub final_board: Board,
    pub played_moves: Vec<String>,
    pub blue_move_count: u32,
    pub red_move_count: u32,
    pub blue_total_time_ns: u128,
    pub red_total_time_ns: u128,
}

#[derive(Debug, Clone)]
pub struct MatchSeriesConfig {
    pub games: u16,
    pub base_seed: u64,
    pub per_game: MatchConfig,
}

impl Default for MatchSeriesConfig {
    fn default() -> Self {
        Self {
            games: 9,
            base_seed: 0,
            per_game: MatchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchSeriesStats {
    pub games: u16,
    pub player1_wins: u16,
    pub player2_wins: u16,
    pub draws: u16,
    pub outcomes: Vec<SeriesOutcome>,
    pub player1_moves: u32,
    pub player2_moves: u32,
    pub player1_total_time_ns: u128,
    pub player2_total_time_ns: u128,
}

impl MatchSeriesStats {
    pub fn report(&self) -> String {
        format!(
            "games={} player1_wins={} player2_wins={} draws={} p1_avg_ms={:.3} p2_avg_ms={:.3}",
            self.games,
            self.player1_wins,
            self.player2_wins,
            self.draws,
            average_ms(self.player1_total_time_ns, self.player1_moves),
            average_ms(self.player2_total_time_ns, self.player2_moves),
        )
    }
}

/// Play one match from `layout`. `engine_blue` moves first.
pub fn play_engine_match(
    engine_blue: &mut dyn Engine,
    engine_red: &mut dyn Engine,
    laser: LaserEngine,
    layout: Layout,
    config: &MatchConfig,
) -> LaserChessResult<MatchResult> {
    engine_blue.new_game();
    engine_red.new_game();

    let mut session = GameSession::new(Board::from_layout(layout), laser, config.rules);
    let mut played_moves = Vec::new();
    let mut blue_move_count = 0u32;
    let mut red_move_count = 0u32;
    let mut blue_total_time_ns = 0u128;
    let mut red_total_time_ns = 0u128;

    for _ in 0..config.max_plies {
        if session.is_game_over() {
            break;
        }

        let mover = session.current_player();
        let started = Instant::now();
        let out = match mover {
            Color::Blue => engine_blue.choose_move(session.board(), mover, &config.params)?,
            Color::Red => engine_red.choose_move(session.board(), mover, &config.params)?,
        };
        let elapsed_ns = started.elapsed().as_nanos();

        match mover {
            Color::Blue => {
                blue_move_count = blue_move_count.saturating_add(1);
                blue_total_time_ns = blue_total_time_ns.saturating_add(elapsed_ns);
            }
            Color::Red => {
                red_move_count = red_move_count.saturating_add(1);
                red_total_time_ns = red_total_time_ns.saturating_add(elapsed_ns);
            }
        }

        let chosen = out.best_move.ok_or_else(|| LaserChessError::NoMovesAvailable {
            color: mover.name().to_owned(),
        })?;
        if session.apply_external_move(chosen)?.is_none() {
            return Err(LaserChessError::IllegalOpponentMove {
                description: chosen.describe(),
            });
        }
        played_moves.push(chosen.describe());
    }

    let outcome = match session.winner() {
        Some(winner) => MatchOutcome::Win(winner),
        None => MatchOutcome::DrawMaxPlies,
    };

    Ok(MatchResult {
        outcome,
        layout,
        final_board: session.board().clone(),
        played_moves,
        blue_move_count,
        red_move_count,
        blue_total_time_ns,
        red_total_time_ns,
    })
}

/// Play a series of matches and aggregate win/loss/draw statistics.
///
/// Layouts and player colors are drawn per game, deterministic from `base_seed`.
pub fn play_engine_match_series<F1, F2>(
    player1_factory: F1,
    player2_factory: F2,
    laser: &LaserEngine,
    config: &MatchSeriesConfig,
) -> LaserChessResult<MatchSeriesStats>
where
    F1: Fn() -> Box<dyn Engine>,
    F2: Fn() -> Box<dyn Engine>,
{
    let mut stats = MatchSeriesStats {
        games: config.games,
        ..MatchSeriesStats::default()
    };
    let mut rng = StdRng::seed_from_u64(config.base_seed);

    for game in 0..config.games {
        let player1_is_blue = rng.random_bool(0.5);
        let layout = Layout::random(&mut rng);
        let mut player1 = player1_factory();
        let mut player2 = player2_factory();

        let result = if player1_is_blue {
            play_engine_match(
                player1.as_mut(),
                player2.as_mut(),
                laser.clone(),
                layout,
                &config.per_game,
            )?
        } else {
            play_engine_match(
                player2.as_mut(),
                player1.as_mut(),
                laser.clone(),
                layout,
                &config.per_game,
            )?
        };

        let (p1_moves, p1_ns, p2_moves, p2_ns) = if player1_is_blue {
            (
                result.blue_move_count,
                result.blue_total_time_ns,
                result.red_move_count,
                result.red_total_time_ns,
            )
        } else {
            (
                result.red_move_count,
                result.red_total_time_ns,
                result.blue_move_count,
                result.blue_total_time_ns,
            )
        };
        stats.player1_moves = stats.player1_moves.saturating_add(p1_moves);
        stats.player2_moves = stats.player2_moves.saturating_add(p2_moves);
        stats.player1_total_time_ns = stats.player1_total_time_ns.saturating_add(p1_ns);
        stats.player2_total_time_ns = stats.player2_total_time_ns.saturating_add(p2_ns);

        let mapped = match result.outcome {
            MatchOutcome::Win(color) => {
                let player = if (color == Color::Blue) == player1_is_blue {
                    stats.player1_wins += 1;
                    PlayerId::Player1
                } else {
                    stats.player2_wins += 1;
                    PlayerId::Player2
                };
                SeriesOutcome::PlayerWin { player, color }
            }
            MatchOutcome::DrawMaxPlies => {
                stats.draws += 1;
                SeriesOutcome::DrawMaxPlies
            }
        };
        stats.outcomes.push(mapped);

        info!(
            game = game + 1,
            games = config.games,
            layout = layout.name(),
            result = ?mapped,
            plies = result.played_moves.len(),
            "match finished"
        );
    }

    Ok(stats)
}

fn average_ms(total_ns: u128, moves: u32) -> f64 {
    if moves == 0 {
        0.0
    } else {
        total_ns as f64 / f64::from(moves) / 1_000_000.0
    }
}
