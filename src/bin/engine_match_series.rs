//! Standalone engine-vs-engine series runner.
//!
//! Run with:
//! `cargo run --release --bin engine_match_series`
//! `RUST_LOG=info cargo run --release --bin engine_match_series -- --games 20`

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use laser_chess::engines::engine_minimax::MinimaxEngine;
use laser_chess::engines::engine_random::RandomEngine;
use laser_chess::engines::engine_trait::Engine;
use laser_chess::game_state::board_rules::RulesConfig;
use laser_chess::game_state::errors::LaserChessResult;
use laser_chess::laser::laser_route::LaserEngine;
use laser_chess::utils::engine_match_harness::{
    play_engine_match_series, MatchConfig, MatchSeriesConfig,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "match series failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> LaserChessResult<()> {
    let games = std::env::args()
        .skip_while(|arg| arg != "--games")
        .nth(1)
        .and_then(|n| n.parse::<u16>().ok())
        .unwrap_or(10);

    let laser = LaserEngine::official()?;
    let table = Arc::clone(laser.hit_table());

    // Customize these two lines to experiment with different engines and depths.
    let player1 = || {
        Box::new(MinimaxEngine::new(Arc::clone(&table), RulesConfig::default()).with_depth(2))
            as Box<dyn Engine>
    };
    let player2 = || Box::new(RandomEngine::default()) as Box<dyn Engine>;

    let stats = play_engine_match_series(
        player1,
        player2,
        &laser,
        &MatchSeriesConfig {
            games,
            base_seed: 1234,
            per_game: MatchConfig {
                max_plies: 200,
                ..MatchConfig::default()
            },
        },
    )?;

    println!("{}", stats.report());
    println!("outcomes: {:?}", stats.outcomes);
    Ok(())
}
