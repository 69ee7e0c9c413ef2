//! Crate root module declarations for the laser chess rules engine.
//!
//! Exposes the board model, the laser tracer, move validation, the turn-taking
//! session, the search engines and the console front-end so the binary, the
//! benches and external hosts can import stable module paths.

pub mod game_state {
    pub mod board;
    pub mod board_rules;
    pub mod board_types;
    pub mod errors;
    pub mod movement;
}

pub mod laser {
    pub mod hit_table;
    pub mod laser_route;
    pub mod line_points;
}

pub mod move_generation {
    pub mod movement_validator;
}

pub mod search {
    pub mod board_scoring;
    pub mod minimax;
}

pub mod engines {
    pub mod engine_minimax;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod session {
    pub mod game_session;
    pub mod network_payload;
    pub mod opponent;
}

pub mod console {
    pub mod console_loop;
}

pub mod utils {
    pub mod algebraic;
    pub mod engine_match_harness;
    pub mod render_board;
    pub mod sn_generator;
    pub mod sn_parser;
}
