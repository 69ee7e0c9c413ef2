//! Line-protocol front-end and command loop.
//!
//! Parses console commands, maintains the current game session, routes `go`
//! requests to the selected engine implementation, and emits line-oriented
//! output on stdout. Diagnostics go through `tracing`, never stdout.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::{info, warn};

use crate::engines::engine_minimax::{
    parse_bool, MinimaxEngine, DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH,
};
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::{Engine, SearchParams};
use crate::game_state::board::Board;
use crate::game_state::board_rules::{Layout, RulesConfig};
use crate::game_state::board_types::Color;
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::game_state::movement::{Movement, MovementKind};
use crate::laser::hit_table::HitTable;
use crate::laser::laser_route::{LaserAction, LaserEngine, LaserEvent, LaserPathStep};
use crate::session::game_session::{GameSession, GameStatus, TurnOutcome};
use crate::session::network_payload::MovementPayload;
use crate::session::opponent::EngineOpponent;
use crate::utils::algebraic::{algebraic_to_location, location_to_algebraic};
use crate::utils::render_board::render_board;

const CONSOLE_NAME: &str = "Laser Chess";

pub fn run_stdio_loop() -> LaserChessResult<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut console = ConsoleState::new()?;

    for line in stdin.lock().lines() {
        let line = line.map_err(console_io)?;
        let should_quit = console.handle_command(&line, &mut stdout).map_err(console_io)?;
        stdout.flush().map_err(console_io)?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineKind {
    Minimax,
    Random,
}

impl EngineKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "minimax" => Some(EngineKind::Minimax),
            "random" => Some(EngineKind::Random),
            _ => None,
        }
    }
}

struct ConsoleState {
    session: GameSession,
    layout: Layout,
    hit_table: Arc<HitTable>,
    pending_hit_table: Option<Arc<HitTable>>,
    rules: RulesConfig,
    engine_kind: EngineKind,
    depth: u8,
    movetime_ms: Option<u64>,
    opponent: EngineOpponent,
}

impl ConsoleState {
    fn new() -> LaserChessResult<Self> {
        let hit_table = Arc::new(HitTable::official()?);
        let rules = RulesConfig::default();
        let layout = Layout::Ace;
        let engine_kind = EngineKind::Minimax;
        let depth = DEFAULT_SEARCH_DEPTH;
        let engine = build_engine(engine_kind, &hit_table, rules, depth, None)?;

        Ok(Self {
            session: GameSession::new(
                Board::from_layout(layout),
                LaserEngine::new(Arc::clone(&hit_table)),
                rules,
            ),
            layout,
            hit_table,
            pending_hit_table: None,
            rules,
            engine_kind,
            depth,
            movetime_ms: None,
            opponent: EngineOpponent::new(engine, SearchParams::default()),
        })
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "id" => {
                writeln!(out, "id name {}", CONSOLE_NAME)?;
                writeln!(out, "option name KingRotation type check default false")?;
                writeln!(out, "option name Depth type spin default 1 min 1 max 8")?;
                writeln!(out, "option name MoveTime type spin default 0 min 0")?;
                writeln!(
                    out,
                    "option name Engine type combo default minimax var minimax var random"
                )?;
                writeln!(out, "option name HitTable type string default <builtin>")?;
                writeln!(out, "ready")?;
            }
            "newgame" => {
                if let Err(err) = self.handle_newgame(parts.next()) {
                    writeln!(out, "info string newgame error: {}", err)?;
                } else {
                    writeln!(out, "info string layout {}", self.layout.name())?;
                }
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {}", err)?;
                }
            }
            "select" => {
                if let Err(err) = self.handle_select(parts.next(), out) {
                    writeln!(out, "info string select error: {}", err)?;
                }
            }
            "move" => {
                if let Err(err) = self.handle_move(trimmed, out) {
                    writeln!(out, "info string move error: {}", err)?;
                }
            }
            "payload" => {
                let json = trimmed.strip_prefix("payload").unwrap_or_default().trim();
                let applied = MovementPayload::from_json(json)
                    .and_then(|payload| self.session.apply_payload(&payload));
                match applied {
                    Ok(outcome) => write_outcome(out, outcome.as_ref(), &self.session)?,
                    Err(err) => writeln!(out, "info string payload error: {}", err)?,
                }
            }
            "go" => {
                if let Err(err) = self.handle_go(trimmed, out) {
                    writeln!(out, "info string go error: {}", err)?;
                    writeln!(out, "bestmove none")?;
                }
            }
            "reply" => match self.session.advance_opponent(&mut self.opponent) {
                Ok(outcome) => write_outcome(out, outcome.as_ref(), &self.session)?,
                Err(err) => writeln!(out, "info string reply error: {}", err)?,
            },
            "laser" => {
                let color = match parts.next() {
                    Some(name) => Color::from_name(name),
                    None => Some(self.session.current_player()),
                };
                match color {
                    Some(color) => match self.session.preview_laser(color) {
                        Ok(route) => writeln!(out, "laser {}", describe_route(&route))?,
                        Err(err) => writeln!(out, "info string laser error: {}", err)?,
                    },
                    None => writeln!(out, "info string laser error: unknown color")?,
                }
            }
            "d" => {
                write!(out, "{}", render_board(self.session.board()))?;
                writeln!(
                    out,
                    "turn {} moves {} status {:?}",
                    self.session.current_player().name(),
                    self.session.move_count(),
                    self.session.status()
                )?;
            }
            "sn" => {
                writeln!(out, "sn {}", self.session.board().to_notation())?;
            }
            "snapshot" => match self.session.snapshot().to_json() {
                Ok(json) => writeln!(out, "snapshot {}", json)?,
                Err(err) => writeln!(out, "info string snapshot error: {}", err)?,
            },
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string setoption error: {}", err)?;
                }
            }
            "pause" => {
                self.session.pause();
            }
            "resume" => {
                self.session.resume();
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                warn!(command = cmd, "unknown console command");
                writeln!(out, "info string unknown command '{}'", cmd)?;
            }
        }

        Ok(false)
    }

    fn handle_newgame(&mut self, layout_name: Option<&str>) -> LaserChessResult<()> {
        let layout = match layout_name {
            Some(name) => Layout::from_name(name).ok_or_else(|| LaserChessError::InvalidOption {
                name: "layout".to_owned(),
                reason: format!("unknown layout '{}'", name),
            })?,
            None => Layout::random(&mut rand::rng()),
        };

        self.layout = layout;
        self.reset_session(Board::from_layout(layout), Color::Blue, 0)?;
        self.opponent.engine_mut().new_game();
        info!(layout = layout.name(), "new game");
        Ok(())
    }

    fn handle_position(&mut self, line: &str) -> LaserChessResult<()> {
        let mut tokens = line.split_whitespace();
        let _ = tokens.next(); // "position"

        let board = match tokens.next() {
            Some("sn") => {
                let sn = tokens.next().ok_or_else(|| LaserChessError::InvalidNotation {
                    reason: "missing setup notation after 'position sn'".to_owned(),
                })?;
                Board::from_notation(sn)?
            }
            Some(layout) => Layout::from_name(layout)
                .map(Board::from_layout)
                .ok_or_else(|| LaserChessError::InvalidNotation {
                    reason: format!("unsupported position token '{}'", layout),
                })?,
            None => {
                return Err(LaserChessError::InvalidNotation {
                    reason: "incomplete position command".to_owned(),
                })
            }
        };

        let mut current = Color::Blue;
        let mut moves = 0u32;
        while let Some(tok) = tokens.next() {
            match tok {
                "turn" => {
                    current = tokens
                        .next()
                        .and_then(Color::from_name)
                        .ok_or_else(|| invalid_option("turn", "expected blue or red"))?;
                }
                "moves" => {
                    moves = tokens
                        .next()
                        .and_then(|n| n.parse::<u32>().ok())
                        .ok_or_else(|| invalid_option("moves", "expected a move count"))?;
                }
                other => return Err(invalid_option(other, "unexpected token")),
            }
        }

        self.reset_session(board, current, moves)
    }

    fn handle_select(
        &mut self,
        location: Option<&str>,
        out: &mut impl Write,
    ) -> LaserChessResult<()> {
        let name = location.ok_or_else(|| LaserChessError::InvalidLocation {
            name: String::new(),
        })?;
        let location = algebraic_to_location(name)?;

        if self.session.select_piece(location) {
            let moves: Vec<String> = self
                .session
                .legal_moves_for_selection()
                .iter()
                .map(Movement::describe)
                .collect();
            writeln!(out, "selected {} moves {}", name, moves.join(", ")).map_err(console_io)?;
        } else {
            writeln!(out, "selected none").map_err(console_io)?;
        }
        Ok(())
    }

    fn handle_move(&mut self, line: &str, out: &mut impl Write) -> LaserChessResult<()> {
        let movement = parse_movement(line)?;

        if self.session.selected() != Some(movement.src) && !self.session.select_piece(movement.src)
        {
            writeln!(out, "info string move rejected").map_err(console_io)?;
            return Ok(());
        }

        let outcome = self.session.apply_turn(movement)?;
        if outcome.is_none() {
            // Keep the console stateless between commands.
            self.session.deselect();
        }
        write_outcome(out, outcome.as_ref(), &self.session).map_err(console_io)
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> LaserChessResult<()> {
        let params = parse_search_params(line)?;
        let color = self.session.current_player();
        let result = self
            .opponent
            .engine_mut()
            .choose_move(self.session.board(), color, &params)?;

        for info in &result.info_lines {
            writeln!(out, "{}", info).map_err(console_io)?;
        }
        let written = match result.best_move {
            Some(best) => writeln!(out, "bestmove {}", best.describe()),
            None => writeln!(out, "bestmove none"),
        };
        written.map_err(console_io)
    }

    fn handle_setoption(&mut self, line: &str) -> LaserChessResult<()> {
        let mut tokens = line.split_whitespace();
        let _ = tokens.next(); // setoption

        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in tokens {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        if name.eq_ignore_ascii_case("KingRotation") {
            self.rules.allow_king_rotation =
                parse_bool(&value).ok_or_else(|| invalid_option(&name, "expected true or false"))?;
            self.session.set_rules(self.rules);
            self.opponent.engine_mut().set_option("KingRotation", &value)?;
        } else if name.eq_ignore_ascii_case("Depth") {
            let depth = value
                .parse::<u8>()
                .ok()
                .filter(|depth| (1..=MAX_SEARCH_DEPTH).contains(depth))
                .ok_or_else(|| invalid_option(&name, "expected a depth between 1 and 8"))?;
            self.opponent.engine_mut().set_option("Depth", &value)?;
            self.depth = depth;
        } else if name.eq_ignore_ascii_case("MoveTime") {
            let ms = value
                .parse::<u64>()
                .map_err(|_| invalid_option(&name, "expected milliseconds"))?;
            self.movetime_ms = (ms > 0).then_some(ms);
            self.opponent.engine_mut().set_option("MoveTime", &value)?;
        } else if name.eq_ignore_ascii_case("Engine") {
            let kind = EngineKind::from_name(&value)
                .ok_or_else(|| invalid_option(&name, "expected minimax or random"))?;
            self.engine_kind = kind;
            self.rebuild_engine()?;
        } else if name.eq_ignore_ascii_case("HitTable") {
            let table = if value.eq_ignore_ascii_case("builtin") {
                HitTable::official()?
            } else {
                HitTable::from_path(&value)?
            };
            // Session and engine switch together at the next newgame/position.
            self.pending_hit_table = Some(Arc::new(table));
        } else {
            self.opponent.engine_mut().set_option(&name, &value)?;
        }

        Ok(())
    }

    fn rebuild_engine(&mut self) -> LaserChessResult<()> {
        let engine = build_engine(
            self.engine_kind,
            &self.hit_table,
            self.rules,
            self.depth,
            self.movetime_ms,
        )?;
        self.opponent = EngineOpponent::new(engine, SearchParams::default());
        Ok(())
    }

    fn reset_session(&mut self, board: Board, current: Color, moves: u32) -> LaserChessResult<()> {
        if let Some(table) = self.pending_hit_table.take() {
            self.hit_table = table;
            self.rebuild_engine()?;
            info!("hit table switched for the new game");
        }
        self.session = GameSession::with_players(
            board,
            LaserEngine::new(Arc::clone(&self.hit_table)),
            self.rules,
            Color::Blue,
            current,
            moves,
        );
        Ok(())
    }
}

fn build_engine(
    kind: EngineKind,
    hit_table: &Arc<HitTable>,
    rules: RulesConfig,
    depth: u8,
    movetime_ms: Option<u64>,
) -> LaserChessResult<Box<dyn Engine>> {
    let mut engine: Box<dyn Engine> = match kind {
        EngineKind::Minimax => {
            Box::new(MinimaxEngine::new(Arc::clone(hit_table), rules).with_depth(depth))
        }
        EngineKind::Random => Box::new(RandomEngine::new(rules)),
    };
    if let Some(ms) = movetime_ms {
        engine.set_option("MoveTime", &ms.to_string())?;
    }
    Ok(engine)
}

/// `move <normal|special|cw|ccw> <src> [dest]`
fn parse_movement(line: &str) -> LaserChessResult<Movement> {
    let mut tokens = line.split_whitespace();
    let _ = tokens.next(); // "move"

    let kind_token = tokens.next().unwrap_or_default();
    let kind = MovementKind::from_token(kind_token)
        .ok_or_else(|| invalid_option("move", "expected normal, special, cw or ccw"))?;
    let src = algebraic_to_location(tokens.next().unwrap_or_default())?;

    if kind.is_rotation() {
        return Ok(Movement::new(kind, src, src));
    }
    let dest = algebraic_to_location(tokens.next().unwrap_or_default())?;
    Ok(Movement::new(kind, src, dest))
}

fn parse_search_params(line: &str) -> LaserChessResult<SearchParams> {
    let mut params = SearchParams::default();
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut i = 0usize;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = Some(
                    tokens
                        .get(i)
                        .and_then(|x| x.parse::<u8>().ok())
                        .ok_or_else(|| invalid_option("depth", "expected a depth"))?,
                );
            }
            "movetime" => {
                i += 1;
                params.movetime_ms = Some(
                    tokens
                        .get(i)
                        .and_then(|x| x.parse::<u64>().ok())
                        .ok_or_else(|| invalid_option("movetime", "expected milliseconds"))?,
                );
            }
            _ => {}
        }
        i += 1;
    }
    Ok(params)
}

fn write_outcome(
    out: &mut impl Write,
    outcome: Option<&TurnOutcome>,
    session: &GameSession,
) -> io::Result<()> {
    let Some(outcome) = outcome else {
        return writeln!(out, "info string move rejected");
    };

    writeln!(out, "played {}", outcome.movement.describe())?;
    writeln!(out, "laser {}", describe_route(&outcome.route))?;
    if let Some(killed) = outcome.killed {
        writeln!(
            out,
            "killed {} {}",
            killed.color.name(),
            killed.kind.letter()
        )?;
    }
    match outcome.winner {
        Some(winner) => writeln!(out, "gameover winner {}", winner.name()),
        None if session.status() == GameStatus::Paused => {
            writeln!(out, "turn {} paused", session.current_player().name())
        }
        None => writeln!(out, "turn {}", session.current_player().name()),
    }
}

/// Squares the beam visits, with the final event appended, e.g.
/// `j1 j2 j3 b3 off nothing`.
fn describe_route(route: &[LaserPathStep]) -> String {
    let mut parts: Vec<String> = route
        .iter()
        .map(|step| location_to_algebraic(step.location).unwrap_or_else(|_| "off".to_owned()))
        .collect();

    if let Some(last) = route.last() {
        let ending = match (last.event, last.action) {
            (LaserEvent::End, LaserAction::Kill) => "kill",
            _ => "nothing",
        };
        parts.push(ending.to_owned());
    }
    parts.join(" ")
}

fn invalid_option(name: &str, reason: &str) -> LaserChessError {
    LaserChessError::InvalidOption {
        name: name.to_owned(),
        reason: reason.to_owned(),
    }
}

fn console_io(err: io::Error) -> LaserChessError {
    LaserChessError::ConsoleIo { source: err }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{describe_route, parse_movement, parse_search_params, ConsoleState, EngineKind};
    use crate::game_state::board_types::{Color, Location};
    use crate::game_state::movement::MovementKind;

    fn run(console: &mut ConsoleState, line: &str) -> String {
        let mut out = Vec::new();
        console
            .handle_command(line, &mut out)
            .expect("write to buffer");
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn move_command_plays_a_turn() {
        let mut console = ConsoleState::new().expect("console");
        let out = run(&mut console, "move normal e1 e2");
        assert!(out.contains("played normal e1 e2"), "{out}");
        assert!(out.contains("turn red"), "{out}");
        assert_eq!(console.session.current_player(), Color::Red);
    }

    #[test]
    fn rejected_moves_do_not_change_turn() {
        let mut console = ConsoleState::new().expect("console");
        let out = run(&mut console, "move normal e1 e3");
        assert!(out.contains("move rejected"), "{out}");
        let out = run(&mut console, "move normal f8 f7");
        assert!(out.contains("move rejected"), "{out}");
        assert_eq!(console.session.current_player(), Color::Blue);
        assert_eq!(console.session.move_count(), 0);
    }

    #[test]
    fn position_command_sets_turn_and_move_count() {
        let mut console = ConsoleState::new().expect("console");
        run(&mut console, "position mercury turn red moves 6");
        assert_eq!(console.session.current_player(), Color::Red);
        assert_eq!(console.session.move_count(), 6);

        let sn = run(&mut console, "sn");
        let out = run(&mut console, "position sn bogus");
        assert!(out.contains("position error"), "{out}");
        assert_eq!(run(&mut console, "sn"), sn);
    }

    #[test]
    fn go_reports_a_best_move_without_playing_it() {
        let mut console = ConsoleState::new().expect("console");
        let out = run(&mut console, "go depth 1");
        assert!(out.contains("info depth 1"), "{out}");
        assert!(out.contains("bestmove "), "{out}");
        assert_eq!(console.session.move_count(), 0);
    }

    #[test]
    fn reply_lets_the_engine_answer() {
        let mut console = ConsoleState::new().expect("console");
        run(&mut console, "move normal e1 e2");
        let out = run(&mut console, "reply");
        assert!(out.contains("played "), "{out}");
        assert_eq!(console.session.move_count(), 2);
    }

    #[test]
    fn setoption_updates_rules_and_engine() {
        let mut console = ConsoleState::new().expect("console");
        run(&mut console, "setoption name KingRotation value true");
        assert!(console.rules.allow_king_rotation);
        assert!(console.session.rules().allow_king_rotation);

        run(&mut console, "setoption name Engine value random");
        assert_eq!(console.engine_kind, EngineKind::Random);

        let out = run(&mut console, "setoption name Depth value 99");
        assert!(out.contains("setoption error"), "{out}");

        let out = run(&mut console, "setoption name HitTable value /nonexistent/table.json");
        assert!(out.contains("setoption error"), "{out}");
    }

    #[test]
    fn hit_table_switch_waits_for_the_next_game() {
        let mut console = ConsoleState::new().expect("console");
        let live = Arc::clone(&console.hit_table);
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/laser_hits.json");

        let out = run(&mut console, &format!("setoption name HitTable value {path}"));
        assert!(!out.contains("setoption error"), "{out}");
        assert!(Arc::ptr_eq(&console.hit_table, &live));
        assert!(Arc::ptr_eq(console.session.laser().hit_table(), &live));
        assert!(console.pending_hit_table.is_some());

        // Play continues on the table the game started with.
        let out = run(&mut console, "move normal e1 e2");
        assert!(out.contains("played normal e1 e2"), "{out}");
        let out = run(&mut console, "reply");
        assert!(out.contains("played "), "{out}");

        run(&mut console, "newgame ace");
        assert!(console.pending_hit_table.is_none());
        assert!(!Arc::ptr_eq(&console.hit_table, &live));
        assert!(Arc::ptr_eq(
            console.session.laser().hit_table(),
            &console.hit_table
        ));
        assert_eq!(console.session.move_count(), 0);
    }

    #[test]
    fn opening_laser_preview_leaves_the_board() {
        let mut console = ConsoleState::new().expect("console");
        let out = run(&mut console, "laser blue");
        assert!(out.starts_with("laser j1 j2 j3"), "{out}");
        assert!(out.trim_end().ends_with("off nothing"), "{out}");
        assert!(describe_route(&[]).is_empty());
    }

    #[test]
    fn parses_movement_and_search_tokens() {
        let rotation = parse_movement("move ccw c3").expect("rotation");
        assert_eq!(rotation.kind, MovementKind::RotateCounterClockwise);
        assert_eq!(rotation.src, Location::new(2, 5));
        assert_eq!(rotation.dest, rotation.src);
        assert!(parse_movement("move hop c3 c4").is_err());
        assert!(parse_movement("move normal c3").is_err());

        let params = parse_search_params("go depth 3 movetime 250").expect("params");
        assert_eq!(params.depth, Some(3));
        assert_eq!(params.movetime_ms, Some(250));
        assert!(parse_search_params("go depth x").is_err());
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut console = ConsoleState::new().expect("console");
        let mut out = Vec::new();
        assert!(console.handle_command("quit", &mut out).expect("io"));
        assert!(!console.handle_command("pause", &mut out).expect("io"));
    }
}
