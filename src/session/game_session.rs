//! Turn-taking state machine around a single authoritative board.
//!
//! A turn moves through `Idle -> PieceSelected -> MoveApplied -> LaserResolved`
//! and then either back to `Idle` for the other color or into `GameOver`.
//! The session owns the board; it hands out the applied movement and the
//! full laser route as plain data and never talks to a renderer.
//!
//! Every turn is computed on a copy of the board and committed only once the
//! laser has been resolved, so a failed turn leaves the live board untouched.

use tracing::{debug, info, warn};

use crate::game_state::board::Board;
use crate::game_state::board_rules::RulesConfig;
use crate::game_state::board_types::{Color, Location, Piece};
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::game_state::movement::Movement;
use crate::laser::laser_route::{LaserEngine, LaserPathStep, LaserRoute};
use crate::move_generation::movement_validator::{is_legal, legal_moves_from, rotation_moves};
use crate::session::network_payload::{MovementPayload, SessionSnapshot};
use crate::session::opponent::{OpponentReply, OpponentStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    PieceSelected,
    MoveApplied,
    LaserResolved,
    GameOver,
}

/// What a renderer needs to animate one turn. The board already reflects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub movement: Movement,
    pub route: LaserRoute,
    pub killed: Option<Piece>,
    pub winner: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    laser: LaserEngine,
    rules: RulesConfig,
    current_player: Color,
    user_color: Color,
    opponent_color: Color,
    status: GameStatus,
    phase: TurnPhase,
    selected: Option<Location>,
    input_locked: bool,
    move_count: u32,
    last_move: Option<Movement>,
    last_route: LaserRoute,
}

impl GameSession {
    /// Blue user against a Red opponent, Blue to move.
    pub fn new(board: Board, laser: LaserEngine, rules: RulesConfig) -> Self {
        Self::with_players(board, laser, rules, Color::Blue, Color::Blue, 0)
    }

    /// A session on `board`. A board already missing one King starts in
    /// `GameOver` with the other color as winner.
    pub fn with_players(
        mut board: Board,
        laser: LaserEngine,
        rules: RulesConfig,
        user_color: Color,
        current_player: Color,
        move_count: u32,
    ) -> Self {
        let (status, phase, input_locked) = if board.settle_winner().is_some() {
            (GameStatus::GameOver, TurnPhase::GameOver, true)
        } else {
            (GameStatus::Playing, TurnPhase::Idle, false)
        };

        Self {
            board,
            laser,
            rules,
            current_player,
            user_color,
            opponent_color: user_color.opposite(),
            status,
            phase,
            selected: None,
            input_locked,
            move_count,
            last_move: None,
            last_route: Vec::new(),
        }
    }

    /// Resume a session from a snapshot received over the network.
    pub fn from_snapshot(
        snapshot: &SessionSnapshot,
        laser: LaserEngine,
        rules: RulesConfig,
    ) -> LaserChessResult<Self> {
        if snapshot.user_color == snapshot.opponent_color {
            return Err(LaserChessError::InvalidPayload {
                reason: "user and opponent share a color".to_owned(),
            });
        }
        let board = Board::from_notation(&snapshot.sn)?;
        Ok(Self::with_players(
            board,
            laser,
            rules,
            snapshot.user_color,
            snapshot.current_player,
            snapshot.number_of_moves,
        ))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            sn: self.board.to_notation(),
            current_player: self.current_player,
            number_of_moves: self.move_count,
            user_color: self.user_color,
            opponent_color: self.opponent_color,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn laser(&self) -> &LaserEngine {
        &self.laser
    }

    #[inline]
    pub fn rules(&self) -> RulesConfig {
        self.rules
    }

    pub fn set_rules(&mut self, rules: RulesConfig) {
        self.rules = rules;
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn user_color(&self) -> Color {
        self.user_color
    }

    #[inline]
    pub fn opponent_color(&self) -> Color {
        self.opponent_color
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[inline]
    pub fn selected(&self) -> Option<Location> {
        self.selected
    }

    #[inline]
    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Movement committed on the most recent turn.
    #[inline]
    pub fn last_move(&self) -> Option<Movement> {
        self.last_move
    }

    /// Route fired on the most recent turn.
    #[inline]
    pub fn last_route(&self) -> &[LaserPathStep] {
        &self.last_route
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.board.winner()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Select a piece of the side to move. Selecting the selected square
    /// again clears the selection. Returns whether a piece is now selected.
    pub fn select_piece(&mut self, location: Location) -> bool {
        if self.input_locked || self.is_game_over() {
            return false;
        }
        if self.selected == Some(location) {
            self.deselect();
            return false;
        }

        let owned = self
            .board
            .piece_at(location)
            .is_some_and(|piece| piece.color == self.current_player);
        if !owned {
            return false;
        }

        debug!(
            color = self.current_player.name(),
            col = location.col,
            row = location.row,
            "piece selected"
        );
        self.selected = Some(location);
        self.phase = TurnPhase::PieceSelected;
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        if self.phase == TurnPhase::PieceSelected {
            self.phase = TurnPhase::Idle;
        }
    }

    /// Steps, swaps and rotations available to the selected piece.
    pub fn legal_moves_for_selection(&self) -> Vec<Movement> {
        let Some(location) = self.selected else {
            return Vec::new();
        };
        let mut moves = legal_moves_from(&self.board, location);
        moves.extend(rotation_moves(&self.board, location, &self.rules));
        moves
    }

    /// Play `movement` for the selected piece. A movement that is not legal
    /// for the current selection is rejected with `Ok(None)`.
    pub fn apply_turn(&mut self, movement: Movement) -> LaserChessResult<Option<TurnOutcome>> {
        if self.input_locked || self.is_game_over() || self.phase != TurnPhase::PieceSelected {
            return Ok(None);
        }
        if self.selected != Some(movement.src)
            || !self.legal_moves_for_selection().contains(&movement)
        {
            debug!(movement = %movement.describe(), "movement rejected for selection");
            return Ok(None);
        }

        self.commit_turn(movement).map(Some)
    }

    /// Play a movement that arrived without a selection step (engine or
    /// remote opponent). It must be legal for the side to move.
    pub fn apply_external_move(
        &mut self,
        movement: Movement,
    ) -> LaserChessResult<Option<TurnOutcome>> {
        if self.input_locked || self.is_game_over() {
            return Ok(None);
        }

        let owned = self
            .board
            .piece_at(movement.src)
            .is_some_and(|piece| piece.color == self.current_player);
        if !owned || !is_legal(&self.board, &movement, &self.rules) {
            warn!(
                color = self.current_player.name(),
                movement = %movement.describe(),
                "external movement rejected"
            );
            return Ok(None);
        }

        self.selected = None;
        self.commit_turn(movement).map(Some)
    }

    pub fn apply_payload(
        &mut self,
        payload: &MovementPayload,
    ) -> LaserChessResult<Option<TurnOutcome>> {
        let movement = payload.to_movement()?;
        self.apply_external_move(movement)
    }

    /// Let `strategy` play if it is the opponent's turn and the game is running.
    pub fn advance_opponent(
        &mut self,
        strategy: &mut dyn OpponentStrategy,
    ) -> LaserChessResult<Option<TurnOutcome>> {
        if self.status != GameStatus::Playing
            || self.input_locked
            || self.current_player != self.opponent_color
        {
            return Ok(None);
        }

        match strategy.next_move(&self.board, self.current_player)? {
            OpponentReply::AwaitExternal => Ok(None),
            OpponentReply::Move(movement) => match self.apply_external_move(movement)? {
                Some(outcome) => Ok(Some(outcome)),
                None => Err(LaserChessError::IllegalOpponentMove {
                    description: movement.describe(),
                }),
            },
        }
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
            info!("session paused");
        }
    }

    pub fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
            info!("session resumed");
        }
    }

    /// Trace `color`'s beam on the live board without applying it.
    pub fn preview_laser(&self, color: Color) -> LaserChessResult<LaserRoute> {
        self.laser.trace_route(&self.board, color)
    }

    fn commit_turn(&mut self, movement: Movement) -> LaserChessResult<TurnOutcome> {
        self.input_locked = true;

        let mut next = self.board.clone();
        let resolved = next.apply_movement(&movement).and_then(|()| {
            self.phase = TurnPhase::MoveApplied;
            self.laser.trace_route(&next, self.current_player)
        });
        let route = match resolved {
            Ok(route) => route,
            Err(err) => {
                self.input_locked = false;
                self.phase = TurnPhase::Idle;
                self.selected = None;
                return Err(err);
            }
        };

        let killed = route
            .last()
            .and_then(|final_step| next.apply_laser_result(final_step));
        self.phase = TurnPhase::LaserResolved;

        self.board = next;
        self.move_count += 1;
        self.selected = None;
        self.last_move = Some(movement);
        self.last_route = route.clone();

        info!(
            color = self.current_player.name(),
            movement = %movement.describe(),
            move_count = self.move_count,
            killed = ?killed.map(|piece| piece.kind),
            "turn applied"
        );

        let winner = self.board.winner();
        if let Some(winner) = winner {
            // Input stays locked for good.
            self.status = GameStatus::GameOver;
            self.phase = TurnPhase::GameOver;
            info!(winner = winner.name(), "game over");
        } else {
            self.current_player = self.current_player.opposite();
            self.input_locked = false;
            self.phase = TurnPhase::Idle;
        }

        Ok(TurnOutcome {
            movement,
            route,
            killed,
            winner,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{GameSession, GameStatus, TurnPhase};
    use crate::engines::engine_minimax::MinimaxEngine;
    use crate::engines::engine_trait::SearchParams;
    use crate::game_state::board::Board;
    use crate::game_state::board_rules::RulesConfig;
    use crate::game_state::board_types::{Color, Location, Orientation, Piece, PieceKind};
    use crate::game_state::movement::{Movement, MovementKind};
    use crate::laser::hit_table::HitTable;
    use crate::laser::laser_route::{LaserAction, LaserEngine};
    use crate::session::network_payload::{MovementPayload, SessionSnapshot};
    use crate::session::opponent::{EngineOpponent, ExternalOpponent};

    fn laser() -> LaserEngine {
        LaserEngine::official().expect("shipped table")
    }

    fn put(board: &mut Board, col: i8, row: i8, kind: PieceKind, color: Color, deg: i32) {
        board
            .place_piece(
                Location::new(col, row),
                Piece::new(
                    kind,
                    color,
                    Orientation::from_degrees(deg).expect("multiple of 90"),
                ),
            )
            .expect("on board");
    }

    /// A Blue Defender shields the red King from Blue's beam on column j.
    fn shielded_duel() -> Board {
        let mut board = Board::empty();
        put(&mut board, 9, 7, PieceKind::Laser, Color::Blue, 0);
        put(&mut board, 0, 0, PieceKind::Laser, Color::Red, 180);
        put(&mut board, 4, 7, PieceKind::King, Color::Blue, 0);
        put(&mut board, 9, 1, PieceKind::King, Color::Red, 0);
        put(&mut board, 9, 4, PieceKind::Defender, Color::Blue, 180);
        board
    }

    fn session(board: Board) -> GameSession {
        GameSession::new(board, laser(), RulesConfig::default())
    }

    #[test]
    fn selection_toggles_and_rejects_foreign_pieces() {
        let mut session = session(Board::new());
        let blue_king = Location::new(4, 7);
        let red_king = Location::new(5, 0);

        assert!(!session.select_piece(red_king));
        assert!(!session.select_piece(Location::new(0, 3)));
        assert_eq!(session.phase(), TurnPhase::Idle);

        assert!(session.select_piece(blue_king));
        assert_eq!(session.phase(), TurnPhase::PieceSelected);
        assert!(!session.legal_moves_for_selection().is_empty());

        assert!(!session.select_piece(blue_king));
        assert_eq!(session.selected(), None);
        assert_eq!(session.phase(), TurnPhase::Idle);
    }

    #[test]
    fn turn_hands_off_to_the_other_color() {
        let mut session = session(shielded_duel());
        assert_eq!(session.last_move(), None);
        let king = Location::new(4, 7);
        assert!(session.select_piece(king));

        let movement = Movement::new(MovementKind::Normal, king, Location::new(4, 6));
        let outcome = session
            .apply_turn(movement)
            .expect("turn resolves")
            .expect("movement accepted");

        assert_eq!(outcome.movement, movement);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.killed, None);
        assert_eq!(
            outcome.route.last().map(|step| step.location),
            Some(Location::new(9, 4))
        );
        assert_eq!(session.current_player(), Color::Red);
        assert!(!session.input_locked());
        assert_eq!(session.move_count(), 1);
        assert_eq!(session.phase(), TurnPhase::Idle);
        assert_eq!(session.last_route(), outcome.route.as_slice());
        assert_eq!(session.last_move(), Some(movement));

        // Blue pieces are no longer selectable.
        assert!(!session.select_piece(Location::new(4, 6)));
    }

    #[test]
    fn king_kill_ends_the_game_for_good() {
        let mut session = session(shielded_duel());
        let defender = Location::new(9, 4);
        assert!(session.select_piece(defender));

        let outcome = session
            .apply_turn(Movement::new(
                MovementKind::Normal,
                defender,
                Location::new(8, 3),
            ))
            .expect("turn resolves")
            .expect("movement accepted");

        assert_eq!(outcome.winner, Some(Color::Blue));
        assert_eq!(outcome.killed.map(|piece| piece.kind), Some(PieceKind::King));
        assert_eq!(
            outcome.route.last().map(|step| step.action),
            Some(LaserAction::Kill)
        );
        assert_eq!(session.status(), GameStatus::GameOver);
        assert!(session.input_locked());
        assert_eq!(session.winner(), Some(Color::Blue));

        assert!(!session.select_piece(Location::new(4, 7)));
        let retry = session
            .apply_external_move(Movement::new(
                MovementKind::Normal,
                Location::new(4, 7),
                Location::new(4, 6),
            ))
            .expect("no error");
        assert!(retry.is_none());
    }

    #[test]
    fn illegal_movements_leave_the_board_untouched() {
        let mut session = session(shielded_duel());
        let before = session.board().clone();
        let king = Location::new(4, 7);
        assert!(session.select_piece(king));

        let too_far = Movement::new(MovementKind::Normal, king, Location::new(4, 5));
        assert!(session.apply_turn(too_far).expect("no error").is_none());

        let other_piece = Movement::new(
            MovementKind::Normal,
            Location::new(9, 4),
            Location::new(8, 4),
        );
        assert!(session.apply_turn(other_piece).expect("no error").is_none());

        assert_eq!(session.board(), &before);
        assert_eq!(session.current_player(), Color::Blue);
        assert_eq!(session.move_count(), 0);
    }

    #[test]
    fn rotation_is_offered_for_selection() {
        let mut session = session(shielded_duel());
        let defender = Location::new(9, 4);
        assert!(session.select_piece(defender));
        let rotation = Movement::rotation(defender, true);
        assert!(session.legal_moves_for_selection().contains(&rotation));

        let outcome = session
            .apply_turn(rotation)
            .expect("turn resolves")
            .expect("rotation accepted");
        // The shield now faces sideways, so Blue's own beam removes the Defender.
        assert_eq!(
            outcome.killed.map(|piece| piece.kind),
            Some(PieceKind::Defender)
        );
        assert_eq!(session.board().piece_at(defender), None);
    }

    #[test]
    fn payload_movements_are_validated_and_applied() {
        let mut session = session(shielded_duel());
        let foreign = MovementPayload::from_json(
            r#"{"type":"normal","srcLocation":{"col":9,"row":1},"destLocation":{"col":8,"row":1}}"#,
        )
        .expect("decodes");
        assert!(session.apply_payload(&foreign).expect("no error").is_none());

        let own = MovementPayload::from_json(
            r#"{"type":"normal","srcLocation":{"col":4,"row":7},"destLocation":{"col":3,"row":6}}"#,
        )
        .expect("decodes");
        let outcome = session
            .apply_payload(&own)
            .expect("no error")
            .expect("accepted");
        assert_eq!(outcome.movement.dest, Location::new(3, 6));
        assert_eq!(session.current_player(), Color::Red);
    }

    #[test]
    fn opponent_strategy_plays_only_on_its_turn() {
        let engine = MinimaxEngine::new(
            Arc::new(HitTable::official().expect("shipped table")),
            RulesConfig::default(),
        );
        let mut engine_opponent = EngineOpponent::new(Box::new(engine), SearchParams::default());
        let mut session = session(Board::new());

        assert!(session
            .advance_opponent(&mut engine_opponent)
            .expect("no error")
            .is_none());

        let king = Location::new(4, 7);
        assert!(session.select_piece(king));
        session
            .apply_turn(Movement::new(MovementKind::Normal, king, Location::new(4, 6)))
            .expect("turn resolves")
            .expect("accepted");
        assert_eq!(session.current_player(), Color::Red);

        session.pause();
        assert!(session
            .advance_opponent(&mut engine_opponent)
            .expect("no error")
            .is_none());
        assert_eq!(session.move_count(), 1);

        assert!(session
            .advance_opponent(&mut ExternalOpponent)
            .expect("no error")
            .is_none());

        session.resume();
        let outcome = session
            .advance_opponent(&mut engine_opponent)
            .expect("no error")
            .expect("engine played");
        assert_eq!(session.move_count(), 2);
        assert!(outcome.winner.is_some() || session.current_player() == Color::Blue);
    }

    #[test]
    fn snapshot_resumes_the_same_session() {
        let snapshot = SessionSnapshot {
            sn: Board::new().to_notation(),
            current_player: Color::Red,
            number_of_moves: 7,
            user_color: Color::Red,
            opponent_color: Color::Blue,
        };
        let session = GameSession::from_snapshot(&snapshot, laser(), RulesConfig::default())
            .expect("valid snapshot");
        assert_eq!(session.current_player(), Color::Red);
        assert_eq!(session.user_color(), Color::Red);
        assert_eq!(session.snapshot(), snapshot);

        let broken = SessionSnapshot {
            sn: "not/a/board".to_owned(),
            ..snapshot
        };
        assert!(GameSession::from_snapshot(&broken, laser(), RulesConfig::default()).is_err());
    }

    #[test]
    fn resuming_without_a_king_is_already_over() {
        let mut board = Board::new();
        board.remove_piece(Location::new(5, 0));
        let snapshot = SessionSnapshot {
            sn: board.to_notation(),
            current_player: Color::Red,
            number_of_moves: 9,
            user_color: Color::Blue,
            opponent_color: Color::Red,
        };

        let mut session = GameSession::from_snapshot(&snapshot, laser(), RulesConfig::default())
            .expect("valid snapshot");
        assert_eq!(session.status(), GameStatus::GameOver);
        assert_eq!(session.phase(), TurnPhase::GameOver);
        assert_eq!(session.winner(), Some(Color::Blue));
        assert!(session.input_locked());

        let red_defender = Location::new(4, 0);
        assert!(!session.select_piece(red_defender));
        let played = session
            .apply_external_move(Movement::new(
                MovementKind::Normal,
                red_defender,
                Location::new(5, 0),
            ))
            .expect("no error");
        assert!(played.is_none());
        assert_eq!(session.move_count(), 9);
    }
}
