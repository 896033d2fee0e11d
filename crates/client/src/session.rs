//! Client-side game state and the click state machine.
//!
//! The session owns the only copy of the position. It is replaced solely by
//! server responses; the local legality check only gates submission.

use chess_core::uci::{coords_to_move, move_to_coords};
use chess_core::{MoveRequest, MoveResponse, NewGameResponse, Position, Side};
use tracing::{info, warn};

use crate::dispatch::Pending;

pub type Square = (usize, usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickButton {
    Primary,
    Secondary,
}

enum InFlight {
    Move {
        uci: String,
        slot: Pending<MoveResponse>,
    },
    NewGame(Pending<NewGameResponse>),
}

pub struct Session {
    position: Position,
    selected: Option<Square>,
    last_move: Option<(Square, Square)>,
    message: String,
    in_flight: Option<InFlight>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Position::start())
    }
}

impl Session {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            selected: None,
            last_move: None,
            message: String::new(),
            in_flight: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Handle a click on a board square. A move that passes the local check
    /// is handed to `dispatch`; the session then waits for its result.
    pub fn click<F>(&mut self, row: usize, col: usize, button: ClickButton, dispatch: F)
    where
        F: FnOnce(MoveRequest) -> Pending<MoveResponse>,
    {
        if self.is_waiting() {
            return;
        }
        if button == ClickButton::Secondary {
            self.selected = None;
            return;
        }

        let Some(from) = self.selected else {
            if self.position.owns_square(row, col) {
                self.selected = Some((row, col));
            }
            return;
        };

        let to = (row, col);
        if from == to {
            self.selected = None;
            return;
        }
        if self.position.owns_square(row, col) {
            self.selected = Some(to);
            return;
        }
        self.selected = None;

        let Some(uci) = self.build_move(from, to) else {
            return;
        };
        info!(client_move = %uci, "Player move");

        if let Err(e) = self.position.apply(&uci) {
            self.message = format!("Errors: {}", e.code());
            return;
        }

        let req = MoveRequest {
            fen: self.position.fen().to_string(),
            side: self.position.side_to_move(),
            client_move: Some(uci.clone()),
        };
        self.message.clear();
        self.in_flight = Some(InFlight::Move {
            uci,
            slot: dispatch(req),
        });
    }

    /// Ask the server for a fresh game. Ignored while a request is in flight.
    pub fn start_new_game<F>(&mut self, dispatch: F)
    where
        F: FnOnce() -> Pending<NewGameResponse>,
    {
        if self.is_waiting() {
            return;
        }
        self.in_flight = Some(InFlight::NewGame(dispatch()));
    }

    /// Apply the in-flight result if it has arrived. Called once per frame.
    pub fn poll(&mut self) {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return;
        };

        match in_flight {
            InFlight::Move { uci, slot } => {
                let Some(result) = slot.try_take() else {
                    return;
                };
                let uci = std::mem::take(uci);
                self.in_flight = None;
                match result {
                    Ok(resp) => self.apply_response(&uci, resp),
                    Err(e) => self.report_failure(e),
                }
            }
            InFlight::NewGame(slot) => {
                let Some(result) = slot.try_take() else {
                    return;
                };
                self.in_flight = None;
                match result {
                    Ok(game) => self.reset(game),
                    Err(e) => self.report_failure(e),
                }
            }
        }
    }

    /// From/to squares as UCI, promoting pawns to a queen on the last rank.
    fn build_move(&self, from: Square, to: Square) -> Option<String> {
        let mut uci = coords_to_move(from, to)?;
        let last_row = match self.position.side_to_move() {
            Side::White => 0,
            Side::Black => 7,
        };
        let is_pawn = self
            .position
            .piece_at(from.0, from.1)
            .is_some_and(|p| p.eq_ignore_ascii_case(&'p'));
        if is_pawn && to.0 == last_row {
            uci.push('q');
        }
        Some(uci)
    }

    fn apply_response(&mut self, client_move: &str, resp: MoveResponse) {
        match Position::parse(&resp.new_fen) {
            Ok(position) => self.position = position,
            Err(e) => warn!(error = %e, "Server returned an unusable FEN"),
        }

        if let Some(ai_move) = resp.ai_move.as_deref() {
            self.last_move = move_to_coords(ai_move);
        } else if resp.applied_client_move {
            self.last_move = move_to_coords(client_move);
        }

        let flags = resp.flags.active();
        let errors: Vec<&str> = resp.errors.iter().map(|e| e.as_str()).collect();
        if !flags.is_empty() {
            info!(?flags, "Server flags");
        }
        if !errors.is_empty() {
            warn!(?errors, "Server errors");
        }

        let mut parts = Vec::new();
        if !flags.is_empty() {
            parts.push(format!("Flags: {}", flags.join(", ")));
        }
        if !errors.is_empty() {
            parts.push(format!("Errors: {}", errors.join(", ")));
        }
        if resp.game_over {
            parts.push("Game over".to_string());
        }
        self.message = parts.join(" | ");
    }

    fn reset(&mut self, game: NewGameResponse) {
        match Position::parse(&game.fen) {
            Ok(position) => {
                self.position = position;
                self.selected = None;
                self.last_move = None;
                self.message.clear();
            }
            Err(e) => {
                warn!(error = %e, "Server returned an unusable starting FEN");
                self.message = format!("Request failed: {e}");
            }
        }
    }

    fn report_failure(&mut self, e: impl std::fmt::Display) {
        self.message = format!("Request failed: {e}");
    }
}
