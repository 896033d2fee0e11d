//! JSON wire types shared by the server and the client.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::{Flags, Position, Side, STARTING_FEN};

/// Closed set of codes a move response can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidFen,
    IllegalClientMove,
    SideToMoveMismatch,
    /// Informational: the game is over, no reply was played.
    NoLegalMoves,
    /// The reply backend failed and a random legal move was played instead.
    GptInvalidMove,
    ServerError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidFen => "invalid_fen",
            ErrorCode::IllegalClientMove => "illegal_client_move",
            ErrorCode::SideToMoveMismatch => "side_to_move_mismatch",
            ErrorCode::NoLegalMoves => "no_legal_moves",
            ErrorCode::GptInvalidMove => "gpt_invalid_move",
            ErrorCode::ServerError => "server_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Body of `POST /move`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub fen: String,
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_move: Option<String>,
}

impl MoveRequest {
    /// Client move, treating an empty string as absent.
    pub fn client_move(&self) -> Option<&str> {
        self.client_move
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Response of `POST /move`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub status: Status,
    pub applied_client_move: bool,
    pub ai_move: Option<String>,
    pub new_fen: String,
    pub flags: Flags,
    pub errors: Vec<ErrorCode>,
    /// Unambiguous end-of-game signal, independent of `errors`.
    #[serde(default)]
    pub game_over: bool,
}

impl MoveResponse {
    /// Rejected turn: nothing was played, the given position is echoed back.
    pub fn rejected(fen: impl Into<String>, flags: Flags, code: ErrorCode) -> Self {
        Self {
            status: Status::Error,
            applied_client_move: false,
            ai_move: None,
            new_fen: fen.into(),
            flags,
            errors: vec![code],
            game_over: false,
        }
    }

    /// The game ended before a reply could be played.
    pub fn finished(position: &Position, applied_client_move: bool) -> Self {
        Self {
            status: Status::Ok,
            applied_client_move,
            ai_move: None,
            new_fen: position.fen().to_string(),
            flags: position.flags(),
            errors: vec![ErrorCode::NoLegalMoves],
            game_over: true,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Response of `POST /new`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameResponse {
    pub fen: String,
    pub side: Side,
}

impl Default for NewGameResponse {
    fn default() -> Self {
        Self {
            fen: STARTING_FEN.to_string(),
            side: Side::White,
        }
    }
}

/// Response of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
