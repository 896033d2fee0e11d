//! Shared chess types for the MiniGPTChess server and client.
//!
//! Rules are delegated to `shakmaty`; this crate only wraps them in the
//! shapes the wire protocol needs.

pub mod error;
pub mod position;
pub mod protocol;
pub mod uci;

pub use error::CoreError;
pub use position::{Flags, Position, Side, STARTING_FEN};
pub use protocol::{ErrorCode, HealthResponse, MoveRequest, MoveResponse, NewGameResponse, Status};
