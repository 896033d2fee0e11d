//! Desktop client for MiniGPTChess: renders the board, collects the player's
//! move and forwards it to the move server.

pub mod api;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod session;

pub use api::{ApiClient, DispatchError};
pub use config::ClientConfig;
pub use dispatch::{Dispatcher, Pending};
pub use session::{ClickButton, Session};
