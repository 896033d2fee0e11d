use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, Extension, Json};
use chess_core::{ErrorCode, MoveRequest, MoveResponse, NewGameResponse, Position, Status};
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::selector::{random, MoveSelector, Selection};

/// POST /new
pub async fn new_game() -> Json<NewGameResponse> {
    Json(NewGameResponse::default())
}

/// POST /move
pub async fn make_move(
    Extension(selector): Extension<Arc<dyn MoveSelector>>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, AppError> {
    let Json(req) = payload?;
    let response = process_move(selector.as_ref(), &req).await;

    info!(
        fen = %req.fen,
        side = %req.side,
        client_move = ?req.client_move(),
        ai_move = ?response.ai_move,
        errors = ?response.errors,
        "Processed move"
    );
    Ok(Json(response))
}

/// Run one turn. Every branch yields a complete response; nothing is kept
/// between calls.
pub async fn process_move(selector: &dyn MoveSelector, req: &MoveRequest) -> MoveResponse {
    let position = match Position::parse(&req.fen) {
        Ok(position) => position,
        Err(e) => {
            debug!(error = %e, "Rejected FEN");
            return MoveResponse::rejected(req.fen.clone(), Position::start().flags(), e.code());
        }
    };

    if position.side_to_move() != req.side {
        return MoveResponse::rejected(
            position.fen(),
            position.flags(),
            ErrorCode::SideToMoveMismatch,
        );
    }

    let (position, applied_client_move) = match req.client_move() {
        Some(client_move) => match position.apply(client_move) {
            Ok(next) => (next, true),
            Err(e) => {
                debug!(error = %e, "Rejected client move");
                return MoveResponse::rejected(position.fen(), position.flags(), e.code());
            }
        },
        None => (position, false),
    };

    if applied_client_move && position.is_terminal() {
        return MoveResponse::finished(&position, true);
    }
    if position.legal_moves().is_empty() {
        return MoveResponse::finished(&position, applied_client_move);
    }

    let selection = match selector.choose(&position).await {
        Ok(selection) => Some(selection),
        Err(e) => {
            error!(selector = selector.name(), error = %e, "Move selection failed");
            None
        }
    };

    let chosen = selection.and_then(|selection| match position.apply(&selection.uci) {
        Ok(next) => Some((selection, next)),
        Err(e) => {
            warn!(selector = selector.name(), error = %e, "Selector returned an unplayable move");
            None
        }
    });

    let (selection, next) = match chosen {
        Some(chosen) => chosen,
        None => match random_reply(&position) {
            Some(fallback) => fallback,
            None => return server_error(&position, applied_client_move),
        },
    };

    let errors = if selection.fallback_used {
        vec![ErrorCode::GptInvalidMove]
    } else {
        Vec::new()
    };

    MoveResponse {
        status: if errors.is_empty() { Status::Ok } else { Status::Error },
        applied_client_move,
        ai_move: Some(selection.uci),
        new_fen: next.fen().to_string(),
        flags: next.flags(),
        errors,
        game_over: next.is_terminal(),
    }
}

/// Random legal reply, marked as a fallback.
fn random_reply(position: &Position) -> Option<(Selection, Position)> {
    let uci = random::pick(&position.legal_moves())?;
    let next = position.apply(&uci).ok()?;
    Some((Selection::fallback(uci), next))
}

fn server_error(position: &Position, applied_client_move: bool) -> MoveResponse {
    MoveResponse {
        status: Status::Error,
        applied_client_move,
        ai_move: None,
        new_fen: position.fen().to_string(),
        flags: position.flags(),
        errors: vec![ErrorCode::ServerError],
        game_over: false,
    }
}
