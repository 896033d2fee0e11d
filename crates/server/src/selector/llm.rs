//! Language-model move selector with bounded retries and a random fallback.

use std::sync::Arc;

use async_trait::async_trait;
use chess_core::Position;
use tracing::{debug, warn};

use super::random;
use super::{MoveSelector, Selection, SelectorError};
use crate::clients::TextGenerator;

pub struct LlmSelector {
    generator: Arc<dyn TextGenerator>,
    max_attempts: u32,
}

impl LlmSelector {
    pub fn new(generator: Arc<dyn TextGenerator>, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }
}

pub fn build_prompt(fen: &str, legal_moves: &[String]) -> String {
    format!(
        "You are a chess engine. Given the FEN and a list of legal moves, \
         choose one move from the list and return only that move in UCI format.\n\
         FEN: {fen}\n\
         Legal moves: {}",
        legal_moves.join(", ")
    )
}

/// First non-blank line of a reply, trimmed.
fn candidate_move(reply: &str) -> &str {
    reply.trim().lines().next().unwrap_or_default().trim()
}

#[async_trait]
impl MoveSelector for LlmSelector {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn choose(&self, position: &Position) -> Result<Selection, SelectorError> {
        let legal_moves = position.legal_moves();
        if legal_moves.is_empty() {
            return Err(SelectorError::NoLegalMoves);
        }
        let prompt = build_prompt(position.fen(), &legal_moves);

        for attempt in 1..=self.max_attempts {
            match self.generator.generate(&prompt).await {
                Ok(reply) => {
                    let candidate = candidate_move(&reply);
                    if legal_moves.iter().any(|m| m == candidate) {
                        debug!(attempt, candidate, "Model chose a legal move");
                        return Ok(Selection::chosen(candidate));
                    }
                    warn!(attempt, candidate, "Model replied with a move outside the legal set");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Text generation failed");
                }
            }
        }

        warn!(
            attempts = self.max_attempts,
            fen = position.fen(),
            "No usable model reply, falling back to a random move"
        );
        random::pick(&legal_moves)
            .map(Selection::fallback)
            .ok_or(SelectorError::NoLegalMoves)
    }
}
