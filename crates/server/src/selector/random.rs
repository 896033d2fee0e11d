use async_trait::async_trait;
use chess_core::Position;
use rand::prelude::IndexedRandom;

use super::{MoveSelector, Selection, SelectorError};

/// Uniform choice over the legal moves.
pub struct RandomSelector;

/// Uniformly pick one of `moves`.
pub fn pick(moves: &[String]) -> Option<String> {
    let mut rng = rand::rng();
    moves.choose(&mut rng).cloned()
}

#[async_trait]
impl MoveSelector for RandomSelector {
    fn name(&self) -> &'static str {
        "random"
    }

    async fn choose(&self, position: &Position) -> Result<Selection, SelectorError> {
        pick(&position.legal_moves())
            .map(Selection::chosen)
            .ok_or(SelectorError::NoLegalMoves)
    }
}
