//! Move selection strategies for the automated opponent.

pub mod llm;
pub mod random;

use std::sync::Arc;

use async_trait::async_trait;
use chess_core::Position;
use tracing::info;

use crate::clients::openai::OpenAiClient;
use crate::clients::GenerationError;
use crate::config::{Config, SelectorKind};

pub use llm::LlmSelector;
pub use random::RandomSelector;

#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("Position has no legal moves")]
    NoLegalMoves,
}

/// A chosen reply. `fallback_used` marks a degraded pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub uci: String,
    pub fallback_used: bool,
}

impl Selection {
    pub fn chosen(uci: impl Into<String>) -> Self {
        Self {
            uci: uci.into(),
            fallback_used: false,
        }
    }

    pub fn fallback(uci: impl Into<String>) -> Self {
        Self {
            uci: uci.into(),
            fallback_used: true,
        }
    }
}

/// Picks one legal move of a position. Callers check for an empty move set
/// first; implementations still report it as `NoLegalMoves`.
#[async_trait]
pub trait MoveSelector: Send + Sync {
    fn name(&self) -> &'static str;

    async fn choose(&self, position: &Position) -> Result<Selection, SelectorError>;
}

/// Build the selector the deployment is configured for.
pub fn build_selector(config: &Config) -> Result<Arc<dyn MoveSelector>, GenerationError> {
    match (config.selector, config.openai_api_key.as_deref()) {
        (SelectorKind::Llm, Some(api_key)) => {
            let client = OpenAiClient::new(
                api_key,
                &config.openai_model,
                &config.openai_base_url,
                config.llm_timeout,
            )?;
            info!(
                model = client.model(),
                max_attempts = config.llm_max_attempts,
                "Language-model move selector configured"
            );
            Ok(Arc::new(LlmSelector::new(
                Arc::new(client),
                config.llm_max_attempts,
            )))
        }
        (SelectorKind::Llm, None) => {
            info!("OPENAI_API_KEY not set - using random move selector");
            Ok(Arc::new(RandomSelector))
        }
        (SelectorKind::Random, _) => Ok(Arc::new(RandomSelector)),
    }
}
