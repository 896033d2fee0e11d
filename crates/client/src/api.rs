//! HTTP client for the move server.

use chess_core::{HealthResponse, MoveRequest, MoveResponse, NewGameResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Request was dropped before it completed")]
    Dropped,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .user_agent("MiniGPTChess-Client/1.0")
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.server_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /new`
    pub async fn new_game(&self) -> Result<NewGameResponse, DispatchError> {
        let resp = self
            .client
            .post(format!("{}/new", self.base_url))
            .send()
            .await?;
        read_json(resp).await
    }

    /// `POST /move`
    pub async fn submit_move(&self, req: &MoveRequest) -> Result<MoveResponse, DispatchError> {
        info!(fen = %req.fen, client_move = ?req.client_move(), "Submitting move");
        let resp = self
            .client
            .post(format!("{}/move", self.base_url))
            .json(req)
            .send()
            .await?;
        let data: MoveResponse = read_json(resp).await?;
        debug!(?data, "Server response");
        Ok(data)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, DispatchError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, DispatchError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(DispatchError::Status { status, body });
    }
    Ok(resp.json().await?)
}
