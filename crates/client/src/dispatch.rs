//! Runs server calls off the render thread. Each call hands back a
//! [`Pending`] slot that the UI loop polls once per frame.

use std::future::Future;
use std::sync::Arc;

use chess_core::{MoveRequest, MoveResponse, NewGameResponse};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::api::{ApiClient, DispatchError};

/// Result slot of one background request.
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T, DispatchError>>,
}

impl<T> Pending<T> {
    pub fn new(rx: oneshot::Receiver<Result<T, DispatchError>>) -> Self {
        Self { rx }
    }

    /// Non-blocking. `None` while the request is still in flight.
    pub fn try_take(&mut self) -> Option<Result<T, DispatchError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(DispatchError::Dropped)),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<ApiClient>,
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(api: Arc<ApiClient>, runtime: Handle) -> Self {
        Self { api, runtime }
    }

    pub fn submit_move(&self, req: MoveRequest) -> Pending<MoveResponse> {
        let api = self.api.clone();
        self.spawn(async move { api.submit_move(&req).await })
    }

    pub fn new_game(&self) -> Pending<NewGameResponse> {
        let api = self.api.clone();
        self.spawn(async move { api.new_game().await })
    }

    fn spawn<T, F>(&self, fut: F) -> Pending<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, DispatchError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let result = fut.await;
            if let Err(e) = &result {
                tracing::error!("Request failed: {e}");
            }
            // The receiver is gone if the window closed mid-request
            let _ = tx.send(result);
        });
        Pending::new(rx)
    }
}
