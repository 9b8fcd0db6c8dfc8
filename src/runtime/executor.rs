use crate::api::{self, ApiCompletion, ApiRequest, GeoApi};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Runs each request on its own thread; completions come back in whatever
/// order the server answers.
pub struct RequestExecutor {
    api: Arc<dyn GeoApi>,
    completion_tx: Sender<ApiCompletion>,
    completion_rx: Receiver<ApiCompletion>,
}

impl RequestExecutor {
    pub fn new(api: Arc<dyn GeoApi>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<ApiCompletion>();
        Self {
            api,
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn(&self, request: ApiRequest) {
        tracing::debug!(endpoint = request.endpoint(), "dispatching request");
        let api = Arc::clone(&self.api);
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let completion = api::execute(api.as_ref(), request);
            let _ = completion_tx.send(completion);
        });
    }

    pub fn drain_ready(&self) -> Vec<ApiCompletion> {
        let mut out = Vec::<ApiCompletion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Blocks until the next completion arrives.
    pub fn recv(&self) -> Option<ApiCompletion> {
        self.completion_rx.recv().ok()
    }
}
