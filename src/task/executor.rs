use crate::api::ConfigApi;
use crate::task::execution::{TaskCompletion, TaskRequest, execute_request};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Runs API calls on short-lived worker threads and hands their
/// completions back to the UI thread.
pub struct TaskExecutor {
    api: Arc<dyn ConfigApi>,
    completion_tx: Sender<TaskCompletion>,
    completion_rx: Receiver<TaskCompletion>,
}

impl TaskExecutor {
    pub fn new(api: Arc<dyn ConfigApi>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<TaskCompletion>();
        Self {
            api,
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn(&self, request: TaskRequest) {
        let api = Arc::clone(&self.api);
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let completion = execute_request(api.as_ref(), request);
            let _ = completion_tx.send(completion);
        });
    }

    /// Runs the request on the calling thread. Used by tests to keep
    /// completion order deterministic.
    pub fn run_inline(&self, request: TaskRequest) -> TaskCompletion {
        execute_request(self.api.as_ref(), request)
    }

    pub fn drain_ready(&self) -> Vec<TaskCompletion> {
        let mut out = Vec::<TaskCompletion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}
