use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::supervisor::Shared;

#[derive(Debug, Error)]
pub enum SupervisorHandleError {
    #[error("supervisor loop panicked: {0}")]
    LoopPanicked(String),
}

/// Control surface for a running supervisor.
///
/// Every operation takes the same task-table lock as the periodic loop, so
/// a manual check never interleaves with a tick mid-task.
pub struct SupervisorHandle {
    shared: Arc<Shared>,
    join_handle: JoinHandle<()>,
}

impl SupervisorHandle {
    pub(crate) fn new(shared: Arc<Shared>, join_handle: JoinHandle<()>) -> Self {
        Self {
            shared,
            join_handle,
        }
    }

    /// Runs exactly one tick immediately, out of band of the loop's
    /// cadence. With `verbose` set, probe outcomes are logged.
    pub async fn check_now(&self, verbose: bool) {
        self.shared.tick(verbose).await;
    }

    /// Stops the loop after its current pass and terminates every task's
    /// process. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.shared.closed.cancel();
        self.shared.terminate_all().await;
    }

    /// A consistent snapshot of `(spec, down)` for every task, taken in
    /// one lock acquisition.
    pub async fn task_states(&self) -> Vec<(String, bool)> {
        let tasks = self.shared.tasks.lock().await;
        tasks
            .iter()
            .map(|task| (task.spec.clone(), task.down))
            .collect()
    }

    /// Waits for the supervisor loop to exit.
    pub async fn wait(self) -> Result<(), SupervisorHandleError> {
        self.join_handle
            .await
            .map_err(|err| SupervisorHandleError::LoopPanicked(err.to_string()))
    }
}
