pub(crate) mod builder;
pub(crate) mod handle;

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{probe::probe, process::Launcher, supervisor::handle::SupervisorHandle, task::TunnelTask};

/// State shared between the periodic loop and the control surface.
///
/// The task table is the only shared mutable state in the engine. Its mutex
/// is held for the full duration of a tick and for shutdown, so task fields
/// read together always come from the same pass. Ticks are infrequent and
/// short relative to their cadence, so a single coarse lock is enough.
pub(crate) struct Shared {
    pub(crate) tasks: Mutex<Vec<TunnelTask>>,
    pub(crate) launcher: Arc<dyn Launcher>,
    pub(crate) connect_timeout: Duration,
    pub(crate) closed: CancellationToken,
}

impl Shared {
    /// One full pass: probe every task in order and replace the process of
    /// any task found down.
    pub(crate) async fn tick(&self, verbose: bool) {
        let mut tasks = self.tasks.lock().await;
        // A shutdown that won the lock first has already torn everything
        // down; spawning now would leak processes.
        if self.closed.is_cancelled() {
            return;
        }

        for task in tasks.iter_mut() {
            probe(task, self.connect_timeout, verbose).await;
            if task.down {
                if let Some(process) = task.process.take() {
                    process.terminate(&task.spec).await;
                }
                match self.launcher.launch(&task.spec).await {
                    Ok(process) => task.process = Some(process),
                    Err(err) => {
                        // Task stays down; the next tick retries.
                        warn!(spec = %task.spec, error = %err, "failed to launch tunnel");
                    }
                }
            }
        }
    }

    /// Terminates every task's process. Idempotent.
    pub(crate) async fn terminate_all(&self) {
        let mut tasks = self.tasks.lock().await;
        for task in tasks.iter_mut() {
            if let Some(process) = task.process.take() {
                process.terminate(&task.spec).await;
            }
        }
    }

    pub(crate) async fn dump(&self) -> String {
        let tasks = self.tasks.lock().await;
        tasks
            .iter()
            .map(|task| format!("{} (down: {})", task.spec, task.down))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The tunnel watchdog engine.
///
/// Probes every task on a fixed cadence and restarts downed tunnels. Built
/// by [`builder::SupervisorBuilder`]; controlled while running through the
/// [`SupervisorHandle`] returned from [`Supervisor::run`].
pub struct Supervisor {
    pub(crate) shared: Arc<Shared>,
    pub(crate) tick_interval: Duration,
}

impl Supervisor {
    /// Starts the periodic loop, consuming the supervisor and returning a
    /// handle for external control.
    pub fn run(self) -> SupervisorHandle {
        let shared = Arc::clone(&self.shared);
        let tick_interval = self.tick_interval;
        let join_handle = tokio::spawn(async move {
            Self::run_loop(shared, tick_interval).await;
        });
        SupervisorHandle::new(self.shared, join_handle)
    }

    async fn run_loop(shared: Arc<Shared>, tick_interval: Duration) {
        let tasks = shared.dump().await;
        info!(tasks = %tasks, "supervisor started");
        loop {
            if shared.closed.is_cancelled() {
                break;
            }
            shared.tick(false).await;
            // The pause starts after a completed pass, so a slow pass
            // self-throttles instead of piling up.
            tokio::select! {
                _ = shared.closed.cancelled() => break,
                _ = tokio::time::sleep(tick_interval) => {}
            }
        }
        info!("supervisor loop stopped");
    }
}
