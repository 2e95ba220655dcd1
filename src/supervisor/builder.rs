use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    config::{Config, ConfigError},
    process::{Launcher, SshLauncher},
    supervisor::{Shared, Supervisor},
    task::TunnelTask,
};

/// Builds a `Supervisor` from a parsed configuration.
///
/// The transport launcher and the tick cadence can be overridden, which is
/// how the tests drive the engine without an ssh binary.
pub struct SupervisorBuilder {
    config: Config,
    launcher: Option<Arc<dyn Launcher>>,
    tick_interval: Duration,
}

impl SupervisorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            launcher: None,
            tick_interval: Duration::from_secs(5),
        }
    }

    /// Substitutes the transport launcher (defaults to [`SshLauncher`]).
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Sets the pause between completed passes of the loop.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Parses every forwarding spec and assembles the engine.
    ///
    /// Fails on the first malformed spec: a supervisor never starts with a
    /// partial task list.
    pub fn build(self) -> Result<Supervisor, ConfigError> {
        let tasks = self
            .config
            .forwarding_list
            .iter()
            .map(|spec| TunnelTask::from_spec(spec, self.config.mode, &self.config.remote.host))
            .collect::<Result<Vec<_>, _>>()?;

        let launcher: Arc<dyn Launcher> = match self.launcher {
            Some(launcher) => launcher,
            None => Arc::new(SshLauncher::new(self.config.mode, &self.config.remote)),
        };

        Ok(Supervisor {
            shared: Arc::new(Shared {
                tasks: Mutex::new(tasks),
                launcher,
                connect_timeout: self.config.connect_timeout(),
                closed: CancellationToken::new(),
            }),
            tick_interval: self.tick_interval,
        })
    }
}
