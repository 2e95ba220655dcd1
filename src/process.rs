use std::{io, process::Stdio};

use async_trait::async_trait;
use tokio::{
    io::AsyncWriteExt,
    process::{Child, ChildStdin, Command},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::config::{Mode, RemoteConfig};

/// Spawns the external transport process for one forwarding spec.
///
/// The engine only talks to the transport through this seam, so tests can
/// substitute something that does not need an ssh binary or a reachable
/// remote.
#[async_trait]
pub trait Launcher: Send + Sync + 'static {
    async fn launch(&self, spec: &str) -> io::Result<TunnelProcess>;
}

/// Launches `ssh` with keepalives enabled, host-key verification skipped,
/// and the task's raw spec as the forwarding instruction.
#[derive(Debug, Clone)]
pub struct SshLauncher {
    mode: Mode,
    user: String,
    host: String,
    port: u16,
}

impl SshLauncher {
    pub fn new(mode: Mode, remote: &RemoteConfig) -> Self {
        Self {
            mode,
            user: remote.user.clone(),
            host: remote.host.clone(),
            port: remote.port,
        }
    }

    fn command(&self, spec: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-o")
            .arg("ServerAliveInterval=60")
            .arg("-o")
            .arg("StrictHostKeyChecking=no")
            .arg(format!("-{}", self.mode.flag()))
            .arg(spec)
            .arg(format!("{}@{}", self.user, self.host))
            .arg("-p")
            .arg(self.port.to_string());
        cmd
    }
}

#[async_trait]
impl Launcher for SshLauncher {
    async fn launch(&self, spec: &str) -> io::Result<TunnelProcess> {
        TunnelProcess::spawn(self.command(spec)).await
    }
}

/// A spawned tunnel child.
///
/// Keeps the child's stdin for interactive probing and runs one drain task
/// per output stream so the child can never stall on a full pipe. Drain
/// tasks never touch supervisor state; each owns its stream and exits on
/// EOF or read error, so one may harmlessly outlive a restart of its task.
#[derive(Debug)]
pub struct TunnelProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    drains: Vec<JoinHandle<()>>,
}

impl TunnelProcess {
    /// Spawns `cmd` with all three stdio streams piped and starts draining
    /// stdout and stderr.
    pub async fn spawn(mut cmd: Command) -> io::Result<Self> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;
        let stdin = child.stdin.take();
        let mut drains = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            drains.push(tokio::spawn(drain(stdout)));
        }
        if let Some(stderr) = child.stderr.take() {
            drains.push(tokio::spawn(drain(stderr)));
        }

        Ok(Self {
            child,
            stdin,
            drains,
        })
    }

    /// Writes a harmless command line to the child's stdin. An error means
    /// the process has exited or closed its pipe.
    pub(crate) async fn poke(&mut self) -> io::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdin already closed"))?;
        stdin.write_all(b"pwd\n").await?;
        stdin.flush().await
    }

    /// Best-effort teardown: close stdin, kill, reap, join the drains.
    ///
    /// Every failure is logged and swallowed; calling this on an
    /// already-dead process is safe.
    pub(crate) async fn terminate(mut self, reason: &str) {
        info!(spec = %reason, "terminating tunnel process");

        drop(self.stdin.take());
        if let Err(err) = self.child.kill().await {
            warn!(spec = %reason, error = %err, "failed to kill tunnel process");
        }
        match self.child.wait().await {
            Ok(status) => debug!(spec = %reason, %status, "tunnel process reaped"),
            Err(err) => warn!(spec = %reason, error = %err, "failed to reap tunnel process"),
        }
        for drain in self.drains.drain(..) {
            let _ = drain.await;
        }
    }
}

/// Reads and discards until EOF or a read error.
async fn drain(mut stream: impl tokio::io::AsyncRead + Unpin + Send + 'static) {
    let _ = tokio::io::copy(&mut stream, &mut tokio::io::sink()).await;
}
