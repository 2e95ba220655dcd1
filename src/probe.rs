use std::time::Duration;

use tokio::{net::TcpStream, time::timeout};
use tracing::{debug, info};

use crate::task::TunnelTask;

/// Re-evaluates `task.down`.
///
/// With a check endpoint this is a TCP connect bounded by
/// `connect_timeout`; without one it falls back to writing into the
/// child's stdin, which only detects that the local process has exited or
/// closed its pipes. Probe failures never propagate; they just mark the
/// task down.
pub(crate) async fn probe(task: &mut TunnelTask, connect_timeout: Duration, verbose: bool) {
    let Some(endpoint) = task.check.clone() else {
        interactive_probe(task).await;
        return;
    };

    let outcome = match timeout(
        connect_timeout,
        TcpStream::connect((endpoint.addr.as_str(), endpoint.port)),
    )
    .await
    {
        Ok(Ok(stream)) => {
            // Reachable; the connection itself is not wanted.
            drop(stream);
            task.down = false;
            "success".to_string()
        }
        Ok(Err(err)) => {
            task.down = true;
            err.to_string()
        }
        Err(_) => {
            task.down = true;
            "timed out".to_string()
        }
    };

    if verbose {
        info!(addr = %endpoint.addr, port = endpoint.port, outcome = %outcome, "connect probe");
    }
}

/// Weaker probe for tasks without a reachable endpoint. When no process
/// exists yet there is nothing to poke and `down` is left as-is; the tick's
/// spawn path takes it from there.
async fn interactive_probe(task: &mut TunnelTask) {
    let Some(process) = task.process.as_mut() else {
        return;
    };

    match process.poke().await {
        Ok(()) => {
            task.down = false;
            info!(spec = %task.spec, "interactive probe ok");
        }
        Err(err) => {
            task.down = true;
            debug!(spec = %task.spec, error = %err, "interactive probe failed");
        }
    }
}
