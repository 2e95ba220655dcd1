use crate::{
    config::{ConfigError, Mode},
    process::TunnelProcess,
};

/// Where a locally-bound forward is reachable from the supervisor.
pub const LOCAL_ADDR: &str = "127.0.0.1";

const WILDCARD_ADDR: &str = "0.0.0.0";

/// The `(address, port)` pair the supervisor connects to in order to infer
/// tunnel health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEndpoint {
    pub addr: String,
    pub port: u16,
}

/// One supervised tunnel.
///
/// Created from a forwarding spec at startup and kept until shutdown. A task
/// starts `down` with no process, which forces an initial spawn on the first
/// tick. `down` and `process` are only mutated while the supervisor's
/// task-table lock is held.
#[derive(Debug)]
pub struct TunnelTask {
    pub(crate) spec: String,
    pub(crate) check: Option<CheckEndpoint>,
    pub(crate) down: bool,
    pub(crate) process: Option<TunnelProcess>,
}

impl TunnelTask {
    /// Builds a task from a colon-delimited forwarding spec.
    ///
    /// A spec has either 3 fields (`port:host:hostport`) or 4
    /// (`bind:port:host:hostport`); anything else is rejected. The bind side
    /// decides whether a reachability endpoint can be derived:
    ///
    /// * 3 fields, local mode: the forward listens locally, so the endpoint
    ///   is `127.0.0.1:port`. In remote mode the bind lives on the far
    ///   side's loopback and cannot be reached from here.
    /// * 4 fields: the port is always the second field. Local mode probes
    ///   the bind address itself (`0.0.0.0` becomes `127.0.0.1`); remote
    ///   mode can only probe a wildcard bind, through the remote host.
    ///
    /// Tasks without an endpoint fall back to the interactive probe.
    pub fn from_spec(spec: &str, mode: Mode, remote_host: &str) -> Result<Self, ConfigError> {
        let fields: Vec<&str> = spec.split(':').collect();
        let check = match fields.as_slice() {
            [port, _host, _hostport] => match mode {
                Mode::Local => Some(CheckEndpoint {
                    addr: LOCAL_ADDR.to_string(),
                    port: parse_port(spec, port)?,
                }),
                Mode::Remote => None,
            },
            [bind, port, _host, _hostport] => match mode {
                Mode::Local => {
                    let addr = if *bind == WILDCARD_ADDR { LOCAL_ADDR } else { *bind };
                    Some(CheckEndpoint {
                        addr: addr.to_string(),
                        port: parse_port(spec, port)?,
                    })
                }
                Mode::Remote if *bind == WILDCARD_ADDR => Some(CheckEndpoint {
                    addr: remote_host.to_string(),
                    port: parse_port(spec, port)?,
                }),
                Mode::Remote => None,
            },
            _ => return Err(ConfigError::InvalidSpec(spec.to_string())),
        };

        Ok(Self {
            spec: spec.to_string(),
            check,
            down: true,
            process: None,
        })
    }

    /// The raw forwarding spec this task was built from.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// The derived reachability endpoint, if one exists.
    pub fn check_endpoint(&self) -> Option<&CheckEndpoint> {
        self.check.as_ref()
    }

    pub fn is_down(&self) -> bool {
        self.down
    }
}

// The original tool kept derived ports as strings and parsed them inside the
// probe; here a non-numeric port fails at startup like any malformed spec.
fn parse_port(spec: &str, raw: &str) -> Result<u16, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::InvalidSpec(spec.to_string()))
}
