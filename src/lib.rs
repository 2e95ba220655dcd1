//! # tunnelguard
//!
//! `tunnelguard` keeps ssh port-forwarding tunnels alive.
//! It probes each forward on a fixed cadence, and kills and relaunches the
//! ssh process behind any forward that stops answering.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use tunnelguard::{Config, SupervisorBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config: Config = serde_json::from_str(
//!         r#"{
//!             "mode": "local",
//!             "remote": { "host": "gateway", "user": "deploy" },
//!             "forwarding_list": ["9000:dbhost:5432"]
//!         }"#,
//!     )?;
//!
//!     let handle = SupervisorBuilder::new(config).build()?.run();
//!
//!     handle.check_now(true).await; // force a verbose pass
//!     handle.shutdown().await;
//!     handle.wait().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## What you get
//!
//! * **Liveness probing** – a timeout-bounded TCP connect to each forward's
//!   bind endpoint, with an interactive stdin probe for forwards that have
//!   no reachable endpoint.
//! * **Automatic restarts** – a downed tunnel's process is terminated and
//!   relaunched on the next pass.
//! * **Manual control** – `check_now` and `shutdown` through a
//!   [`SupervisorHandle`], sharing the loop's locking discipline.
//!
//! The transport command is pluggable through the [`Launcher`] trait; the
//! default is plain `ssh` with keepalives.

pub use config::{Config, ConfigError, Mode, RemoteConfig};
pub use process::{Launcher, SshLauncher, TunnelProcess};
pub use supervisor::{
    builder::SupervisorBuilder,
    handle::{SupervisorHandle, SupervisorHandleError},
    Supervisor,
};
pub use task::{CheckEndpoint, TunnelTask, LOCAL_ADDR};

mod config;
mod probe;
mod process;
mod supervisor;
mod task;
