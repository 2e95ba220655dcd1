use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::process::Command;
use tunnelguard::{Config, Launcher, Mode, RemoteConfig, TunnelProcess};

/// Launches a stand-in program instead of ssh and counts spawns.
///
/// `cat` stays alive holding its stdin open; `true` exits immediately,
/// which makes the interactive probe fail on the next pass.
pub struct FakeLauncher {
    program: &'static str,
    spawns: Arc<AtomicUsize>,
}

impl FakeLauncher {
    #[allow(unused)]
    pub fn new(program: &'static str) -> (Arc<Self>, Arc<AtomicUsize>) {
        let spawns = Arc::new(AtomicUsize::new(0));
        (
            Arc::new(Self {
                program,
                spawns: spawns.clone(),
            }),
            spawns,
        )
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch(&self, _spec: &str) -> std::io::Result<TunnelProcess> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        TunnelProcess::spawn(Command::new(self.program)).await
    }
}

/// Never manages to spawn anything.
pub struct FailingLauncher;

#[async_trait]
impl Launcher for FailingLauncher {
    async fn launch(&self, _spec: &str) -> std::io::Result<TunnelProcess> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no transport available",
        ))
    }
}

/// Grabs a loopback port that currently has no listener.
#[allow(unused)]
pub async fn free_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[allow(unused)]
pub fn test_config(mode: Mode, specs: &[&str]) -> Config {
    Config {
        mode,
        timeout_secs: 1,
        remote: RemoteConfig {
            host: "gateway".into(),
            user: "deploy".into(),
            port: 22,
        },
        forwarding_list: specs.iter().map(|s| s.to_string()).collect(),
    }
}
