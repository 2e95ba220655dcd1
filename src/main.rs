use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tunnelguard::{Config, SupervisorBuilder};

/// Keeps ssh port-forwarding tunnels alive.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON config file.
    #[arg(short = 'c', long = "config")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let supervisor = SupervisorBuilder::new(config).build()?;
    let handle = supervisor.run();

    // Console: any entered line forces a verbose check, ^D or ^C exits.
    info!("press enter to check now, ^D to exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(_)) => handle.check_now(true).await,
                Ok(None) | Err(_) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
    handle.wait().await?;
    Ok(())
}
