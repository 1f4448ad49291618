// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rsb-executor: runs command batches on behalf of remote bridges.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rsb_executor::{env, startup, Config};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rsb-executor", version, about = "Remote shell executor")]
struct Args {
    /// Bind host [env: RSB_LISTEN_HOST, default: 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Bind port [env: RSB_LISTEN_PORT, default: 8765]
    #[arg(long)]
    port: Option<u16>,

    /// Seconds an idle client connection is kept open [env: RSB_IDLE_TIMEOUT_SECS, default: 300]
    #[arg(long, value_name = "SECONDS")]
    client_idle_timeout: Option<f64>,

    /// Interpreter tried before pwsh and powershell.exe [env: RSB_SHELL]
    #[arg(long, value_name = "EXE")]
    shell: Option<String>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = Config::from_env();
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(secs) = self.client_idle_timeout {
            config.idle_timeout = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid --client-idle-timeout {secs}"))?;
        }
        if let Some(shell) = self.shell {
            config.shell_override = Some(shell);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    let config = args.into_config()?;
    let listener = startup(&config).await.context("executor startup failed")?;
    info!(addr = %listener.local_addr()?, "listening for bridge connections");

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            on_signal.cancel();
        }
    });

    listener.run_until(shutdown).await;
    Ok(())
}
