// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rsb-bridge: JSON-RPC tool server on stdin/stdout that forwards shell
//! commands to a remote executor.

use clap::Parser;
use rsb_bridge::{env, Server, Session, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rsb-bridge", version, about = "Forward tool calls to a remote shell executor")]
struct Args {
    /// Executor host tried before discovered addresses [env: RSB_EXECUTOR_HOST]
    #[arg(long)]
    host: Option<String>,

    /// Executor port [env: RSB_EXECUTOR_PORT, default: 8765]
    #[arg(long)]
    port: Option<u16>,

    /// Only try --host (plus RSB_EXECUTOR_HOST); skip discovery and fallbacks
    #[arg(long)]
    no_discovery: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<SessionConfig> {
        let mut config = SessionConfig::from_env();
        if self.host.is_some() {
            config.override_host = self.host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.no_discovery {
            config.discover = false;
            config.fallback_hosts.clear();
            if config.override_host.is_none() {
                anyhow::bail!("--no-discovery needs --host or RSB_EXECUTOR_HOST");
            }
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries protocol traffic; logs go to stderr only.
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let config = args.into_config()?;
    info!(
        host = ?config.override_host,
        port = config.port,
        discover = config.discover,
        "bridge starting"
    );

    let mut server = Server::new(Session::new(config));
    server.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
    Ok(())
}
