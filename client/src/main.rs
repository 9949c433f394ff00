use crate::config::Config;
use anyhow::Context;
use clap::Parser;

mod client;
mod config;
mod console;
mod events;
mod record;
mod session;
mod ws;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "client.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")?;

    ws::run(config).await
}
