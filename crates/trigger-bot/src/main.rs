//! Trigger-response bot - Main entry point.

use anyhow::Context;
use responses_store::{ResponseBackend, ResponsesManager, Store};
use signal_client::{MessageReceiver, SignalClient, SignalError};
use std::sync::Arc;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trigger_bot::config::Config;
use trigger_bot::dispatch::Dispatcher;
use trigger_bot::error::AppResult;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting trigger-response bot...");

    // Storage must be reachable before any message is accepted
    let target = config.storage.store_target();
    let store = match Store::connect(&target, config.storage.database.as_deref()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to response store {:?}: {}", target, e);
            return Err(e.into());
        }
    };
    info!("Response store ready ({})", store.kind());

    let backend: Arc<dyn ResponseBackend> = Arc::new(store.clone());
    let manager = ResponsesManager::new(backend);

    let signal_client = SignalClient::new(&config.signal.service_url, &config.signal.phone_number)?;

    if !signal_client.health_check().await {
        error!("Signal API not reachable at {}", config.signal.service_url);
        store.close().await;
        return Err(SignalError::Api(format!(
            "not reachable at {}",
            config.signal.service_url
        ))
        .into());
    }
    info!("Signal API healthy");

    let dispatcher = Arc::new(Dispatcher::new(manager, &config.bot));
    let mut reload = ReloadSignal::new().context("Failed to install reload signal handler")?;

    info!(
        "Listening for messages (prefix={}, match_mode={})",
        config.bot.prefix, config.bot.match_mode
    );

    // Start message receiver
    let receiver = MessageReceiver::new(signal_client.clone(), config.signal.poll_interval);
    let mut stream = Box::pin(receiver.stream());

    // Main message loop
    loop {
        tokio::select! {
            Some(message) = stream.next() => {
                let dispatcher = dispatcher.clone();
                let signal_client = signal_client.clone();

                tokio::spawn(async move {
                    if let Some(reply) = dispatcher.handle(&message).await {
                        if let Err(e) = signal_client.reply(&message, &reply).await {
                            error!("Failed to send reply: {}", e);
                        }
                    }
                });
            }
            _ = reload.recv() => {
                let count = dispatcher.reload_commands().await;
                info!("Reloaded {} commands", count);
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    store.close().await;
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// SIGHUP asks for a command reload.
#[cfg(unix)]
struct ReloadSignal(signal::unix::Signal);

#[cfg(unix)]
impl ReloadSignal {
    fn new() -> std::io::Result<Self> {
        signal::unix::signal(signal::unix::SignalKind::hangup()).map(Self)
    }

    async fn recv(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
struct ReloadSignal;

#[cfg(not(unix))]
impl ReloadSignal {
    fn new() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}
