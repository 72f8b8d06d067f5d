//! Ping command - reports message delivery and store latency.

use crate::commands::{titled, CommandHandler};
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use responses_store::ResponsesManager;
use signal_client::BotMessage;
use std::time::Instant;

pub struct PingHandler {
    manager: ResponsesManager,
}

impl PingHandler {
    pub fn new(manager: ResponsesManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl CommandHandler for PingHandler {
    fn name(&self) -> &str {
        "ping"
    }

    fn aliases(&self) -> &[&str] {
        &["pong"]
    }

    fn description(&self) -> &str {
        "Check bot latency and storage round-trip."
    }

    async fn execute(&self, message: &BotMessage, _args: &[String]) -> AppResult<String> {
        // Sender clocks can run ahead of ours.
        let delivery_ms = (Utc::now().timestamp_millis() - message.timestamp).max(0);

        let started = Instant::now();
        let healthy = self.manager.health_check().await;
        let store_ms = started.elapsed().as_millis();

        let store_line = if healthy {
            format!("Store round-trip: {} ms", store_ms)
        } else {
            format!("Store round-trip: unreachable after {} ms", store_ms)
        };

        Ok(titled(
            "Pong!",
            &[
                format!("Message latency: {} ms", delivery_ms),
                store_line,
                format!("Requested by {}", message.author()),
            ],
        ))
    }
}
