//! Polling message receiver.

use crate::client::SignalClient;
use crate::types::BotMessage;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Pause after a failed receive before polling again.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Turns `/v1/receive` polling into a stream of text messages.
pub struct MessageReceiver {
    client: SignalClient,
    poll_interval: Duration,
}

impl MessageReceiver {
    pub fn new(client: SignalClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    /// Poll forever, yielding every text message received.
    pub fn stream(self) -> impl Stream<Item = BotMessage> {
        async_stream::stream! {
            loop {
                let pause = match self.client.receive().await {
                    Ok(envelopes) => {
                        for message in envelopes.iter().filter_map(BotMessage::from_incoming) {
                            debug!("Received {:?} from {}", message.preview(), message.source);
                            yield message;
                        }
                        self.poll_interval
                    }
                    Err(e) => {
                        error!("Receive error, retrying in {:?}: {}", ERROR_BACKOFF, e);
                        ERROR_BACKOFF
                    }
                };

                sleep(pause).await;
            }
        }
    }
}
