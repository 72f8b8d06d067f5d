//! Signal HTTP client.

use crate::error::SignalError;
use crate::types::*;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// signal-cli REST API client bound to one bot account.
#[derive(Clone)]
pub struct SignalClient {
    http: Client,
    base_url: String,
    account: String,
    /// `/v1/receive/<number>` with the number percent-encoded (`+` is `%2B`).
    receive_url: String,
}

impl SignalClient {
    pub fn new(
        base_url: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Result<Self, SignalError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let account = phone_number.into();
        let receive_url = format!("{}/v1/receive/{}", base_url, urlencoding::encode(&account));

        Ok(Self {
            http,
            base_url,
            account,
            receive_url,
        })
    }

    /// The bot account's number.
    pub fn phone_number(&self) -> &str {
        &self.account
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health_check(&self) -> bool {
        match self.http.get(self.endpoint("/v1/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Signal health check failed: {}", e);
                false
            }
        }
    }

    /// Fetch pending envelopes for the bot account.
    #[instrument(skip(self))]
    pub async fn receive(&self) -> Result<Vec<IncomingMessage>, SignalError> {
        let response = self.http.get(&self.receive_url).send().await?;
        let response = error_body(response).await.map_err(SignalError::Api)?;

        let envelopes: Vec<IncomingMessage> = response.json().await?;
        if !envelopes.is_empty() {
            debug!("Received {} envelopes", envelopes.len());
        }
        Ok(envelopes)
    }

    /// Send text to a number or a `group.<id>` recipient.
    #[instrument(skip(self, message))]
    pub async fn send(&self, recipient: &str, message: &str) -> Result<(), SignalError> {
        let request = SendMessageRequest {
            message: message.to_string(),
            number: self.account.clone(),
            recipients: vec![recipient.to_string()],
        };

        let response = self
            .http
            .post(self.endpoint("/v2/send"))
            .json(&request)
            .send()
            .await?;

        error_body(response).await.map_err(|body| {
            warn!("Send to {} failed: {}", recipient, body);
            SignalError::SendFailed(body)
        })?;

        debug!("Sent message to {}", recipient);
        Ok(())
    }

    /// Reply where `original` was posted.
    pub async fn reply(&self, original: &BotMessage, message: &str) -> Result<(), SignalError> {
        self.send(&original.reply_recipient(), message).await
    }
}

/// Pass successful responses through; otherwise yield the error body.
async fn error_body(response: Response) -> Result<Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(if body.is_empty() {
        status.to_string()
    } else {
        body
    })
}
