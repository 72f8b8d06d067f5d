//! Signal REST API types.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

const PREVIEW_CHARS: usize = 50;

/// Envelope wrapper returned by `/v1/receive`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub envelope: Envelope,
    pub account: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub source: String,
    pub source_number: Option<String>,
    pub source_name: Option<String>,
    pub timestamp: i64,
    pub data_message: Option<DataMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMessage {
    pub message: Option<String>,
    pub timestamp: i64,
    pub group_info: Option<GroupInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub group_id: String,
}

/// Body of `POST /v2/send`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub number: String,
    pub recipients: Vec<String>,
}

/// A text message ready for dispatch.
#[derive(Debug, Clone)]
pub struct BotMessage {
    /// Sender's number or UUID.
    pub source: String,
    /// Sender's profile name, if shared.
    pub source_name: Option<String>,
    pub text: String,
    /// Sent time, ms since the Unix epoch.
    pub timestamp: i64,
    /// Internal group id when posted in a group.
    pub group_id: Option<String>,
    /// The bot account that received it.
    pub receiving_account: String,
}

impl BotMessage {
    /// Extract a text message from an envelope. Receipts, typing
    /// indicators and other non-text envelopes yield `None`.
    pub fn from_incoming(msg: &IncomingMessage) -> Option<Self> {
        let data = msg.envelope.data_message.as_ref()?;
        let text = data.message.clone()?;

        Some(Self {
            source: msg.envelope.source.clone(),
            source_name: msg.envelope.source_name.clone(),
            text,
            timestamp: msg.envelope.timestamp,
            group_id: data.group_info.as_ref().map(|g| g.group_id.clone()),
            receiving_account: msg.account.clone(),
        })
    }

    /// The guild this message belongs to. Signal groups are guilds;
    /// direct messages have none.
    pub fn guild_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }

    /// Whether the bot itself sent this message.
    pub fn is_from_self(&self) -> bool {
        self.source == self.receiving_account
    }

    /// Name to show for the sender.
    pub fn author(&self) -> &str {
        self.source_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.source)
    }

    /// First characters of the text, for logs.
    pub fn preview(&self) -> String {
        self.text.chars().take(PREVIEW_CHARS).collect()
    }

    /// Recipient for a reply: the group (as `group.<base64 id>`) or the sender.
    pub fn reply_recipient(&self) -> String {
        match &self.group_id {
            Some(group_id) => format!("group.{}", BASE64.encode(group_id)),
            None => self.source.clone(),
        }
    }
}
