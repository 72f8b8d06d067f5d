//! Signal CLI REST API client.

mod client;
mod error;
mod receiver;
mod types;

pub use client::SignalClient;
pub use error::SignalError;
pub use receiver::MessageReceiver;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_stream::StreamExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOT_NUMBER: &str = "+15555555555";

    fn create_test_client(mock_server: &MockServer) -> SignalClient {
        SignalClient::new(mock_server.uri(), BOT_NUMBER).unwrap()
    }

    fn incoming(text: Option<&str>, group_id: Option<&str>) -> IncomingMessage {
        IncomingMessage {
            envelope: Envelope {
                source: "+14155551234".into(),
                source_number: Some("+14155551234".into()),
                source_name: Some("Test User".into()),
                timestamp: 1677652288000,
                data_message: Some(DataMessage {
                    message: text.map(String::from),
                    timestamp: 1677652288000,
                    group_info: group_id.map(|id| GroupInfo {
                        group_id: id.into(),
                    }),
                }),
            },
            account: BOT_NUMBER.into(),
        }
    }

    #[tokio::test]
    async fn test_health_check_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        assert!(create_test_client(&mock_server).health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        assert!(!create_test_client(&mock_server).health_check().await);
    }

    #[tokio::test]
    async fn test_receive_group_message() {
        let mock_server = MockServer::start().await;

        let envelopes = serde_json::json!([
            {
                "envelope": {
                    "source": "+14155551234",
                    "sourceNumber": "+14155551234",
                    "sourceName": "Test User",
                    "timestamp": 1677652288000i64,
                    "dataMessage": {
                        "message": "hello",
                        "timestamp": 1677652288000i64,
                        "groupInfo": { "groupId": "abc123==" }
                    }
                },
                "account": BOT_NUMBER
            },
            {
                "envelope": {
                    "source": "+14155551234",
                    "timestamp": 1677652289000i64,
                    "receiptMessage": { "isRead": true }
                },
                "account": BOT_NUMBER
            }
        ]);

        // + is URL-encoded as %2B
        Mock::given(method("GET"))
            .and(path("/v1/receive/%2B15555555555"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&envelopes))
            .mount(&mock_server)
            .await;

        let received = create_test_client(&mock_server).receive().await.unwrap();
        assert_eq!(received.len(), 2);

        let messages: Vec<_> = received.iter().filter_map(BotMessage::from_incoming).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].guild_id(), Some("abc123=="));
        assert_eq!(messages[0].text, "hello");
    }

    #[tokio::test]
    async fn test_receive_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/receive/%2B15555555555"))
            .respond_with(ResponseTemplate::new(400).set_body_string("account not registered"))
            .mount(&mock_server)
            .await;

        let result = create_test_client(&mock_server).receive().await;
        assert!(matches!(result, Err(SignalError::Api(ref msg)) if msg.contains("not registered")));
    }

    #[tokio::test]
    async fn test_reply_to_group_addresses_group() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_json(serde_json::json!({
                "message": "Hi there!",
                "number": BOT_NUMBER,
                "recipients": ["group.YWJjMTIzPT0="]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let message = BotMessage::from_incoming(&incoming(Some("hello"), Some("abc123=="))).unwrap();
        create_test_client(&mock_server)
            .reply(&message, "Hi there!")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reply_to_direct_message_addresses_sender() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_json(serde_json::json!({
                "message": "pong",
                "number": BOT_NUMBER,
                "recipients": ["+14155551234"]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let message = BotMessage::from_incoming(&incoming(Some("!ping"), None)).unwrap();
        create_test_client(&mock_server)
            .reply(&message, "pong")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid recipient"))
            .mount(&mock_server)
            .await;

        let result = create_test_client(&mock_server)
            .send("+14155551234", "Hello!")
            .await;
        assert!(matches!(result, Err(SignalError::SendFailed(_))));
    }

    #[tokio::test]
    async fn test_receiver_stream_yields_text_messages() {
        let mock_server = MockServer::start().await;

        let envelopes = serde_json::json!([
            {
                "envelope": {
                    "source": "+14155551234",
                    "timestamp": 1i64,
                    "dataMessage": { "message": "first", "timestamp": 1i64 }
                },
                "account": BOT_NUMBER
            }
        ]);

        Mock::given(method("GET"))
            .and(path("/v1/receive/%2B15555555555"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&envelopes))
            .mount(&mock_server)
            .await;

        let receiver = MessageReceiver::new(
            create_test_client(&mock_server),
            Duration::from_millis(10),
        );
        let mut stream = Box::pin(receiver.stream());

        let message = stream.next().await.unwrap();
        assert_eq!(message.text, "first");
        assert!(!message.is_group());
    }

    #[test]
    fn test_bot_message_direct() {
        let msg = BotMessage::from_incoming(&incoming(Some("Hello bot!"), None)).unwrap();

        assert_eq!(msg.source, "+14155551234");
        assert_eq!(msg.author(), "Test User");
        assert!(msg.guild_id().is_none());
        assert_eq!(msg.reply_recipient(), "+14155551234");
        assert!(!msg.is_from_self());
    }

    #[test]
    fn test_bot_message_without_text_is_skipped() {
        assert!(BotMessage::from_incoming(&incoming(None, Some("g"))).is_none());

        let mut no_data = incoming(Some("x"), None);
        no_data.envelope.data_message = None;
        assert!(BotMessage::from_incoming(&no_data).is_none());
    }

    #[test]
    fn test_bot_message_from_self() {
        let mut own = incoming(Some("Hi there!"), Some("g"));
        own.envelope.source = BOT_NUMBER.into();

        let msg = BotMessage::from_incoming(&own).unwrap();
        assert!(msg.is_from_self());
    }

    #[test]
    fn test_author_falls_back_to_number() {
        let mut anon = incoming(Some("x"), None);
        anon.envelope.source_name = Some(String::new());

        let msg = BotMessage::from_incoming(&anon).unwrap();
        assert_eq!(msg.author(), "+14155551234");
    }

    #[test]
    fn test_preview_is_char_safe() {
        let long = "é".repeat(80);
        let msg = BotMessage::from_incoming(&incoming(Some(&long), None)).unwrap();

        assert_eq!(msg.preview().chars().count(), 50);
    }
}
