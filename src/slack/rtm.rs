//! RTM WebSocket session.

use std::time::Duration;

use async_trait::async_trait;
use futures::{FutureExt, SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::{net::TcpStream, time::Instant};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use crate::backend::{ChatSession, Connector, Event};
use crate::error::{BotError, Result};

use super::api::SlackApi;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens RTM sessions with a single bot token.
#[derive(Debug, Clone)]
pub struct SlackConnector {
    api_url: Url,
    token: String,
}

impl SlackConnector {
    #[must_use]
    pub fn new(api_url: Url, token: String) -> Self {
        Self { api_url, token }
    }
}

#[async_trait]
impl Connector for SlackConnector {
    type Session = SlackSession;

    async fn connect(&self) -> Result<SlackSession> {
        let api = SlackApi::new(self.api_url.clone(), self.token.clone());
        let rtm = api.rtm_connect().await?;
        debug!(
            "rtm.connect succeeded for {} ({})",
            rtm.bot.name.as_deref().unwrap_or("unnamed bot"),
            rtm.bot.id
        );

        let (socket, _) = connect_async(rtm.url.as_str()).await?;
        info!("RTM WebSocket connected");

        Ok(SlackSession { api, socket })
    }
}

pub struct SlackSession {
    api: SlackApi,
    socket: Socket,
}

impl SlackSession {
    /// Handle one frame, returning an event if it carried one.
    async fn handle_frame(&mut self, frame: Message) -> Result<Option<Event>> {
        match frame {
            Message::Text(text) => parse_event(text.as_str()),
            Message::Ping(payload) => {
                self.socket.send(Message::Pong(payload)).await?;
                Ok(None)
            }
            Message::Close(reason) => {
                warn!("RTM connection closed by Slack: {reason:?}");
                Err(BotError::ConnectionClosed)
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ChatSession for SlackSession {
    async fn whoami(&mut self) -> Result<String> {
        self.api.auth_test().await
    }

    async fn read_events(&mut self, timeout: Duration) -> Result<Vec<Event>> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();

        // Wait for the first frame that carries an event, then drain what is already buffered.
        while events.is_empty() {
            let frame = match tokio::time::timeout_at(deadline, self.socket.next()).await {
                Err(_) => return Ok(events),
                Ok(None) => return Err(BotError::ConnectionClosed),
                Ok(Some(frame)) => frame?,
            };
            events.extend(self.handle_frame(frame).await?);
        }

        loop {
            let Some(next) = self.socket.next().now_or_never() else {
                break;
            };
            let frame = next.ok_or(BotError::ConnectionClosed)??;
            events.extend(self.handle_frame(frame).await?);
        }

        debug!("Read {} events", events.len());
        Ok(events)
    }

    async fn send_message(&mut self, channel: &str, text: &str) -> Result<()> {
        self.api.post_message(channel, text).await
    }

    async fn close(&mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}

/// Decode a text frame. Only `message` events are decoded; everything else is skipped.
fn parse_event(text: &str) -> Result<Option<Event>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    match value.get("type").and_then(serde_json::Value::as_str) {
        Some("message") => {}
        Some(kind) => {
            debug!("Ignoring {kind} event");
            return Ok(None);
        }
        None => {
            debug!("Ignoring untyped frame: {text}");
            return Ok(None);
        }
    }
    Ok(Some(serde_json::from_value(value)?))
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    use super::*;

    /// A session wired to an in-process WebSocket server; the server half is returned for scripting.
    async fn session_pair() -> (SlackSession, WebSocketStream<TcpStream>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let (client, server) = tokio::join!(connect_async(format!("ws://{addr}/")), async {
            let (stream, _) = listener.accept().await.expect("accept");
            accept_async(stream).await.expect("server handshake")
        });
        let (socket, _) = client.expect("client handshake");

        let api = SlackApi::new(
            Url::parse("http://127.0.0.1:9/api/").expect("valid url"),
            "xoxb-test".to_string(),
        );
        (SlackSession { api, socket }, server)
    }

    #[test]
    fn text_frame_becomes_event() {
        let event = parse_event(r#"{"type":"message","channel":"C1","text":"hi"}"#)
            .expect("valid frame")
            .expect("event");
        assert_eq!(event, Event::message("C1", "hi"));
    }

    #[test]
    fn events_with_object_fields_are_skipped() {
        let created = parse_event(
            r#"{"type":"channel_created","channel":{"id":"C1","name":"fun","created":1}}"#,
        );
        assert!(created.expect("not fatal").is_none());

        let changed = parse_event(
            r#"{"type":"user_change","user":{"id":"U1","name":"alice","profile":{}}}"#,
        );
        assert!(changed.expect("not fatal").is_none());
    }

    #[test]
    fn acks_and_non_object_frames_are_skipped() {
        assert!(parse_event(r#"{"ok":true,"reply_to":1,"ts":"1.2"}"#).expect("valid").is_none());
        assert!(parse_event("[1,2,3]").expect("valid json").is_none());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse_event("{nope"), Err(BotError::Json(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_read_returns_empty_after_timeout() {
        let (mut session, _server) = session_pair().await;

        let started = Instant::now();
        let events = session
            .read_events(Duration::from_secs(1))
            .await
            .expect("idle read");

        assert!(events.is_empty());
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn buffered_frames_come_back_in_one_batch() {
        let (mut session, mut server) = session_pair().await;

        server
            .feed(Message::text(r#"{"type":"message","channel":"C1","text":"one"}"#))
            .await
            .expect("feed");
        server
            .feed(Message::text(r#"{"type":"hello"}"#))
            .await
            .expect("feed");
        server
            .feed(Message::text(r#"{"type":"message","channel":"C2","text":"two"}"#))
            .await
            .expect("feed");
        server.flush().await.expect("flush");
        tokio::time::sleep(Duration::from_millis(50)).await;

        let events = session
            .read_events(Duration::from_secs(5))
            .await
            .expect("read");

        assert_eq!(
            events,
            vec![Event::message("C1", "one"), Event::message("C2", "two")]
        );
    }

    #[tokio::test]
    async fn ping_is_answered_and_yields_no_event() {
        let (mut session, mut server) = session_pair().await;

        server
            .send(Message::Ping(vec![7u8].into()))
            .await
            .expect("ping");

        let events = session
            .read_events(Duration::from_millis(200))
            .await
            .expect("read");
        assert!(events.is_empty());

        let reply = tokio::time::timeout(Duration::from_secs(5), server.next())
            .await
            .expect("reply in time")
            .expect("stream open")
            .expect("valid frame");
        assert!(matches!(reply, Message::Pong(_)));
    }

    #[tokio::test]
    async fn close_frame_ends_the_session() {
        let (mut session, mut server) = session_pair().await;

        server.send(Message::Close(None)).await.expect("close");

        assert!(matches!(
            session.read_events(Duration::from_secs(5)).await,
            Err(BotError::ConnectionClosed)
        ));
    }
}
