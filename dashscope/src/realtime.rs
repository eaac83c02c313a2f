//! Realtime WebSocket API for Qwen TTS.

use std::sync::Arc;

use base64::Engine;
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        error::ProtocolError, handshake::client::generate_key, Error as WsError, Message,
    },
};
use tracing::{debug, error, warn};

use crate::{
    client::ClientConfig,
    error::{Error, Result},
    event::*,
    types::*,
};

/// Realtime TTS service.
pub struct TtsRealtimeService {
    config: Arc<ClientConfig>,
}

impl TtsRealtimeService {
    pub(crate) fn new(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    /// Connects to a realtime TTS session.
    ///
    /// Server events are read by a background task and delivered in arrival
    /// order through [`TtsRealtimeSession::recv`].
    pub async fn connect(&self, realtime_config: &TtsRealtimeConfig) -> Result<TtsRealtimeSession> {
        let model = if realtime_config.model.is_empty() {
            MODEL_QWEN3_TTS_VC_REALTIME
        } else {
            &realtime_config.model
        };

        let url = format!("{}?model={}", self.config.base_url, model);
        debug!("Connecting to: {}", url);

        let request = http::Request::builder()
            .uri(&url)
            .header("Authorization", format!("bearer {}", self.config.api_key));

        let request = if let Some(ref workspace_id) = self.config.workspace_id {
            request.header("X-DashScope-WorkSpace", workspace_id)
        } else {
            request
        };

        let request = request
            .header("Sec-WebSocket-Version", "13")
            .header("Sec-WebSocket-Key", generate_key())
            .header("Connection", "Upgrade")
            .header("Upgrade", "websocket")
            .header("Host", extract_host(&url).unwrap_or("dashscope.aliyuncs.com"))
            .body(())
            .map_err(|e| Error::Connection(format!("Failed to build request: {}", e)))?;

        let (ws_stream, _response) = connect_async(request)
            .await
            .map_err(|e| Error::Connection(format!("Failed to connect: {}", e)))?;

        let (write, read) = ws_stream.split();

        let (event_tx, event_rx) = mpsc::channel(100);
        let (write_tx, write_rx) = mpsc::channel(100);

        let write_handle = tokio::spawn(write_loop(write, write_rx));
        let read_handle = tokio::spawn(read_loop(read, event_tx));

        Ok(TtsRealtimeSession {
            config: TtsRealtimeConfig {
                model: model.to_string(),
            },
            event_rx,
            write_tx,
            _read_handle: read_handle,
            _write_handle: write_handle,
            session_id: None,
        })
    }
}

/// Realtime session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsRealtimeConfig {
    /// Model ID to use. Default: qwen3-tts-vc-realtime-2025-11-27
    #[serde(default)]
    pub model: String,
}

/// Active realtime TTS session.
pub struct TtsRealtimeSession {
    config: TtsRealtimeConfig,
    event_rx: mpsc::Receiver<Result<TtsEvent>>,
    write_tx: mpsc::Sender<Message>,
    _read_handle: tokio::task::JoinHandle<()>,
    _write_handle: tokio::task::JoinHandle<()>,
    session_id: Option<String>,
}

impl TtsRealtimeSession {
    /// Returns the session configuration.
    pub fn config(&self) -> &TtsRealtimeConfig {
        &self.config
    }

    /// Returns the session ID once `session.created` has been observed.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Updates voice and output format of the session.
    pub async fn update_session(&self, config: &TtsSessionConfig) -> Result<()> {
        let event = json!({
            "event_id": generate_event_id(),
            "type": EVENT_TYPE_SESSION_UPDATE,
            "session": {
                "voice": config.voice,
                "response_format": config.response_format,
                "sample_rate": config.sample_rate,
                "mode": config.mode,
            },
        });
        self.send_event(event).await
    }

    /// Appends text to the input buffer.
    pub async fn append_text(&self, text: &str) -> Result<()> {
        let event = json!({
            "event_id": generate_event_id(),
            "type": EVENT_TYPE_INPUT_TEXT_APPEND,
            "text": text,
        });
        self.send_event(event).await
    }

    /// Signals end of input. The server flushes remaining audio and then
    /// sends `session.finished`.
    pub async fn finish_session(&self) -> Result<()> {
        let event = json!({
            "event_id": generate_event_id(),
            "type": EVENT_TYPE_SESSION_FINISH,
        });
        self.send_event(event).await
    }

    /// Receives the next event. `None` means the connection is gone.
    pub async fn recv(&mut self) -> Option<Result<TtsEvent>> {
        let event = self.event_rx.recv().await;
        if let Some(Ok(ref ev)) = event {
            if ev.is_session_created() {
                if let Some(id) = ev.session.as_ref().and_then(|s| s.id.clone()) {
                    self.session_id = Some(id);
                }
            }
        }
        event
    }

    /// Waits for an event of the given type, skipping others.
    ///
    /// An `error` event ends the wait with [`Error::Session`], a closed
    /// connection with [`Error::SessionClosed`].
    pub async fn wait_for_event(&mut self, event_type: &str) -> Result<TtsEvent> {
        while let Some(event) = self.recv().await {
            let event = event?;
            if event.event_type == event_type {
                return Ok(event);
            }
            if event.is_error() {
                let (code, message) = event.error_parts();
                return Err(Error::Session { code, message });
            }
            debug!("Skipping event while waiting for {}: {}", event_type, event.event_type);
        }
        Err(Error::SessionClosed)
    }

    /// Drives the session to completion, handing each decoded audio fragment
    /// to `on_audio` in arrival order.
    ///
    /// Completes on `session.finished` or when the server closes the
    /// connection, with or without a close frame. An `error` event is
    /// returned as [`Error::Session`]. Frames that fail to decode are logged
    /// and skipped. There is no built-in timeout.
    pub async fn collect_audio<F>(&mut self, mut on_audio: F) -> Result<()>
    where
        F: FnMut(Vec<u8>),
    {
        while let Some(event) = self.recv().await {
            let event = match event {
                Ok(event) => event,
                Err(e @ (Error::Base64Decode(_) | Error::Json(_))) => {
                    warn!("Skipping undecodable frame: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            match event.event_type.as_str() {
                EVENT_TYPE_RESPONSE_AUDIO_DELTA => {
                    if let Some(audio) = event.audio {
                        on_audio(audio);
                    }
                }
                EVENT_TYPE_SESSION_FINISHED => return Ok(()),
                EVENT_TYPE_ERROR => {
                    let (code, message) = event.error_parts();
                    return Err(Error::Session { code, message });
                }
                other => debug!("Event: {}", other),
            }
        }
        debug!("Session closed without session.finished");
        Ok(())
    }

    /// Closes the session.
    pub async fn close(&self) -> Result<()> {
        let _ = self.write_tx.send(Message::Close(None)).await;
        Ok(())
    }

    async fn send_event(&self, event: serde_json::Value) -> Result<()> {
        let text = event.to_string();
        debug!("Sending event: {}", truncate_for_log(&text, 500));
        self.write_tx
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| Error::SessionClosed)
    }
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn write_loop(
    mut write: futures::stream::SplitSink<WsStream, Message>,
    mut rx: mpsc::Receiver<Message>,
) {
    use futures::SinkExt;

    while let Some(msg) = rx.recv().await {
        if let Message::Close(_) = msg {
            let _ = write.close().await;
            break;
        }
        if let Err(e) = write.send(msg).await {
            error!("Write error: {}", e);
            break;
        }
    }
}

async fn read_loop(
    mut read: futures::stream::SplitStream<WsStream>,
    tx: mpsc::Sender<Result<TtsEvent>>,
) {
    while let Some(result) = read.next().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!("Received: {}", truncate_for_log(&text, 1000));
                if tx.send(parse_event(&text)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                debug!("WebSocket closed by server");
                break;
            }
            Ok(Message::Ping(data)) => {
                debug!("Received ping: {:?}", data);
            }
            Ok(_) => {}
            Err(
                WsError::ConnectionClosed
                | WsError::AlreadyClosed
                | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake),
            ) => {
                debug!("WebSocket dropped without close frame");
                break;
            }
            Err(e) => {
                error!("Read error: {}", e);
                let _ = tx.send(Err(Error::WebSocket(e))).await;
                break;
            }
        }
    }
}

/// Parses a server event from JSON.
pub(crate) fn parse_event(text: &str) -> Result<TtsEvent> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    let mut event = TtsEvent::default();

    if let Some(t) = raw.get("type").and_then(|v| v.as_str()) {
        event.event_type = t.to_string();
    }

    if let Some(id) = raw.get("event_id").and_then(|v| v.as_str()) {
        event.event_id = Some(id.to_string());
    }

    match event.event_type.as_str() {
        EVENT_TYPE_SESSION_CREATED | EVENT_TYPE_SESSION_UPDATED => {
            if let Some(session) = raw.get("session") {
                if let Ok(info) = serde_json::from_value(session.clone()) {
                    event.session = Some(info);
                }
            }
        }
        EVENT_TYPE_RESPONSE_CREATED | EVENT_TYPE_RESPONSE_DONE => {
            if let Some(response) = raw.get("response") {
                if let Some(id) = response.get("id").and_then(|v| v.as_str()) {
                    event.response_id = Some(id.to_string());
                }
                if let Some(usage) = response.get("usage") {
                    event.usage = serde_json::from_value(usage.clone()).ok();
                }
            }
        }
        EVENT_TYPE_RESPONSE_AUDIO_DELTA => {
            if let Some(id) = raw.get("response_id").and_then(|v| v.as_str()) {
                event.response_id = Some(id.to_string());
            }
            if let Some(delta) = raw.get("delta").and_then(|v| v.as_str()) {
                event.audio = Some(base64::engine::general_purpose::STANDARD.decode(delta)?);
            }
        }
        EVENT_TYPE_ERROR => {
            let err = match raw.get("error") {
                Some(error) => serde_json::from_value(error.clone()).unwrap_or_default(),
                None => EventError {
                    code: raw.get("code").and_then(|v| v.as_str()).map(String::from),
                    message: raw.get("message").and_then(|v| v.as_str()).map(String::from),
                    ..Default::default()
                },
            };
            event.error = Some(err);
        }
        _ => {}
    }

    Ok(event)
}

fn generate_event_id() -> String {
    format!("event_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

fn extract_host(url: &str) -> Option<&str> {
    url.strip_prefix("wss://")
        .or_else(|| url.strip_prefix("ws://"))
        .and_then(|s| s.split('/').next())
        .and_then(|s| s.split('?').next())
}

fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() > max_len {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_audio_delta() {
        let ev = parse_event(r#"{"type":"response.audio.delta","response_id":"r1","delta":"AQID"}"#)
            .unwrap();
        assert_eq!(ev.event_type, EVENT_TYPE_RESPONSE_AUDIO_DELTA);
        assert_eq!(ev.audio.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(ev.response_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_parse_bad_base64() {
        let err = parse_event(r#"{"type":"response.audio.delta","delta":"!!!"}"#).unwrap_err();
        assert!(matches!(err, Error::Base64Decode(_)));
    }

    #[test]
    fn test_parse_session_created() {
        let ev = parse_event(
            r#"{"type":"session.created","event_id":"e1","session":{"id":"sess_1","model":"qwen3-tts-vc-realtime-2025-11-27"}}"#,
        )
        .unwrap();
        assert!(ev.is_session_created());
        assert_eq!(ev.event_id.as_deref(), Some("e1"));
        assert_eq!(ev.session.unwrap().id.as_deref(), Some("sess_1"));
    }

    #[test]
    fn test_parse_error_nested() {
        let ev = parse_event(
            r#"{"type":"error","error":{"type":"invalid_request_error","code":"InvalidParameter","message":"voice not found"}}"#,
        )
        .unwrap();
        assert!(ev.is_error());
        assert_eq!(
            ev.error_parts(),
            ("InvalidParameter".to_string(), "voice not found".to_string())
        );
    }

    #[test]
    fn test_parse_error_flat() {
        let ev = parse_event(r#"{"type":"error","code":"Throttling","message":"slow"}"#).unwrap();
        assert_eq!(ev.error_parts(), ("Throttling".to_string(), "slow".to_string()));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_event("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_extract_host() {
        assert_eq!(
            extract_host("wss://dashscope.aliyuncs.com/api-ws/v1/realtime?model=x"),
            Some("dashscope.aliyuncs.com")
        );
        assert_eq!(extract_host("ws://127.0.0.1:9001?model=x"), Some("127.0.0.1:9001"));
        assert_eq!(extract_host("http://x"), None);
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("abc", 10), "abc");
        assert_eq!(truncate_for_log("abcdef", 3), "abc...");
        // multi-byte boundary
        assert_eq!(truncate_for_log("语音合成", 4), "语...");
    }

    #[test]
    fn test_event_id_format() {
        let id = generate_event_id();
        assert!(id.starts_with("event_"));
        assert_eq!(id.len(), "event_".len() + 12);
    }
}
