//! Synthesis pipeline against a local realtime TTS server.

use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use yotts_audio::{Container, Transcoder};
use yotts_dashscope::Client;
use yotts_synth::{RealtimeSynthesizer, SynthError, Synthesizer};

/// What the server streams after `session.finish`.
#[derive(Clone)]
enum Reply {
    Audio(Vec<Vec<u8>>),
    Silence,
    Error,
}

fn text(v: Value) -> Message {
    Message::Text(v.to_string().into())
}

async fn spawn_server(reply: Reply) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(text(json!({"type": "session.created", "session": {"id": "sess_1"}})))
            .await
            .unwrap();

        while let Some(Ok(msg)) = ws.next().await {
            let Message::Text(body) = msg else { continue };
            let event: Value = serde_json::from_str(&body).unwrap();
            if event["type"] != "session.finish" {
                continue;
            }
            match &reply {
                Reply::Audio(fragments) => {
                    for frag in fragments {
                        let delta = base64::engine::general_purpose::STANDARD.encode(frag);
                        ws.send(text(json!({"type": "response.audio.delta", "delta": delta})))
                            .await
                            .unwrap();
                    }
                }
                Reply::Silence => {}
                Reply::Error => {
                    ws.send(text(json!({
                        "type": "error",
                        "error": {"code": "Throttling", "message": "too many requests"}
                    })))
                    .await
                    .unwrap();
                }
            }
            ws.send(text(json!({"type": "session.finished"}))).await.unwrap();
            let _ = ws.close(None).await;
            break;
        }
    });

    format!("ws://{}/api-ws/v1/realtime", addr)
}

fn synthesizer(url: &str, transcoder: Transcoder) -> RealtimeSynthesizer {
    let client = Client::builder("sk-test").base_url(url).build().unwrap();
    RealtimeSynthesizer::new(client, "qwen-tts-vc-a", transcoder)
}

/// One second of a 24 kHz ramp, delivered in uneven fragments.
fn fragments() -> (Vec<Vec<u8>>, Vec<u8>) {
    let pcm: Vec<u8> = (0..24000i32)
        .flat_map(|i| ((i % 2000) as i16 - 1000).to_le_bytes())
        .collect();
    let frags = vec![pcm[..7].to_vec(), pcm[7..30001].to_vec(), pcm[30001..].to_vec()];
    (frags, pcm)
}

#[tokio::test]
async fn test_render_collects_buffer() {
    let (frags, pcm) = fragments();
    let url = spawn_server(Reply::Audio(frags)).await;

    let buffer = synthesizer(&url, Transcoder::with_program("ffmpeg"))
        .render("hello")
        .await
        .unwrap();
    assert_eq!(buffer.fragment_count(), 3);
    assert_eq!(buffer.to_vec(), pcm);
    assert_eq!(buffer.duration(), std::time::Duration::from_secs(1));
}

#[tokio::test]
async fn test_no_audio() {
    let url = spawn_server(Reply::Silence).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.wav");

    let err = synthesizer(&url, Transcoder::with_program("ffmpeg"))
        .synthesize("hello", &out)
        .await
        .unwrap_err();
    assert!(matches!(err, SynthError::NoAudio));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_session_error_is_remote() {
    let url = spawn_server(Reply::Error).await;
    let dir = tempfile::tempdir().unwrap();

    let err = synthesizer(&url, Transcoder::with_program("ffmpeg"))
        .synthesize("hello", &dir.path().join("out.wav"))
        .await
        .unwrap_err();
    assert!(err.is_remote());
    assert!(err.to_string().contains("Throttling"));
}

#[tokio::test]
async fn test_synthesize_wav() {
    let Ok(transcoder) = Transcoder::locate(None) else {
        eprintln!("ffmpeg not found, skipping");
        return;
    };
    let (frags, _) = fragments();
    let url = spawn_server(Reply::Audio(frags)).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("clips").join("hello.wav");

    let path = synthesizer(&url, transcoder)
        .with_container(Container::Wav)
        .synthesize("hello", &out)
        .await
        .unwrap();
    assert_eq!(path, out);
    // RIFF header (with ffmpeg's INFO chunk) plus the PCM payload
    let len = std::fs::metadata(&path).unwrap().len();
    assert!(len > 48000 && len < 48000 + 512, "unexpected size {len}");
}
