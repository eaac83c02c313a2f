//! Example: synthesize a line of text with an enrolled voice.
//!
//! Usage:
//!   DASHSCOPE_API_KEY=your-key cargo run --example tts -- <voice-id> "text" out.pcm
//!
//! Convert the output with ffmpeg:
//!   ffmpeg -f s16le -ar 24000 -ac 1 -i out.pcm out.mp3

use yotts_dashscope::{
    Client, Region, TtsRealtimeConfig, TtsSessionConfig, EVENT_TYPE_SESSION_CREATED,
    MODEL_QWEN3_TTS_VC_REALTIME,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <voice-id> <text> <output.pcm>", args[0]);
        std::process::exit(1);
    }

    let api_key = std::env::var("DASHSCOPE_API_KEY")?;
    let region = std::env::var("DASHSCOPE_REGION")
        .ok()
        .and_then(|r| r.parse::<Region>().ok())
        .unwrap_or_default();

    let client = Client::builder(&api_key).region(region).build()?;

    let config = TtsRealtimeConfig {
        model: MODEL_QWEN3_TTS_VC_REALTIME.to_string(),
    };
    let mut session = client.tts_realtime().connect(&config).await?;
    session.wait_for_event(EVENT_TYPE_SESSION_CREATED).await?;
    println!("Connected, session: {:?}", session.session_id());

    session.update_session(&TtsSessionConfig::pcm(&args[1])).await?;
    session.append_text(&args[2]).await?;
    session.finish_session().await?;

    let mut pcm = Vec::new();
    session.collect_audio(|chunk| pcm.extend(chunk)).await?;
    session.close().await?;

    std::fs::write(&args[3], &pcm)?;
    println!("Wrote {} bytes to {}", pcm.len(), args[3]);
    Ok(())
}
