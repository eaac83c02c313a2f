//! Interactive voice management menu.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clap::Args;

use yotts_audio::{Container, Transcoder};
use yotts_dashscope::{Client, Region, VoiceRecord};
use yotts_synth::{RealtimeSynthesizer, Synthesizer};

use super::{
    context_model, create_client, find_context, print_error, print_info, print_success,
    print_warning,
};
use crate::Cli;

const DEFAULT_AUDIO_PATH: &str = "input.mp3";
const DEFAULT_OUTPUT_DIR: &str = "mp3";
const RULE: &str = "==================================================";

/// Interactive voice management menu.
#[derive(Args, Default)]
pub struct MenuCommand {
    /// Realtime TTS model (overrides the context)
    #[arg(long)]
    model: Option<String>,
    /// Directory for synthesized files
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Transcoder path or name on PATH
    #[arg(long)]
    ffmpeg: Option<String>,
}

impl MenuCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let transcoder = match Transcoder::locate(self.ffmpeg.as_deref()) {
            Ok(t) => t,
            Err(e) => {
                print_error(&e.to_string());
                print_info(
                    "Install ffmpeg (https://ffmpeg.org/download.html) and make sure it is on PATH",
                );
                anyhow::bail!("ffmpeg is required");
            }
        };
        match transcoder.version().await {
            Ok(v) => print_success(&v),
            Err(e) => print_warning(&format!("could not query ffmpeg version: {}", e)),
        }

        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();

        let (client, model) = match find_context(cli)? {
            Some(ctx) => {
                print_info(&format!("Using context \"{}\"", ctx.name));
                let model = self.model.clone().unwrap_or_else(|| context_model(&ctx));
                (create_client(&ctx)?, model)
            }
            None => {
                let Some((region, api_key)) = prompt_credentials(&mut input, &mut output)? else {
                    return Ok(());
                };
                let client = Client::builder(api_key).region(region).build()?;
                let model = self
                    .model
                    .clone()
                    .unwrap_or_else(|| yotts_dashscope::MODEL_QWEN3_TTS_VC_REALTIME.to_string());
                (client, model)
            }
        };

        let backend = DashScopeBackend {
            client,
            model,
            transcoder,
        };
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Menu::new(input, output, backend)
            .with_output_dir(output_dir)
            .run()
            .await
    }
}

/// Operations the menu dispatches.
#[async_trait]
pub trait VoiceBackend: Send + Sync {
    async fn create_voice(&self, audio: &Path) -> anyhow::Result<String>;
    async fn list_voices(&self) -> anyhow::Result<Vec<VoiceRecord>>;
    async fn delete_voice(&self, voice: &str) -> anyhow::Result<()>;
    async fn synthesize(&self, voice: &str, text: &str, out: &Path) -> anyhow::Result<PathBuf>;
}

pub struct DashScopeBackend {
    client: Client,
    model: String,
    transcoder: Transcoder,
}

#[async_trait]
impl VoiceBackend for DashScopeBackend {
    async fn create_voice(&self, audio: &Path) -> anyhow::Result<String> {
        Ok(self.client.voice().create_from_file(audio, &self.model).await?)
    }

    async fn list_voices(&self) -> anyhow::Result<Vec<VoiceRecord>> {
        Ok(self.client.voice().list().await?)
    }

    async fn delete_voice(&self, voice: &str) -> anyhow::Result<()> {
        Ok(self.client.voice().delete(voice).await?)
    }

    async fn synthesize(&self, voice: &str, text: &str, out: &Path) -> anyhow::Result<PathBuf> {
        let synth = RealtimeSynthesizer::new(self.client.clone(), voice, self.transcoder.clone())
            .with_model(self.model.as_str())
            .with_container(Container::MP3_128K);
        Ok(synth.synthesize(text, out).await?)
    }
}

/// Reads one trimmed line. `None` on end of input.
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> anyhow::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks for the region and the API key.
pub fn prompt_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<Option<(Region, String)>> {
    writeln!(output, "{}", RULE)?;
    writeln!(output, "DashScope voice cloning tool")?;
    writeln!(output, "{}", RULE)?;

    let prompt = "Region (1 Beijing, 2 Singapore, default 1): ";
    let Some(choice) = read_line(input, output, prompt)? else {
        return Ok(None);
    };
    let region = if choice == "2" { Region::Intl } else { Region::Cn };
    writeln!(output, "✓ Using {} node", region.display_name())?;

    loop {
        let Some(key) = read_line(input, output, "DashScope API key: ")? else {
            return Ok(None);
        };
        if !key.is_empty() {
            return Ok(Some((region, key)));
        }
        writeln!(output, "✗ API key must not be empty")?;
    }
}

/// The menu loop over a line-oriented terminal.
pub struct Menu<R, W, B> {
    input: R,
    output: W,
    backend: B,
    output_dir: PathBuf,
}

impl<R: BufRead, W: Write, B: VoiceBackend> Menu<R, W, B> {
    pub fn new(input: R, output: W, backend: B) -> Self {
        Self {
            input,
            output,
            backend,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Runs until the user exits or input ends.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.render_menu()?;
            let Some(choice) = self.prompt("Choose (1-4): ")? else {
                return Ok(());
            };

            let result = match choice.as_str() {
                "1" => self.create_and_synthesize().await,
                "2" => self.list().await,
                "3" => self.delete().await,
                "4" => {
                    writeln!(self.output, "Bye")?;
                    return Ok(());
                }
                _ => {
                    self.fail("Invalid choice, enter 1-4")?;
                    continue;
                }
            };

            if let Err(e) = result {
                self.fail(&format!("Operation failed: {:#}", e))?;
            }
        }
    }

    fn render_menu(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "1. Create voice and synthesize")?;
        writeln!(self.output, "2. List voices")?;
        writeln!(self.output, "3. Delete voice")?;
        writeln!(self.output, "4. Exit")?;
        writeln!(self.output, "{}", RULE)?;
        Ok(())
    }

    async fn create_and_synthesize(&mut self) -> anyhow::Result<()> {
        let prompt = format!("Audio file path (default {}): ", DEFAULT_AUDIO_PATH);
        let Some(path) = self.prompt(&prompt)? else {
            return Ok(());
        };
        let path = if path.is_empty() {
            PathBuf::from(DEFAULT_AUDIO_PATH)
        } else {
            PathBuf::from(path)
        };
        if !path.exists() {
            return self.fail(&format!("File not found: {}", path.display()));
        }

        let Some(text) = self.prompt("Text to synthesize: ")? else {
            return Ok(());
        };
        if text.is_empty() {
            return self.fail("Text must not be empty");
        }

        self.info("Creating voice...")?;
        let voice = self.backend.create_voice(&path).await?;
        self.ok(&format!("Voice ID: {}", voice))?;

        self.info("Synthesizing...")?;
        let out = self
            .output_dir
            .join(format!("output_{}.mp3", chrono::Utc::now().timestamp()));
        let out = self.backend.synthesize(&voice, &text, &out).await?;
        self.ok(&format!("Audio saved: {}", out.display()))?;
        self.ok(&format!("Voice ID: {}", voice))
    }

    async fn list(&mut self) -> anyhow::Result<()> {
        let voices = self.backend.list_voices().await?;
        self.ok(&format!("{} voice(s) in total:", voices.len()))?;
        if voices.is_empty() {
            writeln!(self.output, "  (no voices)")?;
        }
        for (i, v) in voices.iter().enumerate() {
            writeln!(self.output, "  {}. {} - {}", i + 1, v.voice, v.gmt_create)?;
        }
        Ok(())
    }

    async fn delete(&mut self) -> anyhow::Result<()> {
        let voices = self.backend.list_voices().await?;
        if voices.is_empty() {
            return self.fail("No voices to delete");
        }

        writeln!(self.output, "Select the voice to delete (1-{}):", voices.len())?;
        for (i, v) in voices.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, v.voice)?;
        }

        let Some(answer) = self.prompt("Number: ")? else {
            return Ok(());
        };
        let index = match answer.parse::<usize>() {
            Ok(n) => n,
            Err(_) => return self.fail("Please enter a number"),
        };
        let Some(record) = index.checked_sub(1).and_then(|i| voices.get(i)) else {
            return self.fail("Invalid number");
        };

        let Some(confirm) = self.prompt(&format!("Delete {}? (y/n): ", record.voice))? else {
            return Ok(());
        };
        if !confirm.eq_ignore_ascii_case("y") {
            writeln!(self.output, "Cancelled")?;
            return Ok(());
        }

        self.backend.delete_voice(&record.voice).await?;
        self.ok(&format!("Deleted {}", record.voice))
    }

    fn prompt(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        read_line(&mut self.input, &mut self.output, prompt)
    }

    fn ok(&mut self, msg: &str) -> anyhow::Result<()> {
        writeln!(self.output, "✓ {}", msg)?;
        Ok(())
    }

    fn info(&mut self, msg: &str) -> anyhow::Result<()> {
        writeln!(self.output, "ℹ {}", msg)?;
        Ok(())
    }

    fn fail(&mut self, msg: &str) -> anyhow::Result<()> {
        writeln!(self.output, "✗ {}", msg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        voices: Vec<VoiceRecord>,
        created: Mutex<Vec<PathBuf>>,
        deleted: Mutex<Vec<String>>,
        synthesized: Mutex<Vec<(String, String, PathBuf)>>,
        fail_list: bool,
    }

    impl FakeBackend {
        fn with_voices(n: usize) -> Self {
            let voices = (1..=n)
                .map(|i| VoiceRecord {
                    voice: format!("qwen-tts-vc-{}", i),
                    gmt_create: format!("2025-01-0{} 10:00:00", i),
                    gmt_modified: None,
                    target_model: None,
                })
                .collect();
            Self {
                voices,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl<'a> VoiceBackend for &'a FakeBackend {
        async fn create_voice(&self, audio: &Path) -> anyhow::Result<String> {
            self.created.lock().unwrap().push(audio.to_path_buf());
            Ok("qwen-tts-vc-new".into())
        }

        async fn list_voices(&self) -> anyhow::Result<Vec<VoiceRecord>> {
            if self.fail_list {
                anyhow::bail!("api error: InvalidApiKey - bad key");
            }
            Ok(self.voices.clone())
        }

        async fn delete_voice(&self, voice: &str) -> anyhow::Result<()> {
            self.deleted.lock().unwrap().push(voice.to_string());
            Ok(())
        }

        async fn synthesize(&self, voice: &str, text: &str, out: &Path) -> anyhow::Result<PathBuf> {
            self.synthesized
                .lock()
                .unwrap()
                .push((voice.to_string(), text.to_string(), out.to_path_buf()));
            Ok(out.to_path_buf())
        }
    }

    async fn run(backend: &FakeBackend, input: &str) -> String {
        let mut out = Vec::new();
        Menu::new(Cursor::new(input.as_bytes().to_vec()), &mut out, backend)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn count_entries(out: &str) -> usize {
        out.lines().filter(|l| l.starts_with("  ") && l.contains(". qwen-tts-vc-")).count()
    }

    #[tokio::test]
    async fn test_list_renders_every_voice() {
        for n in [1, 3, 7] {
            let backend = FakeBackend::with_voices(n);
            let out = run(&backend, "2\n4\n").await;
            assert_eq!(count_entries(&out), n);
            assert!(out.contains(&format!("{} voice(s) in total", n)));
            assert!(!out.contains("(no voices)"));
        }
    }

    #[tokio::test]
    async fn test_list_empty() {
        let backend = FakeBackend::default();
        let out = run(&backend, "2\n4\n").await;
        assert!(out.contains("0 voice(s) in total"));
        assert!(out.contains("(no voices)"));
        assert_eq!(count_entries(&out), 0);
    }

    #[tokio::test]
    async fn test_list_error_is_rendered_and_loop_continues() {
        let backend = FakeBackend {
            fail_list: true,
            ..Default::default()
        };
        let out = run(&backend, "2\n4\n").await;
        assert!(out.contains("✗ Operation failed: api error: InvalidApiKey"));
        assert!(out.ends_with("Bye\n"));
    }

    #[tokio::test]
    async fn test_delete_bad_index_never_dispatches() {
        let backend = FakeBackend::with_voices(2);
        let out = run(&backend, "3\n0\n3\n3\n3\nabc\n3\n-1\n3\n\n4\n").await;
        assert!(backend.deleted.lock().unwrap().is_empty());
        assert!(!out.contains("Invalid choice"));
        assert_eq!(out.matches("✗ Invalid number").count(), 2);
        assert_eq!(out.matches("✗ Please enter a number").count(), 3);
    }

    #[tokio::test]
    async fn test_delete_confirmed() {
        let backend = FakeBackend::with_voices(3);
        let out = run(&backend, "3\n2\nn\n3\n2\nY\n4\n").await;
        assert!(out.contains("Cancelled"));
        assert_eq!(*backend.deleted.lock().unwrap(), vec!["qwen-tts-vc-2".to_string()]);
        assert!(out.contains("✓ Deleted qwen-tts-vc-2"));
    }

    #[tokio::test]
    async fn test_delete_with_no_voices() {
        let backend = FakeBackend::default();
        let out = run(&backend, "3\n4\n").await;
        assert!(out.contains("✗ No voices to delete"));
    }

    #[tokio::test]
    async fn test_create_validates_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp3");
        let sample = dir.path().join("sample.mp3");
        std::fs::write(&sample, b"ID3").unwrap();

        let backend = FakeBackend::default();
        let input = format!("1\n{}\n1\n{}\n\n4\n", missing.display(), sample.display());
        let out = run(&backend, &input).await;
        assert!(out.contains("✗ File not found"));
        assert!(out.contains("✗ Text must not be empty"));
        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_synthesize() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("sample.mp3");
        std::fs::write(&sample, b"ID3").unwrap();

        let backend = FakeBackend::default();
        let mut out = Vec::new();
        let input = format!("1\n{}\nhello world\n4\n", sample.display());
        Menu::new(Cursor::new(input.into_bytes()), &mut out, &backend)
            .with_output_dir(dir.path().join("mp3"))
            .run()
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(*backend.created.lock().unwrap(), vec![sample]);
        let synthesized = backend.synthesized.lock().unwrap();
        let (voice, text, path) = &synthesized[0];
        assert_eq!(voice, "qwen-tts-vc-new");
        assert_eq!(text, "hello world");
        assert_eq!(path.parent(), Some(dir.path().join("mp3").as_path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("output_") && name.ends_with(".mp3"));
        assert!(out.contains("✓ Audio saved:"));
    }

    #[tokio::test]
    async fn test_invalid_choice_and_eof() {
        let backend = FakeBackend::default();
        let out = run(&backend, "9\n").await;
        assert!(out.contains("✗ Invalid choice"));
        assert!(!out.contains("Bye"));
    }

    #[test]
    fn test_prompt_credentials() {
        let mut out = Vec::new();
        let mut input = Cursor::new(b"2\n\n sk-abc \n".to_vec());
        let (region, key) = prompt_credentials(&mut input, &mut out).unwrap().unwrap();
        assert_eq!(region, Region::Intl);
        assert_eq!(key, "sk-abc");
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Using Singapore node"));
        assert!(out.contains("API key must not be empty"));

        let mut input = Cursor::new(b"\nsk-abc\n".to_vec());
        let (region, _) = prompt_credentials(&mut input, &mut Vec::new()).unwrap().unwrap();
        assert_eq!(region, Region::Cn);
    }
}
