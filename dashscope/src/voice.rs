//! Voice-enrollment service.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    http::HttpClient,
    types::{
        VoiceRecord, ACTION_CREATE, ACTION_DELETE, ACTION_LIST, DEFAULT_PAGE_SIZE,
        DEFAULT_PREFERRED_NAME, MODEL_QWEN_VOICE_ENROLLMENT,
    },
};

/// REST path of the voice customization endpoint.
pub const VOICE_CUSTOMIZATION_PATH: &str = "/api/v1/services/audio/tts/customization";

/// Voice-enrollment service.
pub struct VoiceService {
    http: Arc<HttpClient>,
}

/// Request to enroll a voice from a sample recording.
#[derive(Debug, Clone)]
pub struct VoiceCreateRequest {
    /// Realtime model the voice will be used with.
    pub target_model: String,
    /// Name hint stored with the voice.
    pub preferred_name: String,
    /// Sample audio bytes.
    pub audio: Vec<u8>,
    /// MIME type of `audio`.
    pub mime_type: String,
}

impl VoiceCreateRequest {
    /// Reads a sample recording from disk.
    ///
    /// The MIME type is derived from the file extension.
    pub fn from_file(path: impl AsRef<Path>, target_model: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let audio = std::fs::read(path)?;
        Ok(Self {
            target_model: target_model.into(),
            preferred_name: DEFAULT_PREFERRED_NAME.to_string(),
            audio,
            mime_type: guess_audio_mime(path).to_string(),
        })
    }

    /// Returns the sample encoded as a data URI.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.audio)
        )
    }
}

#[derive(Serialize)]
struct EnrollmentRequest<I: Serialize> {
    model: &'static str,
    input: I,
}

#[derive(Serialize)]
struct CreateInput<'a> {
    action: &'static str,
    target_model: &'a str,
    preferred_name: &'a str,
    audio: AudioData,
}

#[derive(Serialize)]
struct AudioData {
    data: String,
}

#[derive(Serialize)]
struct ListInput {
    action: &'static str,
    page_size: u32,
    page_index: u32,
}

#[derive(Serialize)]
struct DeleteInput<'a> {
    action: &'static str,
    voice: &'a str,
}

#[derive(Deserialize)]
struct EnrollmentResponse<O> {
    output: Option<O>,
    #[serde(default)]
    request_id: String,
}

#[derive(Deserialize)]
struct CreateOutput {
    #[serde(default)]
    voice: String,
}

#[derive(Deserialize)]
struct ListOutput {
    #[serde(default)]
    voice_list: Vec<VoiceRecord>,
}

impl VoiceService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Enrolls a voice and returns its identifier.
    pub async fn create(&self, request: &VoiceCreateRequest) -> Result<String> {
        let body = EnrollmentRequest {
            model: MODEL_QWEN_VOICE_ENROLLMENT,
            input: CreateInput {
                action: ACTION_CREATE,
                target_model: &request.target_model,
                preferred_name: &request.preferred_name,
                audio: AudioData {
                    data: request.data_uri(),
                },
            },
        };

        let resp: EnrollmentResponse<CreateOutput> =
            self.http.post(VOICE_CUSTOMIZATION_PATH, &body).await?;

        match resp.output {
            Some(out) if !out.voice.is_empty() => Ok(out.voice),
            _ => Err(Error::UnexpectedResponse(format!(
                "create response has no output.voice (request_id={})",
                resp.request_id
            ))),
        }
    }

    /// Enrolls a voice from a local recording.
    pub async fn create_from_file(
        &self,
        path: impl AsRef<Path>,
        target_model: &str,
    ) -> Result<String> {
        let request = VoiceCreateRequest::from_file(path, target_model)?;
        self.create(&request).await
    }

    /// Lists enrolled voices (first page, up to 100 entries).
    pub async fn list(&self) -> Result<Vec<VoiceRecord>> {
        self.list_page(0, DEFAULT_PAGE_SIZE).await
    }

    /// Lists one page of enrolled voices.
    pub async fn list_page(&self, page_index: u32, page_size: u32) -> Result<Vec<VoiceRecord>> {
        let body = EnrollmentRequest {
            model: MODEL_QWEN_VOICE_ENROLLMENT,
            input: ListInput {
                action: ACTION_LIST,
                page_size,
                page_index,
            },
        };

        let resp: EnrollmentResponse<ListOutput> =
            self.http.post(VOICE_CUSTOMIZATION_PATH, &body).await?;

        Ok(resp.output.map(|o| o.voice_list).unwrap_or_default())
    }

    /// Deletes an enrolled voice.
    pub async fn delete(&self, voice: &str) -> Result<()> {
        let body = EnrollmentRequest {
            model: MODEL_QWEN_VOICE_ENROLLMENT,
            input: DeleteInput {
                action: ACTION_DELETE,
                voice,
            },
        };

        let _: EnrollmentResponse<serde_json::Value> =
            self.http.post(VOICE_CUSTOMIZATION_PATH, &body).await?;
        Ok(())
    }
}

/// Guesses the MIME type of a sample recording from its extension.
pub fn guess_audio_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => "audio/wav",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "audio/mpeg",
    }
}
