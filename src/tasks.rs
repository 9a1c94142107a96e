//! Recording post-processing: runs after the webhook has already been
//! acknowledged, so nothing here can slow Twilio down.  Each stage degrades
//! independently; the email goes out with whatever survived.

use crate::email;
use crate::error::RelayError;
use crate::openai_types::{OpenAIChatResponse, OpenAIMessage, OpenAIPayload};
use crate::twilio_types::RecordingPayload;
use crate::types::AppState;

use std::sync::Arc;
use tracing::{debug, info, warn};

pub const TRANSCRIPT_UNAVAILABLE: &str =
    "[transcript unavailable: speech-to-text is not configured]";
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable.";

const SUMMARY_PROMPT: &str = "You summarize voicemail transcripts for a small trades business. \
     Reply with a one-sentence summary, key points, and any follow-up actions.";

/// Fetch the audio, transcribe it, summarize the transcript, and email the
/// result.  Transcription and summarization failures are absorbed into
/// placeholder text; only email delivery failures propagate to the caller,
/// which logs them at the task boundary.
pub async fn process_recording(
    app_state: Arc<AppState>,
    payload: RecordingPayload,
) -> Result<(), RelayError> {
    let transcript = match transcribe_recording(&app_state, &payload).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error=%e, call=%payload.call_sid, "transcription failed");
            format!("[transcript unavailable: {e}]")
        }
    };
    info!(call=%payload.call_sid, chars = transcript.len(), "transcript ready");

    let summary = summarize_transcript(&app_state, &transcript).await;

    email::send_voicemail_email(&app_state, &payload, &transcript, &summary).await
}

/// Download the recording from Twilio's media store.  The canonical audio
/// artifact lives at the recording URL with an `.mp3` extension.
async fn fetch_recording_audio(
    app_state: &AppState,
    payload: &RecordingPayload,
) -> Result<Vec<u8>, RelayError> {
    if payload.recording_url.is_empty() {
        return Err(RelayError::MissingField("RecordingUrl"));
    }
    let url = format!("{}.mp3", payload.recording_url);
    let mut request = app_state.http_client.get(&url);
    if let (Some(sid), Some(token)) = (
        app_state.config.twilio_account_sid.as_deref(),
        app_state.config.twilio_auth_token.as_deref(),
    ) {
        request = request.basic_auth(sid, Some(token));
    }
    let resp = request.send().await?;
    if !resp.status().is_success() {
        return Err(RelayError::UpstreamStatus {
            service: "recording fetch",
            status: resp.status(),
        });
    }
    Ok(resp.bytes().await?.to_vec())
}

async fn transcribe_recording(
    app_state: &AppState,
    payload: &RecordingPayload,
) -> Result<String, RelayError> {
    let Some(api_key) = app_state.config.stt_api_key.as_deref() else {
        info!("no speech-to-text key configured; using placeholder transcript");
        return Ok(TRANSCRIPT_UNAVAILABLE.to_string());
    };

    let audio = fetch_recording_audio(app_state, payload).await?;
    debug!(bytes = audio.len(), "fetched recording audio");

    let file = reqwest::multipart::Part::bytes(audio)
        .file_name("recording.mp3")
        .mime_str("audio/mpeg")?;
    let form = reqwest::multipart::Form::new()
        .part("file", file)
        .text("model", "whisper-1")
        .text("response_format", "text");

    let resp = app_state
        .http_client
        .post(format!(
            "{}/v1/audio/transcriptions",
            app_state.config.openai_base_url
        ))
        .bearer_auth(api_key)
        .multipart(form)
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(RelayError::UpstreamStatus {
            service: "transcription",
            status: resp.status(),
        });
    }
    Ok(resp.text().await?.trim().to_string())
}

/// Best-effort: any failure here collapses to a canned string so the email
/// still carries the transcript.
async fn summarize_transcript(app_state: &AppState, transcript: &str) -> String {
    let Some(api_key) = app_state.config.openai_api_key.as_deref() else {
        return SUMMARY_UNAVAILABLE.to_string();
    };
    if transcript.is_empty() || transcript.starts_with("[transcript unavailable") {
        return SUMMARY_UNAVAILABLE.to_string();
    }
    match request_summary(app_state, api_key, transcript).await {
        Ok(summary) if !summary.is_empty() => summary,
        Ok(_) => SUMMARY_UNAVAILABLE.to_string(),
        Err(e) => {
            warn!(error=%e, "summarization failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

async fn request_summary(
    app_state: &AppState,
    api_key: &str,
    transcript: &str,
) -> Result<String, RelayError> {
    let payload = OpenAIPayload {
        model: "gpt-4o-mini".to_string(),
        messages: vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: SUMMARY_PROMPT.to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: transcript.to_string(),
            },
        ],
        max_tokens: Some(300),
        temperature: None,
    };
    let resp = app_state
        .http_client
        .post(format!(
            "{}/v1/chat/completions",
            app_state.config.openai_base_url
        ))
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(RelayError::UpstreamStatus {
            service: "summarization",
            status: resp.status(),
        });
    }
    let parsed: OpenAIChatResponse = resp.json().await?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .unwrap_or_default())
}
