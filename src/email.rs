//! Voicemail notification delivery: the Resend HTTP API when a key is
//! configured, otherwise an SMTP relay, otherwise skipped with a log line.

use crate::error::RelayError;
use crate::twilio_types::RecordingPayload;
use crate::types::AppState;

use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;
use tracing::info;

pub async fn send_voicemail_email(
    app_state: &AppState,
    payload: &RecordingPayload,
    transcript: &str,
    summary: &str,
) -> Result<(), RelayError> {
    let Some(to) = app_state.config.email_to.as_deref() else {
        info!("EMAIL_TO not configured; voicemail email skipped");
        return Ok(());
    };

    let caller = if payload.from.is_empty() {
        "an unknown caller"
    } else {
        payload.from.as_str()
    };
    let subject = format!("New voicemail from {caller}");
    let body = compose_body(payload, transcript, summary);

    if let Some(api_key) = app_state.config.resend_api_key.as_deref() {
        send_via_resend(app_state, api_key, to, &subject, &body).await
    } else if let Some(smtp_url) = app_state.config.smtp_url.as_deref() {
        send_via_smtp(app_state, smtp_url, to, &subject, &body).await
    } else {
        info!("no email transport configured; voicemail email skipped");
        Ok(())
    }
}

fn compose_body(payload: &RecordingPayload, transcript: &str, summary: &str) -> String {
    let duration = if payload.recording_duration.is_empty() {
        "unknown".to_string()
    } else {
        format!("{}s", payload.recording_duration)
    };
    format!(
        "TradeLine247 voicemail\n\
         \n\
         Caller:   {from}\n\
         Hotline:  {to}\n\
         Duration: {duration}\n\
         Call SID: {call_sid}\n\
         \n\
         Summary\n\
         -------\n\
         {summary}\n\
         \n\
         Transcript\n\
         ----------\n\
         {transcript}\n",
        from = payload.from,
        to = payload.to,
        call_sid = payload.call_sid,
    )
}

async fn send_via_resend(
    app_state: &AppState,
    api_key: &str,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<(), RelayError> {
    let resp = app_state
        .http_client
        .post(format!("{}/emails", app_state.config.resend_base_url))
        .bearer_auth(api_key)
        .json(&json!({
            "from": app_state.config.email_from,
            "to": [to],
            "subject": subject,
            "text": body,
        }))
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(RelayError::UpstreamStatus {
            service: "resend",
            status: resp.status(),
        });
    }
    info!(to, "voicemail email delivered via resend");
    Ok(())
}

async fn send_via_smtp(
    app_state: &AppState,
    smtp_url: &str,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<(), RelayError> {
    let message = Message::builder()
        .from(app_state.config.email_from.parse()?)
        .to(to.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())?;
    let mailer: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::from_url(smtp_url)?.build();
    mailer.send(message).await?;
    info!(to, "voicemail email delivered via smtp");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_metadata_and_transcript() {
        let payload = RecordingPayload {
            call_sid: "CA123".to_string(),
            recording_sid: "RE456".to_string(),
            recording_url: "https://api.twilio.com/rec/RE456".to_string(),
            recording_duration: "42".to_string(),
            from: "+15551234567".to_string(),
            to: "+15877428885".to_string(),
        };
        let body = compose_body(&payload, "hello there", "Caller said hello.");
        assert!(body.contains("+15551234567"));
        assert!(body.contains("Duration: 42s"));
        assert!(body.contains("hello there"));
        assert!(body.contains("Caller said hello."));
    }

    #[test]
    fn missing_duration_reads_as_unknown() {
        let payload = RecordingPayload::default();
        let body = compose_body(&payload, "t", "s");
        assert!(body.contains("Duration: unknown"));
    }
}
