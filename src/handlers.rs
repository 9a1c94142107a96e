use crate::consts::{DIAL_TIMEOUT_SECS, RECORDING_MAX_SECS};
use crate::signature;
use crate::tasks::process_recording;
use crate::twilio_types::{
    wrap_twiml, DialAction, DialOutcomePayload, HangupAction, RecordAction, RecordingPayload,
    Response, ResponseAction, SayAction, VoicePayload,
};
use crate::types::{AppState, DialOutcome};
use crate::utils::normalize_number;
use crate::voices::VoiceProfile;

use axum::{
    extract::{Host, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

pub async fn healthz() -> &'static str {
    "ok"
}

/// Ready once the SPA build artifact is present on disk.
pub async fn readyz(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let index = std::path::Path::new(&app_state.config.dist_dir).join("index.html");
    match tokio::fs::try_exists(index).await {
        Ok(true) => (StatusCode::OK, "ready"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "not-ready"),
    }
}

/// Last dial outcomes, for operator visibility.
pub async fn dial_log(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(app_state.dial_outcomes())
}

fn twiml_response(actions: Vec<ResponseAction>) -> (StatusCode, HeaderMap, String) {
    let twiml = wrap_twiml(xmlserde::xml_serialize(Response { actions }));
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "text/xml".parse().unwrap());
    (StatusCode::OK, headers, twiml)
}

/// Rebuild the URL Twilio signed: public scheme and host, original path and
/// query.  Behind the proxy the scheme comes from `X-Forwarded-Proto` and
/// the host from configuration, falling back to the Host header.
fn signed_request_url(app_state: &AppState, headers: &HeaderMap, host: &str, uri: &Uri) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");
    let host = app_state.config.public_hostname.as_deref().unwrap_or(host);
    format!("{proto}://{host}{uri}")
}

fn signature_ok(
    app_state: &AppState,
    headers: &HeaderMap,
    host: &str,
    uri: &Uri,
    body: &str,
) -> bool {
    if !app_state.config.validate_signatures {
        return true;
    }
    let Some(token) = app_state.config.twilio_auth_token.as_deref() else {
        return true;
    };
    let provided = headers
        .get("x-twilio-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if provided.is_empty() {
        return false;
    }
    let params: Vec<(String, String)> = serde_urlencoded::from_str(body).unwrap_or_default();
    let url = signed_request_url(app_state, headers, host, uri);
    signature::validate(token, &url, &params, provided)
}

fn say(text: String, profile: &VoiceProfile) -> ResponseAction {
    ResponseAction::Say(SayAction {
        text,
        voice: Some(profile.voice.clone()),
        language: Some(profile.language.clone()),
    })
}

/// Voicemail branch: prompt, record with the async status callback, hang up
/// once the recording ends.
fn voicemail_actions(prompt: String, profile: &VoiceProfile) -> Vec<ResponseAction> {
    vec![
        say(prompt, profile),
        ResponseAction::Record(RecordAction {
            max_length: Some(RECORDING_MAX_SECS),
            play_beep: Some("true".to_string()),
            recording_status_callback: Some("/voice/recording-status".to_string()),
            ..Default::default()
        }),
        ResponseAction::Hangup(HangupAction::default()),
    ]
}

fn answer_actions(app_state: &AppState, payload: &VoicePayload) -> Vec<ResponseAction> {
    let profile = app_state.voices.resolve_country(&payload.from_country);
    let forwarded_from = normalize_number(&payload.forwarded_from);

    let bridge_target = match app_state.config.forward_number.as_deref() {
        // Hairpin guard: the call was forwarded here from the bridge target
        // itself; redialing it would loop the call forever.
        Some(target) if !forwarded_from.is_empty() && forwarded_from == target => {
            info!(forward=%target, call=%payload.call_sid, "call forwarded from bridge target; recording instead");
            None
        }
        Some(target)
            if app_state
                .config
                .business_hours
                .map_or(false, |window| window.is_closed_now()) =>
        {
            debug!(forward=%target, "outside business hours; sending caller to voicemail");
            None
        }
        other => other,
    };

    match bridge_target {
        Some(target) => {
            let greeting = profile
                .greeting
                .clone()
                .unwrap_or_else(|| app_state.config.greeting_text.clone());
            vec![
                say(greeting, &profile),
                ResponseAction::Dial(DialAction {
                    number: target.to_string(),
                    action: Some("/voice/after-dial".to_string()),
                    timeout: Some(DIAL_TIMEOUT_SECS),
                    caller_id: Some(payload.to.clone()).filter(|to| !to.is_empty()),
                    record: Some("record-from-answer-dual".to_string()),
                }),
            ]
        }
        None => voicemail_actions(app_state.config.voicemail_prompt.clone(), &profile),
    }
}

/// Callers always hear a prompt, even when the request body is garbage.
fn trouble_actions() -> Vec<ResponseAction> {
    vec![
        ResponseAction::Say(SayAction {
            text: "We are experiencing technical difficulties. Please try your call again later."
                .to_string(),
            ..Default::default()
        }),
        ResponseAction::Hangup(HangupAction::default()),
    ]
}

/// Inbound call notification (`/voice/answer`, alias `/voice/inbound`).
pub async fn voice_answer(
    State(app_state): State<Arc<AppState>>,
    Host(host): Host,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    if !signature_ok(&app_state, &headers, &host, &uri, &body) {
        warn!("rejecting inbound call webhook with bad signature");
        return (
            StatusCode::FORBIDDEN,
            HeaderMap::new(),
            "Forbidden".to_string(),
        );
    }

    match serde_urlencoded::from_str::<VoicePayload>(&body) {
        Ok(payload) => {
            info!(call=%payload.call_sid, from=%payload.from, to=%payload.to, "inbound call");
            twiml_response(answer_actions(&app_state, &payload))
        }
        Err(e) => {
            error!(error=%e, "unreadable inbound call payload");
            twiml_response(trouble_actions())
        }
    }
}

/// Outcome of the bridge attempt.  Anything short of an answered call sends
/// the caller to voicemail.
pub async fn after_dial(
    State(app_state): State<Arc<AppState>>,
    body: String,
) -> impl IntoResponse {
    let payload = match serde_urlencoded::from_str::<DialOutcomePayload>(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error=%e, "unreadable dial outcome payload; assuming failure");
            DialOutcomePayload::default()
        }
    };
    info!(call=%payload.call_sid, status=?payload.dial_call_status, "dial outcome");

    app_state.push_dial_outcome(DialOutcome {
        call_sid: payload.call_sid.clone(),
        from: payload.from.clone(),
        status: payload.dial_call_status,
        duration_secs: payload.dial_call_duration.parse().ok(),
        at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    });

    let actions = if payload.dial_call_status.connected() {
        vec![]
    } else {
        let profile = app_state.voices.resolve_country(&payload.from_country);
        voicemail_actions(app_state.config.voicemail_prompt.clone(), &profile)
    };
    twiml_response(actions)
}

/// Recording-completed notification.  Twilio gets its ack before any of the
/// slow downstream work starts; the pipeline owns its own failures.
pub async fn recording_status(
    State(app_state): State<Arc<AppState>>,
    body: String,
) -> impl IntoResponse {
    let payload = match serde_urlencoded::from_str::<RecordingPayload>(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error=%e, "unreadable recording payload; dropping notification");
            return StatusCode::OK;
        }
    };
    if payload.recording_url.is_empty() {
        warn!(call=%payload.call_sid, "recording notification without RecordingUrl; skipping");
        return StatusCode::OK;
    }
    info!(call=%payload.call_sid, recording=%payload.recording_sid, "recording completed");

    tokio::spawn(async move {
        if let Err(e) = process_recording(app_state, payload).await {
            error!(error=%e, "recording post-processing failed");
        }
    });

    StatusCode::OK
}
