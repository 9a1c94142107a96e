use crate::hours::HoursWindow;
use crate::utils::normalize_number;

use std::env;
use tracing::warn;

/// Everything the relay reads from the environment.  Optional integrations
/// degrade with a warning instead of refusing to start: a missing forward
/// number means voicemail-only, missing API keys mean placeholder
/// transcripts and skipped emails.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub dist_dir: String,
    /// Canonical public host used to reconstruct signed webhook URLs behind
    /// the proxy.  Falls back to the request Host header when unset.
    pub public_hostname: Option<String>,
    /// Bridge target, normalized.  None → voicemail-only.
    pub forward_number: Option<String>,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub validate_signatures: bool,
    pub stt_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub resend_api_key: Option<String>,
    pub resend_base_url: String,
    pub email_from: String,
    pub email_to: Option<String>,
    pub smtp_url: Option<String>,
    pub greeting_text: String,
    pub voicemail_prompt: String,
    pub business_hours: Option<HoursWindow>,
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = match env_opt("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(port=%raw, "PORT is not a number; using 5000");
                5000
            }),
            None => 5000,
        };

        let forward_number = env_opt("FORWARD_NUMBER")
            .map(|n| normalize_number(&n))
            .filter(|n| !n.is_empty());
        if forward_number.is_none() {
            warn!("FORWARD_NUMBER not set; inbound calls go straight to voicemail");
        }

        let twilio_auth_token = env_opt("TWILIO_AUTH_TOKEN");
        let validate_signatures = match env_opt("VALIDATE_TWILIO_SIGNATURE").as_deref() {
            Some("0") | Some("false") | Some("off") => false,
            _ => twilio_auth_token.is_some(),
        };
        if !validate_signatures {
            warn!("twilio signature validation is OFF; webhooks are unauthenticated");
        }

        let openai_api_key = env_opt("OPENAI_API_KEY");
        let stt_api_key = env_opt("STT_API_KEY").or_else(|| openai_api_key.clone());
        if stt_api_key.is_none() {
            warn!("no STT_API_KEY/OPENAI_API_KEY; voicemails will not be transcribed");
        }

        let resend_api_key = env_opt("RESEND_API_KEY");
        let smtp_url = env_opt("SMTP_URL");
        let email_to = env_opt("EMAIL_TO");
        if email_to.is_none() || (resend_api_key.is_none() && smtp_url.is_none()) {
            warn!("email delivery not fully configured; transcripts will only be logged");
        }

        let business_hours = env_opt("BUSINESS_HOURS").and_then(|span| {
            let offset = env_or("BUSINESS_HOURS_UTC_OFFSET", "+00:00");
            let window = HoursWindow::parse(&span, &offset);
            if window.is_none() {
                warn!(span=%span, offset=%offset, "ignoring unparseable BUSINESS_HOURS");
            }
            window
        });

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            dist_dir: env_or("DIST_DIR", "dist"),
            public_hostname: env_opt("PUBLIC_HOSTNAME"),
            forward_number,
            twilio_account_sid: env_opt("TWILIO_ACCOUNT_SID"),
            twilio_auth_token,
            validate_signatures,
            stt_api_key,
            openai_api_key,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com")
                .trim_end_matches('/')
                .to_string(),
            resend_api_key,
            resend_base_url: env_or("RESEND_BASE_URL", "https://api.resend.com")
                .trim_end_matches('/')
                .to_string(),
            email_from: env_or("EMAIL_FROM", "TradeLine247 <voicemail@tradeline247ai.com>"),
            email_to,
            smtp_url,
            greeting_text: env_or(
                "GREETING_TEXT",
                "Thank you for calling TradeLine two four seven. Please hold while we connect you.",
            ),
            voicemail_prompt: env_or(
                "VOICEMAIL_PROMPT",
                "We are unable to take your call right now. Please leave a message after the tone.",
            ),
            business_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn degrades_when_nothing_is_configured() {
        for name in [
            "PORT",
            "FORWARD_NUMBER",
            "TWILIO_AUTH_TOKEN",
            "VALIDATE_TWILIO_SIGNATURE",
            "OPENAI_API_KEY",
            "STT_API_KEY",
            "BUSINESS_HOURS",
        ] {
            env::remove_var(name);
        }
        let config = AppConfig::from_env();
        assert_eq!(config.port, 5000);
        assert!(config.forward_number.is_none());
        // No auth token → nothing to validate against.
        assert!(!config.validate_signatures);
        assert!(config.stt_api_key.is_none());
        assert!(config.business_hours.is_none());
    }

    #[test]
    #[serial]
    fn forward_number_is_normalized() {
        env::set_var("FORWARD_NUMBER", "+1 (587) 555-0123");
        let config = AppConfig::from_env();
        env::remove_var("FORWARD_NUMBER");
        assert_eq!(config.forward_number.as_deref(), Some("+15875550123"));
    }

    #[test]
    #[serial]
    fn signature_toggle_overrides_token_presence() {
        env::set_var("TWILIO_AUTH_TOKEN", "token");
        env::set_var("VALIDATE_TWILIO_SIGNATURE", "off");
        let config = AppConfig::from_env();
        env::remove_var("TWILIO_AUTH_TOKEN");
        env::remove_var("VALIDATE_TWILIO_SIGNATURE");
        assert!(!config.validate_signatures);
    }

    #[test]
    #[serial]
    fn stt_key_falls_back_to_openai_key() {
        env::remove_var("STT_API_KEY");
        env::set_var("OPENAI_API_KEY", "sk-test");
        let config = AppConfig::from_env();
        env::remove_var("OPENAI_API_KEY");
        assert_eq!(config.stt_api_key.as_deref(), Some("sk-test"));
    }
}
