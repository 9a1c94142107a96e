//! Locale → synthesized-voice resolution for `<Say>`.
//!
//! Override layering, first match wins: the JSON override map from
//! `LOCALE_VOICE_OVERRIDES`, a per-locale `VOICE_<SLUG>_LANGUAGE` /
//! `VOICE_<SLUG>_VOICE` pair, the built-in table, then the en-US default.
//! Everything is read from the environment once at startup; `resolve` itself
//! is a pure lookup.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use tracing::warn;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VoiceProfile {
    pub language: String,
    pub voice: String,
    #[serde(default)]
    pub greeting: Option<String>,
}

impl VoiceProfile {
    fn new(language: &str, voice: &str) -> Self {
        Self {
            language: language.to_string(),
            voice: voice.to_string(),
            greeting: None,
        }
    }
}

impl Default for VoiceProfile {
    fn default() -> Self {
        VoiceProfile::new("en-US", "alice")
    }
}

/// Locales the hotline has real callers for; "alice" is the Twilio voice
/// that covers all of them.
const LOCALE_FALLBACK_VOICE: &[(&str, &str, &str)] = &[
    ("en-CA", "en-US", "alice"),
    ("en-US", "en-US", "alice"),
    ("fr-CA", "fr-CA", "alice"),
    ("zh-CN", "zh-CN", "alice"),
    ("fil-PH", "en-US", "alice"),
    ("hi-IN", "en-IN", "alice"),
    ("vi-VN", "vi-VN", "alice"),
    ("uk-UA", "uk-UA", "alice"),
];

/// Map Twilio's `FromCountry` onto a locale key of the table above.
pub fn locale_for_country(country: &str) -> &'static str {
    match country {
        "CA" => "en-CA",
        "US" => "en-US",
        "CN" => "zh-CN",
        "PH" => "fil-PH",
        "IN" => "hi-IN",
        "VN" => "vi-VN",
        "UA" => "uk-UA",
        // Canadian hotline: francophone callers get the fr-CA greeting.
        "FR" => "fr-CA",
        _ => "en-US",
    }
}

pub struct VoiceTable {
    overrides: HashMap<String, VoiceProfile>,
    env_pairs: HashMap<String, VoiceProfile>,
}

impl VoiceTable {
    pub fn new(
        overrides: HashMap<String, VoiceProfile>,
        env_pairs: HashMap<String, VoiceProfile>,
    ) -> Self {
        Self {
            overrides,
            env_pairs,
        }
    }

    /// Snapshot the environment overrides.  A malformed JSON map is ignored
    /// with a warning rather than taking the relay down.
    pub fn from_env() -> Self {
        let overrides = match env::var("LOCALE_VOICE_OVERRIDES") {
            Ok(raw) => match serde_json::from_str::<HashMap<String, VoiceProfile>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(error=%e, "ignoring unparseable LOCALE_VOICE_OVERRIDES");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        let mut env_pairs = HashMap::new();
        let known = LOCALE_FALLBACK_VOICE
            .iter()
            .map(|(locale, _, _)| locale.to_string())
            .chain(overrides.keys().cloned());
        for locale in known {
            // en-CA -> EN_CA
            let slug = locale.replace('-', "_").to_uppercase();
            let language = env::var(format!("VOICE_{slug}_LANGUAGE")).ok();
            let voice = env::var(format!("VOICE_{slug}_VOICE")).ok();
            if language.is_some() || voice.is_some() {
                let default = VoiceProfile::default();
                env_pairs.insert(
                    locale,
                    VoiceProfile {
                        language: language.unwrap_or(default.language),
                        voice: voice.unwrap_or(default.voice),
                        greeting: None,
                    },
                );
            }
        }

        Self::new(overrides, env_pairs)
    }

    pub fn resolve(&self, locale: &str) -> VoiceProfile {
        if let Some(profile) = self.overrides.get(locale) {
            return profile.clone();
        }
        if let Some(profile) = self.env_pairs.get(locale) {
            return profile.clone();
        }
        LOCALE_FALLBACK_VOICE
            .iter()
            .find(|(known, _, _)| *known == locale)
            .map(|(_, language, voice)| VoiceProfile::new(language, voice))
            .unwrap_or_default()
    }

    pub fn resolve_country(&self, country: &str) -> VoiceProfile {
        self.resolve(locale_for_country(country))
    }
}
