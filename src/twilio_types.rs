pub fn wrap_twiml(twiml: String) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>{twiml}")
}

mod twiml {
    use xmlserde_derives::XmlSerialize;

    #[derive(PartialEq, Eq, XmlSerialize)]
    #[xmlserde(root = b"Response")]
    pub struct Response {
        #[xmlserde(ty = "untag")]
        pub actions: Vec<ResponseAction>,
    }

    #[derive(PartialEq, Eq, XmlSerialize)]
    pub enum ResponseAction {
        #[xmlserde(name = b"Say")]
        Say(SayAction),
        #[xmlserde(name = b"Dial")]
        Dial(DialAction),
        #[xmlserde(name = b"Record")]
        Record(RecordAction),
        #[xmlserde(name = b"Hangup")]
        Hangup(HangupAction),
    }

    #[derive(PartialEq, Eq, XmlSerialize, Default)]
    pub struct SayAction {
        #[xmlserde(ty = "text")]
        pub text: String,
        #[xmlserde(name = b"voice", ty = "attr")]
        pub voice: Option<String>,
        #[xmlserde(name = b"language", ty = "attr")]
        pub language: Option<String>,
    }

    /// Bridge the caller to another number.  The number is the element text;
    /// `action` receives the dial outcome callback.
    #[derive(PartialEq, Eq, XmlSerialize, Default)]
    pub struct DialAction {
        #[xmlserde(ty = "text")]
        pub number: String,
        #[xmlserde(name = b"action", ty = "attr")]
        pub action: Option<String>,
        #[xmlserde(name = b"timeout", ty = "attr")]
        pub timeout: Option<u16>,
        #[xmlserde(name = b"callerId", ty = "attr")]
        pub caller_id: Option<String>,
        #[xmlserde(name = b"record", ty = "attr")]
        pub record: Option<String>,
    }

    #[derive(PartialEq, Eq, XmlSerialize, Default)]
    pub struct RecordAction {
        #[xmlserde(ty = "text")]
        pub text: String,
        #[xmlserde(name = b"maxLength", ty = "attr")]
        pub max_length: Option<u16>,
        #[xmlserde(name = b"playBeep", ty = "attr")]
        pub play_beep: Option<String>,
        #[xmlserde(name = b"recordingStatusCallback", ty = "attr")]
        pub recording_status_callback: Option<String>,
    }

    #[derive(PartialEq, Eq, XmlSerialize, Default)]
    pub struct HangupAction {
        #[xmlserde(ty = "text")]
        pub text: String,
    }
}
pub use twiml::*;

mod webhook {
    use serde::{Deserialize, Serialize};

    /// Dial outcome as reported in the `<Dial action>` callback.
    #[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[serde(rename_all = "kebab-case")]
    pub enum DialCallStatus {
        Completed,
        Answered,
        Busy,
        NoAnswer,
        Failed,
        Canceled,
        #[default]
        #[serde(other)]
        Unknown,
    }

    impl DialCallStatus {
        /// Whether the bridged leg was actually picked up.
        pub fn connected(self) -> bool {
            matches!(self, DialCallStatus::Completed | DialCallStatus::Answered)
        }
    }

    /// Inbound call notification.  Twilio omits fields freely, so everything
    /// defaults to empty rather than failing deserialization.
    #[derive(Deserialize, Clone, Debug, Default)]
    #[serde(rename_all = "PascalCase", default)]
    pub struct VoicePayload {
        pub call_sid: String,
        pub from: String,
        pub to: String,
        pub forwarded_from: String,
        pub from_country: String,
    }

    #[derive(Deserialize, Clone, Debug, Default)]
    #[serde(rename_all = "PascalCase", default)]
    pub struct DialOutcomePayload {
        pub call_sid: String,
        pub from: String,
        pub to: String,
        pub from_country: String,
        pub dial_call_status: DialCallStatus,
        /// Seconds as decimal text; empty when Twilio omits it.
        pub dial_call_duration: String,
    }

    #[derive(Deserialize, Clone, Debug, Default)]
    #[serde(rename_all = "PascalCase", default)]
    pub struct RecordingPayload {
        pub call_sid: String,
        pub recording_sid: String,
        pub recording_url: String,
        /// Seconds as decimal text; empty when Twilio omits it.
        pub recording_duration: String,
        pub from: String,
        pub to: String,
    }
}
pub use webhook::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_say_and_dial() {
        let response = Response {
            actions: vec![
                ResponseAction::Say(SayAction {
                    text: "Connecting you now.".to_string(),
                    voice: Some("alice".to_string()),
                    language: Some("en-CA".to_string()),
                }),
                ResponseAction::Dial(DialAction {
                    number: "+15875550123".to_string(),
                    action: Some("/voice/after-dial".to_string()),
                    timeout: Some(25),
                    caller_id: Some("+15877428885".to_string()),
                    record: Some("record-from-answer-dual".to_string()),
                }),
            ],
        };
        let twiml = wrap_twiml(xmlserde::xml_serialize(response));
        assert!(twiml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(twiml.contains("<Say"));
        assert!(twiml.contains("voice=\"alice\""));
        assert!(twiml.contains("language=\"en-CA\""));
        assert!(twiml.contains("Connecting you now."));
        assert!(twiml.contains("<Dial"));
        assert!(twiml.contains("timeout=\"25\""));
        assert!(twiml.contains("record=\"record-from-answer-dual\""));
        assert!(twiml.contains("+15875550123"));
    }

    #[test]
    fn serializes_record_with_callback() {
        let response = Response {
            actions: vec![ResponseAction::Record(RecordAction {
                max_length: Some(120),
                play_beep: Some("true".to_string()),
                recording_status_callback: Some("/voice/recording-status".to_string()),
                ..Default::default()
            })],
        };
        let twiml = xmlserde::xml_serialize(response);
        assert!(twiml.contains("<Record"));
        assert!(twiml.contains("maxLength=\"120\""));
        assert!(twiml.contains("recordingStatusCallback=\"/voice/recording-status\""));
    }

    #[test]
    fn empty_response_is_valid_twiml() {
        let twiml = xmlserde::xml_serialize(Response { actions: vec![] });
        assert!(twiml.contains("Response"));
        assert!(!twiml.contains("<Say"));
    }

    #[test]
    fn parses_dial_outcome_form() {
        let payload: DialOutcomePayload = serde_urlencoded::from_str(
            "CallSid=CA123&DialCallStatus=no-answer&DialCallDuration=0&From=%2B15551234567",
        )
        .unwrap();
        assert_eq!(payload.dial_call_status, DialCallStatus::NoAnswer);
        assert_eq!(payload.from, "+15551234567");
        assert_eq!(payload.to, "");
    }

    #[test]
    fn unknown_dial_status_does_not_fail() {
        let payload: DialOutcomePayload =
            serde_urlencoded::from_str("DialCallStatus=some-new-status").unwrap();
        assert_eq!(payload.dial_call_status, DialCallStatus::Unknown);
        assert!(!payload.dial_call_status.connected());
    }
}
