//! Twilio webhook signature validation.
//!
//! Twilio signs each webhook with HMAC-SHA1 over the full request URL
//! followed by the form parameters sorted by key, base64-encoded into the
//! `X-Twilio-Signature` header.  The comparison is constant-time.

use base64::{engine, Engine};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// Compute the signature Twilio would send for `url` and `params`.
pub fn expected_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut mac =
        HmacSha1::new_from_slice(auth_token.as_bytes()).expect("HMAC accepts any key length");
    mac.update(url.as_bytes());
    for (k, v) in sorted {
        mac.update(k.as_bytes());
        mac.update(v.as_bytes());
    }
    engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Validate a provided `X-Twilio-Signature` value against the reconstructed
/// request URL and decoded form body.
pub fn validate(auth_token: &str, url: &str, params: &[(String, String)], provided: &str) -> bool {
    let expected = expected_signature(auth_token, url, params);
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn round_trips_a_signed_request() {
        let token = "12345";
        let url = "https://www.tradeline247ai.com/voice/answer";
        let body = params(&[("From", "+15551234567"), ("To", "+15877428885")]);
        let sig = expected_signature(token, url, &body);
        assert!(validate(token, url, &body, &sig));
    }

    #[test]
    fn rejects_a_tampered_body() {
        let token = "12345";
        let url = "https://www.tradeline247ai.com/voice/answer";
        let body = params(&[("From", "+15551234567"), ("To", "+15877428885")]);
        let sig = expected_signature(token, url, &body);
        let tampered = params(&[("From", "+15550000000"), ("To", "+15877428885")]);
        assert!(!validate(token, url, &tampered, &sig));
        assert!(!validate(token, url, &body, "invalid"));
    }

    #[test]
    fn parameter_order_does_not_matter() {
        let token = "12345";
        let url = "https://www.tradeline247ai.com/voice/answer";
        let a = params(&[("To", "+15877428885"), ("From", "+15551234567")]);
        let b = params(&[("From", "+15551234567"), ("To", "+15877428885")]);
        assert_eq!(
            expected_signature(token, url, &a),
            expected_signature(token, url, &b)
        );
    }
}
