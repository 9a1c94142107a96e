/// Reduce a phone number to canonical form: digits plus an optional leading
/// `+`.  Twilio already sends E.164, but forwarded numbers sometimes arrive
/// with spaces, dashes, or parentheses.
pub fn normalize_number(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii_digit() || (c == '+' && out.is_empty()) {
            out.push(c);
        }
    }
    out
}
