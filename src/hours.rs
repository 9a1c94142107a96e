//! Optional business-hours window.
//!
//! Configured as `BUSINESS_HOURS="09:00-17:00"` plus a fixed UTC offset
//! (`BUSINESS_HOURS_UTC_OFFSET="-06:00"`).  Feature is off when the span is
//! absent or unparseable.  Same-day spans only; overnight windows can come
//! later if the hotline ever needs them.

use time::{OffsetDateTime, Time, UtcOffset};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoursWindow {
    start: Time,
    end: Time,
    offset: UtcOffset,
}

impl HoursWindow {
    /// Parse `"HH:MM-HH:MM"` and an offset like `-06:00` or `+05:30`.
    pub fn parse(span: &str, offset: &str) -> Option<Self> {
        let (start, end) = span.trim().split_once('-')?;
        Some(Self {
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
            offset: parse_offset(offset)?,
        })
    }

    pub fn is_closed(&self, now_utc: OffsetDateTime) -> bool {
        let local = now_utc.to_offset(self.offset).time();
        !(local >= self.start && local <= self.end)
    }

    pub fn is_closed_now(&self) -> bool {
        self.is_closed(OffsetDateTime::now_utc())
    }
}

fn parse_hhmm(s: &str) -> Option<Time> {
    let (h, m) = s.trim().split_once(':')?;
    Time::from_hms(h.parse().ok()?, m.parse().ok()?, 0).ok()
}

fn parse_offset(s: &str) -> Option<UtcOffset> {
    let s = s.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1i8, rest),
        None => (1i8, s.strip_prefix('+').unwrap_or(s)),
    };
    let (h, m) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i8 = h.parse().ok()?;
    let minutes: i8 = m.parse().ok()?;
    UtcOffset::from_hms(sign * hours, sign * minutes, 0).ok()
}
