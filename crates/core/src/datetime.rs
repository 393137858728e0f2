//! Calendar date-time literal grammar.
//!
//! Accepted forms (ISO-8601-like, no other punctuation):
//!
//! - `YYYY-MM-DD` (date only)
//! - `YYYY-MM-DDTHH:MM:SSZ`
//! - `YYYY-MM-DDTHH:MM:SS.mmmZ` (exactly three fraction digits)
//! - `YYYY-MM-DDTHH:MM:SS±HHMM`
//! - `YYYY-MM-DDTHH:MM:SS.mmm±HHMM`
//!
//! The shape is validated byte-for-byte (fixed-width fields, upper-case
//! `T`/`Z`, four-digit zone offset with component-wise bounds), then the
//! calendar fields go through the `time` crate for leap-year and
//! day-of-month validation, and the whole literal is normalized to an
//! absolute instant in epoch milliseconds. The original text is preserved:
//! distinct offset spellings of the same instant are equal values with
//! different display forms.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use time::{Date, Month, PrimitiveDateTime, Time};

use crate::error::DecodeError;

/// A datetime extension value: original literal text, the offset-normalized
/// instant in epoch milliseconds, and the textual precision markers used
/// for equality and round-tripping.
#[derive(Debug, Clone)]
pub struct DateTime {
    text: String,
    epoch_millis: i64,
    has_time: bool,
    has_millis: bool,
}

fn two_digits(bytes: &[u8], at: usize) -> Option<u32> {
    let a = bytes.get(at)?;
    let b = bytes.get(at + 1)?;
    if a.is_ascii_digit() && b.is_ascii_digit() {
        Some(((a - b'0') as u32) * 10 + (b - b'0') as u32)
    } else {
        None
    }
}

impl DateTime {
    /// Parse a datetime literal, validating shape, calendar and zone.
    pub fn parse(text: &str) -> Result<DateTime, DecodeError> {
        let reject = |message: &str| DecodeError::GrammarRejection {
            function: "datetime".to_string(),
            literal: text.to_string(),
            message: message.to_string(),
        };

        let bytes = text.as_bytes();
        if bytes.len() < 10 {
            return Err(reject("expected YYYY-MM-DD"));
        }

        // Date part, fixed width.
        if !bytes[0..4].iter().all(u8::is_ascii_digit)
            || bytes[4] != b'-'
            || bytes[7] != b'-'
        {
            return Err(reject("expected YYYY-MM-DD"));
        }
        let year: i32 = bytes[0..4]
            .iter()
            .fold(0i32, |acc, b| acc * 10 + (b - b'0') as i32);
        let month = two_digits(bytes, 5).ok_or_else(|| reject("expected YYYY-MM-DD"))?;
        let day = two_digits(bytes, 8).ok_or_else(|| reject("expected YYYY-MM-DD"))?;

        if year == 0 {
            return Err(reject("year must be in 0001..=9999"));
        }
        let month = u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| reject("month must be in 01..=12"))?;
        let date = Date::from_calendar_date(year, month, day as u8)
            .map_err(|_| reject("day is out of range for the month"))?;

        let mut has_time = false;
        let mut has_millis = false;
        let (mut hour, mut minute, mut second, mut millis) = (0u32, 0u32, 0u32, 0u32);
        let mut offset_minutes: i64 = 0;

        if bytes.len() > 10 {
            // The `T` marker commits the input to the full date-time form.
            if bytes[10] != b'T' {
                return Err(reject("expected 'T' between date and time"));
            }
            has_time = true;

            if bytes.len() < 20 || bytes[13] != b':' || bytes[16] != b':' {
                return Err(reject("expected HH:MM:SS after 'T'"));
            }
            hour = two_digits(bytes, 11).ok_or_else(|| reject("expected HH:MM:SS after 'T'"))?;
            minute = two_digits(bytes, 14).ok_or_else(|| reject("expected HH:MM:SS after 'T'"))?;
            second = two_digits(bytes, 17).ok_or_else(|| reject("expected HH:MM:SS after 'T'"))?;

            if hour > 23 {
                return Err(reject("hour must be in 00..=23"));
            }
            if minute > 59 {
                return Err(reject("minute must be in 00..=59"));
            }
            if second > 59 {
                // No leap seconds.
                return Err(reject("second must be in 00..=59"));
            }

            let mut pos = 19;
            if bytes.get(pos) == Some(&b'.') {
                let frac = &bytes[pos + 1..];
                if frac.len() < 3 || !frac[..3].iter().all(u8::is_ascii_digit) {
                    return Err(reject("fractional seconds must be exactly three digits"));
                }
                if frac.get(3).is_some_and(u8::is_ascii_digit) {
                    return Err(reject("fractional seconds must be exactly three digits"));
                }
                millis = frac[..3]
                    .iter()
                    .fold(0u32, |acc, b| acc * 10 + (b - b'0') as u32);
                has_millis = true;
                pos += 4;
            }

            match bytes.get(pos).copied() {
                Some(b'Z') => {
                    if pos + 1 != bytes.len() {
                        return Err(reject("trailing characters after 'Z'"));
                    }
                }
                Some(sign @ (b'+' | b'-')) => {
                    if pos + 5 != bytes.len() {
                        return Err(reject("zone offset must be exactly four digits"));
                    }
                    let oh = two_digits(bytes, pos + 1)
                        .ok_or_else(|| reject("zone offset must be exactly four digits"))?;
                    let om = two_digits(bytes, pos + 3)
                        .ok_or_else(|| reject("zone offset must be exactly four digits"))?;
                    // Component-wise bounds, not a combined-minutes bound.
                    if oh > 23 {
                        return Err(reject("zone offset hours must be in 00..=23"));
                    }
                    if om > 59 {
                        return Err(reject("zone offset minutes must be in 00..=59"));
                    }
                    offset_minutes = (oh * 60 + om) as i64;
                    if sign == b'-' {
                        offset_minutes = -offset_minutes;
                    }
                }
                _ => return Err(reject("expected 'Z' or a signed four-digit zone offset")),
            }
        }

        let clock = Time::from_hms_milli(hour as u8, minute as u8, second as u8, millis as u16)
            .map_err(|_| reject("time component out of range"))?;
        let utc_seconds = PrimitiveDateTime::new(date, clock)
            .assume_utc()
            .unix_timestamp();
        // Subtract the offset to reach UTC.
        let epoch_millis = utc_seconds * 1_000 + millis as i64 - offset_minutes * 60_000;

        Ok(DateTime {
            text: text.to_string(),
            epoch_millis,
            has_time,
            has_millis,
        })
    }

    /// The offset-normalized instant in milliseconds since the Unix epoch
    /// (negative for pre-epoch dates).
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    /// Whether the literal carried a time-of-day component.
    pub fn has_time(&self) -> bool {
        self.has_time
    }

    /// Whether the literal carried a millisecond fraction.
    pub fn has_millis(&self) -> bool {
        self.has_millis
    }

    /// The original literal text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Render as a policy-language literal expression, wrapping the original
    /// text rather than re-serializing from the normalized instant.
    pub fn to_expr(&self) -> String {
        format!("datetime(\"{}\")", self.text)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for DateTime {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse(s)
    }
}

// Equality is semantic: the same absolute instant at the same declared
// millisecond precision. The offset spelling and the date-only/full form do
// not participate.

impl PartialEq for DateTime {
    fn eq(&self, other: &DateTime) -> bool {
        self.epoch_millis == other.epoch_millis && self.has_millis == other.has_millis
    }
}

impl Eq for DateTime {}

impl Hash for DateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch_millis.hash(state);
        self.has_millis.hash(state);
    }
}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &DateTime) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateTime {
    fn cmp(&self, other: &DateTime) -> Ordering {
        // Instant first; the precision marker is only a tie-break so that
        // the ordering stays consistent with equality.
        self.epoch_millis
            .cmp(&other.epoch_millis)
            .then_with(|| self.has_millis.cmp(&other.has_millis))
    }
}
