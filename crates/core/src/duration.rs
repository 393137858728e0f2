//! Duration literal grammar.
//!
//! A duration literal is an optional leading `-` followed by one or more
//! `(quantity)(unit)` pairs in strict descending unit order `d h m s ms`,
//! each unit at most once: `"1d2h3m4s5ms"`, `"3h5m"`, `"-10h"`. The literal
//! is normalized to a signed millisecond total; the original text is kept
//! for display and round-tripping. Two durations are equal when their
//! millisecond totals match, regardless of which unit combination produced
//! them — `"60s"` and `"1m"` are the same value with different text.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::DecodeError;

/// Unit suffixes with their millisecond factors, largest first.
/// Parsing enforces this order; rendering emits it.
const UNITS: [(&str, i64); 5] = [
    ("d", 86_400_000),
    ("h", 3_600_000),
    ("m", 60_000),
    ("s", 1_000),
    ("ms", 1),
];

/// A duration extension value: original literal text plus the normalized
/// signed millisecond total.
#[derive(Debug, Clone)]
pub struct Duration {
    text: String,
    total_ms: i64,
}

impl Duration {
    /// Parse a duration literal.
    ///
    /// Rejections: empty input, whitespace, a bare sign, a quantity without
    /// a unit, a unit without a quantity, units out of descending order,
    /// repeated units, per-component signs, non-integer quantities, trailing
    /// characters, and any accumulation step that overflows the signed
    /// 64-bit millisecond range.
    pub fn parse(text: &str) -> Result<Duration, DecodeError> {
        let reject = |message: &str| DecodeError::GrammarRejection {
            function: "duration".to_string(),
            literal: text.to_string(),
            message: message.to_string(),
        };

        let bytes = text.as_bytes();
        let mut pos = 0usize;

        let negative = bytes.first() == Some(&b'-');
        if negative {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(reject("expected at least one quantity-unit pair"));
        }

        let mut total_ms: i64 = 0;
        // Index into UNITS of the last unit consumed; components must move
        // strictly forward through the table.
        let mut next_unit = 0usize;
        let mut pairs = 0usize;

        while pos < bytes.len() {
            let digits_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == digits_start {
                return Err(reject("expected a quantity before the unit"));
            }

            let mut quantity: i64 = 0;
            for &b in &bytes[digits_start..pos] {
                quantity = quantity
                    .checked_mul(10)
                    .and_then(|q| q.checked_add((b - b'0') as i64))
                    .ok_or_else(|| DecodeError::Overflow {
                        literal: text.to_string(),
                    })?;
            }

            // `m` only counts as minutes when not followed by `s`.
            let unit_len = if bytes[pos..].starts_with(b"ms") { 2 } else { 1 };
            let unit = match text.get(pos..pos + unit_len) {
                Some(u) => u,
                None => return Err(reject("expected a unit after the quantity")),
            };
            pos += unit_len;

            let idx = match UNITS[next_unit..].iter().position(|(u, _)| *u == unit) {
                Some(offset) => next_unit + offset,
                None if UNITS.iter().any(|(u, _)| *u == unit) => {
                    return Err(reject("units must appear once, largest first"));
                }
                None => return Err(reject("unrecognized unit")),
            };
            next_unit = idx + 1;
            pairs += 1;

            let component = quantity.checked_mul(UNITS[idx].1).ok_or_else(|| {
                DecodeError::Overflow {
                    literal: text.to_string(),
                }
            })?;
            total_ms = total_ms
                .checked_add(component)
                .ok_or_else(|| DecodeError::Overflow {
                    literal: text.to_string(),
                })?;
        }

        debug_assert!(pairs > 0);
        if negative {
            total_ms = total_ms.checked_neg().ok_or_else(|| DecodeError::Overflow {
                literal: text.to_string(),
            })?;
        }

        Ok(Duration {
            text: text.to_string(),
            total_ms,
        })
    }

    /// Construct a duration from a millisecond total, rendering a canonical
    /// literal (largest units first, zero components omitted, `"0ms"` for
    /// zero).
    pub fn from_millis(total_ms: i64) -> Duration {
        if total_ms == 0 {
            return Duration {
                text: "0ms".to_string(),
                total_ms: 0,
            };
        }
        // i128 so the magnitude of i64::MIN renders without wrapping.
        let mut remaining = (total_ms as i128).unsigned_abs();
        let mut text = String::new();
        if total_ms < 0 {
            text.push('-');
        }
        for (unit, factor) in UNITS {
            let quantity = remaining / factor as u128;
            if quantity > 0 {
                text.push_str(&quantity.to_string());
                text.push_str(unit);
                remaining %= factor as u128;
            }
        }
        Duration { text, total_ms }
    }

    /// The normalized signed millisecond total.
    pub fn total_milliseconds(&self) -> i64 {
        self.total_ms
    }

    /// The original literal text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Render as a policy-language literal expression.
    pub fn to_expr(&self) -> String {
        format!("duration(\"{}\")", self.text)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Duration {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Duration::parse(s)
    }
}

// Equality, hashing and ordering are semantic: the normalized total, never
// the literal text.

impl PartialEq for Duration {
    fn eq(&self, other: &Duration) -> bool {
        self.total_ms == other.total_ms
    }
}

impl Eq for Duration {}

impl Hash for Duration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.total_ms.hash(state);
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Duration) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Duration) -> Ordering {
        self.total_ms.cmp(&other.total_ms)
    }
}
