//! Extension-value codec: the `__extn` escape.
//!
//! Single-arg functions (`ip`, `decimal`, `datetime`, `duration`,
//! `unknown`) carry a string `arg`; the one binary function (`offset`)
//! carries an `args` array of exactly two elements — a datetime extension
//! node and a duration extension node. That `arg`/`args` asymmetry is part
//! of the wire contract.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::datetime::DateTime;
use crate::deserialize::decode_at;
use crate::duration::Duration;
use crate::error::DecodeError;
use crate::value::Value;

/// Decode the payload of an `__extn` escape into a value.
///
/// `depth` is the nesting depth of the enclosing escape object; the
/// `offset` arguments recurse through the general decoder one level down.
pub(crate) fn decode_extension(
    payload: &serde_json::Value,
    depth: usize,
) -> Result<Value, DecodeError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "__extn payload must be an object".to_string(),
        })?;
    let function = obj
        .get("fn")
        .and_then(|f| f.as_str())
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "__extn payload missing string 'fn' field".to_string(),
        })?;

    if function == "offset" {
        return decode_offset(obj, depth);
    }

    let arg = obj
        .get("arg")
        .and_then(|a| a.as_str())
        .ok_or_else(|| DecodeError::MalformedShape {
            message: format!("extension function '{}' requires a string 'arg'", function),
        })?;

    match function {
        "ip" => {
            check_ip(arg)?;
            Ok(Value::Ip(arg.to_string()))
        }
        "decimal" => {
            check_decimal(arg)?;
            Ok(Value::Decimal(arg.to_string()))
        }
        "datetime" => Ok(Value::DateTime(DateTime::parse(arg)?)),
        "duration" => Ok(Value::Duration(Duration::parse(arg)?)),
        "unknown" => Ok(Value::Unknown(arg.to_string())),
        other => Err(DecodeError::UnknownFunction {
            function: other.to_string(),
        }),
    }
}

fn decode_offset(
    obj: &serde_json::Map<String, serde_json::Value>,
    depth: usize,
) -> Result<Value, DecodeError> {
    let args = obj
        .get("args")
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "extension function 'offset' requires an 'args' array".to_string(),
        })?
        .as_array()
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "'offset' 'args' must be an array".to_string(),
        })?;
    if args.len() != 2 {
        return Err(DecodeError::ArityMismatch {
            function: "offset".to_string(),
            expected: 2,
            got: args.len(),
        });
    }

    let datetime = match decode_at(&args[0], depth + 1)? {
        Value::DateTime(dt) => dt,
        other => {
            return Err(DecodeError::ArgumentType {
                function: "offset".to_string(),
                index: 0,
                expected: "DateTime".to_string(),
                got: other.type_name().to_string(),
            })
        }
    };
    let duration = match decode_at(&args[1], depth + 1)? {
        Value::Duration(d) => d,
        other => {
            return Err(DecodeError::ArgumentType {
                function: "offset".to_string(),
                index: 1,
                expected: "Duration".to_string(),
                got: other.type_name().to_string(),
            })
        }
    };

    Ok(Value::Offset { datetime, duration })
}

/// Build a single-arg `{"__extn": {"fn": …, "arg": …}}` node.
pub(crate) fn extension_node(function: &str, arg: &str) -> serde_json::Value {
    serde_json::json!({ "__extn": { "fn": function, "arg": arg } })
}

/// Basic well-formedness for an `ip` literal: an IPv4 or IPv6 address with
/// an optional `/prefix` suffix. v4 and v6 syntax must not mix. Anything
/// deeper is left to the engine.
fn check_ip(text: &str) -> Result<(), DecodeError> {
    let reject = |message: &str| DecodeError::GrammarRejection {
        function: "ip".to_string(),
        literal: text.to_string(),
        message: message.to_string(),
    };

    let (addr, prefix) = match text.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (text, None),
    };

    let max_prefix = if addr.contains(':') {
        if addr.contains('.') {
            return Err(reject("mixed IPv4/IPv6 syntax is not allowed"));
        }
        Ipv6Addr::from_str(addr).map_err(|_| reject("not a valid IPv6 address"))?;
        128u32
    } else {
        Ipv4Addr::from_str(addr).map_err(|_| reject("not a valid IPv4 address"))?;
        32u32
    };

    if let Some(prefix) = prefix {
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(reject("CIDR prefix must be a decimal number"));
        }
        let bits: u32 = prefix
            .parse()
            .map_err(|_| reject("CIDR prefix must be a decimal number"))?;
        if bits > max_prefix {
            return Err(reject("CIDR prefix out of range"));
        }
    }
    Ok(())
}

/// Basic well-formedness for a `decimal` literal: optional sign, integer
/// digits, a mandatory point, one to four fraction digits, at most 21
/// characters overall. The canonical text stays authoritative.
fn check_decimal(text: &str) -> Result<(), DecodeError> {
    let reject = |message: &str| DecodeError::GrammarRejection {
        function: "decimal".to_string(),
        literal: text.to_string(),
        message: message.to_string(),
    };

    if text.len() > 21 {
        return Err(reject("too long"));
    }
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .ok_or_else(|| reject("missing decimal point"))?;
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(reject("expected digits before the decimal point"));
    }
    if frac_part.is_empty() || frac_part.len() > 4 || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(reject("expected one to four fraction digits"));
    }
    // Final numeric check through the decimal library (catches e.g. a
    // second point having slipped past the split).
    rust_decimal::Decimal::from_str(text).map_err(|_| reject("not a valid decimal"))?;
    Ok(())
}
