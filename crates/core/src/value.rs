//! The policy value model.
//!
//! [`Value`] is the closed, recursive union of everything a policy
//! evaluator exchanges over the JSON wire: primitives, entity references,
//! lists, attribute records, and the extension kinds (ip, decimal,
//! datetime, duration, unknown, offset). All of these are immutable value
//! types: constructed once, never mutated, owned by value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::datetime::DateTime;
use crate::duration::Duration;
use crate::error::DecodeError;

/// A fully-qualified entity type name: an optional `::`-separated namespace
/// path plus a basename, e.g. `PhotoApp::Album` or `User`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityTypeName {
    components: Vec<String>,
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl EntityTypeName {
    /// Parse a `::`-separated type name. Every component must be a
    /// non-empty identifier and at least one component must be present.
    pub fn parse(text: &str) -> Result<EntityTypeName, DecodeError> {
        let components: Vec<String> = text.split("::").map(str::to_string).collect();
        if components.iter().any(|c| !is_identifier(c)) {
            return Err(DecodeError::MalformedShape {
                message: format!("invalid entity type name '{}'", text),
            });
        }
        Ok(EntityTypeName { components })
    }

    /// The namespace components, outermost first (empty for an
    /// unqualified name).
    pub fn namespace_components(&self) -> &[String] {
        &self.components[..self.components.len() - 1]
    }

    /// The base name, without the namespace.
    pub fn basename(&self) -> &str {
        self.components.last().expect("at least one component")
    }
}

impl fmt::Display for EntityTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("::"))
    }
}

impl FromStr for EntityTypeName {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityTypeName::parse(s)
    }
}

/// A reference to a policy entity: type name plus opaque id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityUid {
    type_name: EntityTypeName,
    id: String,
}

impl EntityUid {
    pub fn new(type_name: EntityTypeName, id: impl Into<String>) -> EntityUid {
        EntityUid {
            type_name,
            id: id.into(),
        }
    }

    pub fn type_name(&self) -> &EntityTypeName {
        &self.type_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for EntityUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, quote(&self.id))
    }
}

/// Quote a string as a policy-language string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A policy value.
///
/// Records are keyed maps with unique keys; insertion order is irrelevant
/// for equality. Equality on the temporal variants is semantic (see
/// [`DateTime`] and [`Duration`]); everything else is structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Long(i64),
    String(String),
    /// A reference to a policy entity.
    Entity(EntityUid),
    /// Ordered, heterogeneous.
    List(Vec<Value>),
    /// Unordered attribute record.
    Record(BTreeMap<String, Value>),
    /// Opaque IP address/CIDR literal; the canonical text is authoritative.
    Ip(String),
    /// Opaque fixed-point decimal literal; the canonical text is
    /// authoritative.
    Decimal(String),
    DateTime(DateTime),
    Duration(Duration),
    /// Placeholder for a partially-evaluated value.
    Unknown(String),
    /// The deferred `datetime.offset(duration)` application. Construction
    /// and round-trip only — no arithmetic is performed here.
    Offset {
        datetime: DateTime,
        duration: Duration,
    },
}

impl Value {
    /// Human-readable variant name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Long(_) => "Long",
            Value::String(_) => "String",
            Value::Entity(_) => "Entity",
            Value::List(_) => "List",
            Value::Record(_) => "Record",
            Value::Ip(_) => "Ip",
            Value::Decimal(_) => "Decimal",
            Value::DateTime(_) => "DateTime",
            Value::Duration(_) => "Duration",
            Value::Unknown(_) => "Unknown",
            Value::Offset { .. } => "Offset",
        }
    }

    /// Render as a policy-language literal expression.
    ///
    /// Extension values wrap their original literal text in the matching
    /// constructor call; entity references render as `Type::"id"`.
    pub fn to_expr(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Long(n) => n.to_string(),
            Value::String(s) => quote(s),
            Value::Entity(uid) => uid.to_string(),
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::to_expr).collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Record(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), v.to_expr()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Value::Ip(text) => format!("ip({})", quote(text)),
            Value::Decimal(text) => format!("decimal({})", quote(text)),
            Value::DateTime(dt) => dt.to_expr(),
            Value::Duration(d) => d.to_expr(),
            Value::Unknown(tag) => format!("unknown({})", quote(tag)),
            Value::Offset { datetime, duration } => {
                format!("{}.offset({})", datetime.to_expr(), duration.to_expr())
            }
        }
    }
}
