//! warrant-core: the policy value model and its JSON codec.
//!
//! Converts between a typed, recursive [`Value`] graph and its escaped JSON
//! wire representation, including the entity-reference (`__entity`) and
//! extension-value (`__extn`) escapes and the bespoke grammars for the two
//! temporal extension kinds.
//!
//! # Public API
//!
//! Key types and entry points are re-exported at the crate root:
//!
//! - [`Value`], [`EntityUid`], [`EntityTypeName`] -- the value model
//! - [`DateTime`], [`Duration`] -- temporal extension values
//! - [`decode_value`] / [`encode_value`] -- the value JSON codec
//! - [`Entity`], [`decode_entity`], [`encode_entity`],
//!   [`decode_entities`], [`encode_entities`] -- entity containers
//! - [`DecodeError`] -- decode error kinds
//!
//! Everything here is a pure, synchronous function over immutable inputs:
//! no I/O, no shared state, safe to use from any number of threads. The
//! one caller obligation is input nesting, which the decoder bounds itself
//! (see [`MAX_DEPTH`]).

pub mod datetime;
pub mod deserialize;
pub mod duration;
pub mod entity;
pub mod error;
pub mod serialize;
pub mod value;

mod extension;

// ── Convenience re-exports ───────────────────────────────────────────

pub use datetime::DateTime;
pub use deserialize::{decode_value, ENTITY_ESCAPE, EXTENSION_ESCAPE, MAX_DEPTH};
pub use duration::Duration;
pub use entity::{decode_entities, decode_entity, encode_entities, encode_entity, Entity};
pub use error::DecodeError;
pub use serialize::encode_value;
pub use value::{EntityTypeName, EntityUid, Value};
