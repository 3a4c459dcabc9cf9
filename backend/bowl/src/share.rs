//! # Share Links
//!
//! Packs a [`Bowl`] into a token that fits in a URL fragment, and unpacks it again.
//!
//! ## Token
//!
//! `base64( percent-escape( json ) )`, standard alphabet with padding. Padding is optional when
//! reading, since chat clients like to eat a trailing `=`.
//!
//! ```json
//! { "v": 1, "r": "<menu id>", "c": { <8 limits> }, "p": { "<ingredient id>": <portion> }, "m": 0 }
//! ```
//!
//! - `v`: payload version, a missing `v` reads as 1 so links made before versioning still open
//! - `r`: selected menu
//! - `c`: every limit
//! - `p`: only non-zero portions, anything absent is zero
//! - `m`: strict minimums as 0/1
//!
//! ## Trust
//!
//! Decoding never fails loudly. A token that is not valid base64, not valid escaping, not JSON or
//! not an object simply yields nothing. A token that does decode is still untrusted: its menu,
//! ingredient ids and values are whatever the sender put there, and only
//! [`reconcile`](crate::reconcile::reconcile) decides what survives.
use std::{collections::BTreeMap, sync::LazyLock};

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    bowl::Bowl,
    nutrients::Nutrient,
    value::{compact_number, truthy},
};

pub const VERSION: u64 = 1;

const UNPADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Every `%` starts a two digit hex escape.
static ESCAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^%]|%[0-9A-Fa-f]{2})*$").unwrap());

#[derive(Serialize)]
struct Payload<'a> {
    v: u64,
    r: &'a str,
    c: BTreeMap<&'static str, Value>,
    p: BTreeMap<&'a str, Value>,
    m: u8,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    v: Option<Value>,
    #[serde(default)]
    r: Value,
    #[serde(default)]
    c: Value,
    #[serde(default)]
    p: Value,
    #[serde(default)]
    m: Value,
}

/// A decoded but unchecked bowl. Values are kept as they arrived.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SharedBowl {
    pub menu_id: Option<String>,
    pub constraints: BTreeMap<String, Value>,
    pub portions: BTreeMap<String, Value>,
    pub strict_min: bool,
}

pub fn encode(bowl: &Bowl) -> String {
    let payload = Payload {
        v: VERSION,
        r: &bowl.menu_id,
        c: Nutrient::ALL
            .into_iter()
            .map(|nutrient| (nutrient.key(), compact_number(bowl.constraints.limit(nutrient))))
            .collect(),
        p: bowl
            .portions
            .iter()
            .map(|(id, portion)| (id, compact_number(portion.factor())))
            .collect(),
        m: u8::from(bowl.strict_min),
    };

    // a map of strings and numbers always serializes
    let json = serde_json::to_string(&payload).unwrap_or_default();

    STANDARD.encode(urlencoding::encode(&json).as_bytes())
}

pub fn decode(token: &str) -> Option<SharedBowl> {
    let token = token.trim();
    let token = token.strip_prefix('#').unwrap_or(token);
    if token.is_empty() {
        return None;
    }

    let decoded = unpack(token);
    if decoded.is_none() {
        debug!("Ignoring unreadable share token");
    }

    decoded
}

fn unpack(token: &str) -> Option<SharedBowl> {
    let bytes = UNPADDED.decode(token).ok()?;
    let escaped = String::from_utf8(bytes).ok()?;
    if !ESCAPED.is_match(&escaped) {
        return None;
    }
    let json = urlencoding::decode(&escaped).ok()?;

    let value: Value = serde_json::from_str(&json).ok()?;
    if !value.is_object() {
        return None;
    }
    let raw: RawPayload = serde_json::from_value(value).ok()?;

    match raw.v {
        None => {}
        Some(version) if version.as_u64() == Some(VERSION) => {}
        Some(version) => {
            debug!("Unsupported share token version {version}");
            return None;
        }
    }

    Some(SharedBowl {
        menu_id: match raw.r {
            Value::String(id) => Some(id),
            _ => None,
        },
        constraints: into_map(raw.c),
        portions: into_map(raw.p),
        strict_min: truthy(&raw.m),
    })
}

fn into_map(value: Value) -> BTreeMap<String, Value> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    }
}
