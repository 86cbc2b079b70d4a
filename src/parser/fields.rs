//! Field extraction over PokeAPI payloads.
//!
//! Every lookup is a get-with-default: an absent or mistyped field yields
//! `None` (or the caller's sentinel) instead of an error.

use serde_json::Value;

/// Language code kept when flattening localized lists
pub const LOCALE: &str = "en";

/// Sentinel text for missing localized descriptions
pub const NO_DESCRIPTION: &str = "No description.";

/// Sentinel for "no value in this slot" numeric fields
pub const ABSENT: i64 = -1;

/// Stand-in for an absent sub-object, so lookups on it all miss
pub static NULL: Value = Value::Null;

/// Extract the trailing numeric id from a resource URL.
///
/// `https://pokeapi.co/api/v2/ability/65/` and `.../ability/65` both yield 65.
pub fn url_index(url: &str) -> Option<i64> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Id of a linked resource: `payload[key].url`
pub fn resource_id(payload: &Value, key: &str) -> Option<i64> {
    payload.get(key)?.get("url")?.as_str().and_then(url_index)
}

pub fn int(payload: &Value, key: &str) -> Option<i64> {
    payload.get(key)?.as_i64()
}

pub fn text(payload: &Value, key: &str) -> Option<String> {
    payload.get(key)?.as_str().map(str::to_string)
}

/// Boolean flag, absent means false
pub fn flag(payload: &Value, key: &str) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Name of a linked resource: `payload[key].name`
pub fn named(payload: &Value, key: &str) -> Option<String> {
    payload.get(key)?.get("name")?.as_str().map(str::to_string)
}

/// Elements of an array field, empty when absent
pub fn list<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First entry of `payload[key]` whose `language.name` is the kept locale
pub fn localized<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    list(payload, key).iter().find(|entry| {
        entry
            .get("language")
            .and_then(|lang| lang.get("name"))
            .and_then(Value::as_str)
            == Some(LOCALE)
    })
}

/// Localized string `payload[key][en][field]`
pub fn localized_text(payload: &Value, key: &str, field: &str) -> Option<String> {
    localized(payload, key).and_then(|entry| text(entry, field))
}

/// English display name, falling back to the payload's own `name`
pub fn display_name(payload: &Value) -> Option<String> {
    localized_text(payload, "names", "name").or_else(|| text(payload, "name"))
}

/// English flavor text, or the "No description." sentinel
pub fn description(payload: &Value) -> String {
    localized_text(payload, "flavor_text_entries", "flavor_text")
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}
