//! Parsing of structured (JSON) generation output.
//!
//! Every structured agent goes through these helpers so that malformed
//! output is handled in one place: `parse_structured` reports a
//! [`AgentError::ParseFailure`], `parse_or_default` and `parse_list` log it
//! and hand back the caller's default.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::errors::{AgentError, AgentResult};

/// Slice of `raw` holding the JSON document.
///
/// A markdown code fence wins when one is present, so prose before it may
/// contain brackets of its own. Otherwise the first `{`/`[` through the last
/// matching closer is taken.
pub fn extract_json(raw: &str) -> Option<&str> {
    fenced_block(raw)
        .and_then(bracketed)
        .or_else(|| bracketed(raw))
}

fn fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let after_ticks = &raw[open + 3..];
    // Skip the info string (`json`, `JSON`, ...) up to the end of the line.
    let body_start = after_ticks.find('\n').map_or(0, |i| i + 1);
    let body = &after_ticks[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn bracketed(raw: &str) -> Option<&str> {
    let start = raw.find(['{', '['])?;
    let closing = if raw[start..].starts_with('{') { '}' } else { ']' };
    let end = raw.rfind(closing)?;
    (end > start).then(|| &raw[start..=end])
}

/// Parse `raw` into `T`.
pub fn parse_structured<T: DeserializeOwned>(agent: &'static str, raw: &str) -> AgentResult<T> {
    let json = extract_json(raw).ok_or_else(|| AgentError::ParseFailure {
        agent,
        reason: "no JSON document in output".to_string(),
    })?;

    serde_json::from_str(json).map_err(|e| AgentError::ParseFailure {
        agent,
        reason: e.to_string(),
    })
}

/// Parse and validate `raw`, substituting `default` on any failure.
pub fn parse_or_default<T, V>(agent: &'static str, raw: &str, validate: V, default: T) -> T
where
    T: DeserializeOwned,
    V: FnOnce(&T) -> Result<(), String>,
{
    let parsed = parse_structured::<T>(agent, raw).and_then(|value| {
        validate(&value)
            .map(|()| value)
            .map_err(|reason| AgentError::ParseFailure { agent, reason })
    });

    match parsed {
        Ok(value) => value,
        Err(err) => {
            warn!(agent, error = %err, "structured output rejected; using default");
            default
        }
    }
}

/// Parse a JSON list of `T`, all-or-nothing.
///
/// A top-level object with exactly one array field (`{"posts": [...]}`) is
/// unwrapped first. If any element fails to deserialize or validate, the
/// whole list is discarded and an empty one returned.
pub fn parse_list<T, V>(agent: &'static str, raw: &str, validate_item: V) -> Vec<T>
where
    T: DeserializeOwned,
    V: Fn(&T) -> Result<(), String>,
{
    let value = match parse_structured::<Value>(agent, raw) {
        Ok(value) => unwrap_single_array(value),
        Err(err) => {
            warn!(agent, error = %err, "structured output rejected; using empty list");
            return Vec::new();
        }
    };

    let items: Vec<T> = match serde_json::from_value(value) {
        Ok(items) => items,
        Err(err) => {
            warn!(agent, error = %err, "structured list has invalid shape; using empty list");
            return Vec::new();
        }
    };

    for (index, item) in items.iter().enumerate() {
        if let Err(reason) = validate_item(item) {
            warn!(agent, index, reason = %reason, "structured list item invalid; using empty list");
            return Vec::new();
        }
    }
    items
}

fn unwrap_single_array(value: Value) -> Value {
    match value {
        Value::Object(map) if map.len() == 1 => {
            let (key, inner) = map.into_iter().next().unwrap_or_default();
            if inner.is_array() {
                inner
            } else {
                Value::Object(std::iter::once((key, inner)).collect())
            }
        }
        other => other,
    }
}

/// Validation helper: `field` must not be blank.
pub fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is empty"))
    } else {
        Ok(())
    }
}
