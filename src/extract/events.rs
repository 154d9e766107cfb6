// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Event-based classification used by the reverse index.
//!
//! These classifications widen discovery only; they never become ordering
//! edges. A trigger "detects" a custom event when its filter compares the
//! reserved `{{_event}}` marker against a literal name. A tag "emits" an
//! event when its inline script pushes one with a literal name, or when its
//! template type has a statically trusted mapping.

use crate::model::{Entity, EntityKind};
use serde_json::Value;

/// Left-hand operand that marks a custom-event comparison.
const EVENT_MARKER: &str = "{{_event}}";
/// Trigger type that listens for data-layer events.
const CUSTOM_EVENT_TRIGGER_TYPE: &str = "customEvent";
/// Inline-script tag type.
const HTML_TAG_TYPE: &str = "html";

/// Template types whose emitted event is known ahead of time. Custom
/// template code is opaque and cannot be statically analyzed, so only
/// pre-registered mappings are trusted.
const TEMPLATE_EVENT_TABLE: &[(&str, &str)] = &[
    ("cvt_cookiebot_banner", "cookie_consent_update"),
    ("cvt_klaviyo_signup", "klaviyo_form_submit"),
];

/// The custom event a trigger listens for, if it is a custom-event trigger
/// with a literal event-name comparison.
pub fn detected_custom_event(entity: &Entity) -> Option<String> {
    if entity.kind != EntityKind::Trigger || entity.subtype() != Some(CUSTOM_EVENT_TRIGGER_TYPE) {
        return None;
    }
    for field in ["customEventFilter", "filter"] {
        let Some(conditions) = entity.data.get(field).and_then(Value::as_array) else {
            continue;
        };
        for condition in conditions {
            if let Some(name) = literal_event_comparison(condition) {
                return Some(name);
            }
        }
    }
    None
}

/// Extract the right-hand literal from a `{{_event}}` comparison condition.
fn literal_event_comparison(condition: &Value) -> Option<String> {
    let params = condition.get("parameter")?.as_array()?;
    let mut lhs_is_event = false;
    let mut rhs: Option<&str> = None;
    for param in params {
        let key = param.get("key").and_then(Value::as_str);
        let value = param.get("value").and_then(Value::as_str);
        match (key, value) {
            (Some("arg0"), Some(v)) => lhs_is_event = v == EVENT_MARKER,
            (Some("arg1"), Some(v)) => rhs = Some(v),
            _ => {}
        }
    }
    match (lhs_is_event, rhs) {
        (true, Some(name)) if !name.contains("{{") => Some(name.to_string()),
        _ => None,
    }
}

/// The events a tag emits, as far as static analysis can tell.
pub fn emitted_events(entity: &Entity) -> Vec<String> {
    emitted_events_with_table(entity, TEMPLATE_EVENT_TABLE)
}

fn emitted_events_with_table(entity: &Entity, table: &[(&str, &str)]) -> Vec<String> {
    if entity.kind != EntityKind::Tag {
        return Vec::new();
    }
    let Some(subtype) = entity.subtype() else {
        return Vec::new();
    };
    if subtype == HTML_TAG_TYPE {
        return html_script(entity).map(scan_push_events).unwrap_or_default();
    }
    table
        .iter()
        .filter(|(ty, _)| *ty == subtype)
        .map(|(_, event)| (*event).to_string())
        .collect()
}

fn html_script(entity: &Entity) -> Option<&str> {
    let params = entity.data.get("parameter")?.as_array()?;
    params
        .iter()
        .find(|p| p.get("key").and_then(Value::as_str) == Some("html"))
        .and_then(|p| p.get("value").and_then(Value::as_str))
}

/// Find literal event names in `push({... event: "X" ...})`-shaped calls.
///
/// This is a token scan, not a JavaScript parse: it looks inside each
/// `push(...)` argument window for an `event` key followed by a quoted
/// literal. Values containing `{{...}}` markers are not literal and are
/// skipped.
fn scan_push_events(script: &str) -> Vec<String> {
    let mut events: Vec<String> = Vec::new();
    let mut at = 0;
    while let Some(pos) = script[at..].find("push(") {
        let start = at + pos + "push(".len();
        let window = paren_window(&script[start..]);
        if let Some(name) = literal_event_value(window) {
            if !name.contains("{{") && !events.iter().any(|e| e == &name) {
                events.push(name);
            }
        }
        at = start;
    }
    events
}

/// The slice of `text` up to the parenthesis that closes an already-open
/// call, or all of it if the call never closes.
fn paren_window(text: &str) -> &str {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &text[..i];
                }
            }
            _ => {}
        }
    }
    text
}

/// Find `event` used as an object key and return its quoted string value.
fn literal_event_value(window: &str) -> Option<String> {
    let mut at = 0;
    while let Some(pos) = window[at..].find("event") {
        let abs = at + pos;
        at = abs + "event".len();
        // Reject longer identifiers like "preventDefault" or "eventModel".
        let before_ok = window[..abs]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric() && c != '_' && c != '.');
        let after = window[abs + "event".len()..]
            .trim_start_matches(['"', '\''])
            .trim_start();
        if !before_ok {
            continue;
        }
        let Some(rest) = after.strip_prefix(':') else {
            continue;
        };
        let rest = rest.trim_start();
        let mut chars = rest.chars();
        let quote = chars.next()?;
        if quote != '"' && quote != '\'' {
            continue;
        }
        let value: String = chars.take_while(|&c| c != quote).collect();
        if !value.is_empty() {
            return Some(value);
        }
    }
    None
}
