// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Collect the distinct `{{...}}` variable markers in a string.
///
/// A single pass over the text: interior whitespace is trimmed and names are
/// de-duplicated within this one string (not across calls). Unterminated
/// markers and empty braces are ignored.
pub fn scan_variable_markers(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut at = 0;
    while let Some(start) = text[at..].find("{{") {
        let open = at + start + 2;
        let Some(close) = text[open..].find("}}") else {
            break;
        };
        let name = text[open..open + close].trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        at = open + close + 2;
    }
    names
}
