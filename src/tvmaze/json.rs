//! JSON decoding with error context for upstream search payloads.

use anyhow::Result;

/// Decode `body`, reporting the serde path, a readable type mismatch and a
/// short snippet of the offending line when decoding fails.
pub fn parse_json_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let inner = err.inner();
        let (line, column) = (inner.line(), inner.column());
        let path = err.path().to_string();

        let raw = inner.to_string();
        let suffix = format!(" at line {line} column {column}");
        let message = describe_mismatch(raw.strip_suffix(&suffix).unwrap_or(&raw));
        let snippet = snippet_around(body, line, column, 24);

        if path.is_empty() || path == "." {
            anyhow::anyhow!("{message} (line {line} col {column})\n{snippet}")
        } else {
            anyhow::anyhow!("at path '{path}': {message} (line {line} col {column})\n{snippet}")
        }
    })
}

/// Turn serde's "invalid type: X, expected Y" into "expected Y, got X".
fn describe_mismatch(message: &str) -> String {
    let Some(rest) = message.strip_prefix("invalid type: ") else {
        return message.to_owned();
    };
    match rest.split_once(", expected ") {
        Some((actual, expected)) => format!("expected {}, got {actual}", expected.trim()),
        None => message.to_owned(),
    }
}

/// A window of `width` characters around the 1-based `column` of `line`,
/// with a caret under the error position.
fn snippet_around(body: &str, line: usize, column: usize, width: usize) -> String {
    let target: Vec<char> = body
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .chars()
        .collect();
    if target.is_empty() {
        return "(empty line)".to_owned();
    }

    let position = column.saturating_sub(1).min(target.len());
    let start = position.saturating_sub(width / 2);
    let end = (position + width / 2).min(target.len());
    let window: String = target[start..end].iter().collect();
    let caret = " ".repeat(position - start) + "^";

    format!("...{window}...\n   {caret}")
}
