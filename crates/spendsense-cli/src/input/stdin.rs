use serde_json::Value;
use std::io::{self, Read};

/// Attempt to read a JSON transaction array from stdin if data is being
/// piped. Returns None if stdin is a TTY (interactive).
pub fn read_stdin_records() -> Result<Option<Vec<Value>>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    match value {
        Value::Array(records) => Ok(Some(records)),
        _ => Err("stdin must contain a top-level JSON array of transactions".into()),
    }
}
