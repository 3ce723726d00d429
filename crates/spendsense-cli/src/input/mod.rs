pub mod file;
pub mod loader;
pub mod stdin;

use serde_json::Value;

/// Raw records from `--input`, falling back to piped stdin.
pub fn read_input(path: Option<&str>) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => file::read_records(p),
        None => stdin::read_stdin_records()?
            .ok_or_else(|| "--input is required (or pipe a JSON array on stdin)".into()),
    }
}
