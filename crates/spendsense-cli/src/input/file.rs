use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Read a dataset file as raw records, dispatching on the extension.
/// JSON files must contain a top-level array; CSV rows become objects
/// keyed by the header row, every cell a string.
pub fn read_records(path: &str) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let ext = canonical
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => read_json_records(&canonical),
        "csv" => read_csv_records(&canonical),
        other => Err(format!("Unsupported file format: '.{}'. Use .csv or .json", other).into()),
    }
}

fn read_json_records(path: &Path) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(format!(
            "'{}' must contain a top-level array of transactions",
            path.display()
        )
        .into()),
    }
}

fn read_csv_records(path: &Path) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let headers = reader
        .headers()
        .map_err(|e| format!("Invalid CSV format in '{}': {}", path.display(), e))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| format!("Invalid CSV format in '{}': {}", path.display(), e))?;
        let mut map = Map::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            map.insert(header.to_string(), Value::String(cell.to_string()));
        }
        records.push(Value::Object(map));
    }
    Ok(records)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
