use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_value;

/// Render the analysis envelope as tables: the metrics first, then the
/// flagged transactions and intercept log, then the load summary.
pub fn print_table(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", value);
        return;
    };

    if let Some(result) = map.get("result") {
        print_key_value_table(result);
    } else {
        print_key_value_table(value);
    }

    if let Some(Value::Array(flagged)) = map.get("flagged") {
        if !flagged.is_empty() {
            println!("\nFlagged transactions:");
            print_array_table(flagged);
        }
    }

    if let Some(Value::Array(log)) = map.get("intercept_log") {
        if !log.is_empty() {
            println!("\nIntercept log:");
            print_array_table(log);
        }
    }

    if let Some(Value::Object(load)) = map.get("load") {
        let total = load.get("total").map(format_value).unwrap_or_default();
        let valid = load.get("valid").map(format_value).unwrap_or_default();
        let skipped = load.get("skipped").map(format_value).unwrap_or_default();
        println!("\nLoaded {} of {} records ({} skipped)", valid, total, skipped);
    }
}

fn print_key_value_table(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

fn print_array_table(arr: &[Value]) {
    // Headers come from the first object; every row shares the same shape.
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}
