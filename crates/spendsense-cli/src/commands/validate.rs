use clap::Args;
use serde_json::{json, Value};

use crate::input;

/// Arguments for dataset validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a CSV or JSON dataset (or pipe a JSON array on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::read_input(args.input.as_deref())?;
    let report = input::loader::load_records(&records)?;

    Ok(json!({
        "result": {
            "total": report.total,
            "valid": report.total - report.skipped,
            "skipped": report.skipped,
        },
    }))
}
