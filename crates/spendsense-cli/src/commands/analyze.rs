use clap::Args;
use serde_json::{json, Value};

use spendsense_core::engine::RiskEngine;

use crate::input;

/// Arguments for the full analysis pipeline
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a CSV or JSON dataset (or pipe a JSON array on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::read_input(args.input.as_deref())?;
    let report = input::loader::load_records(&records)?;

    let mut txns = report.transactions;
    txns.sort_by_key(|t| t.timestamp);

    let mut engine = RiskEngine::new();
    engine.train_scorer(&txns);

    let mut flagged = Vec::new();
    for mut txn in txns {
        // Decisions from the replay column are applied after evaluation, the
        // way a live user would respond to an intercept.
        let decision = txn.user_decision.take();

        let assessment = engine.evaluate_transaction(&mut txn);
        engine.add_transaction(txn.clone());

        if !assessment.is_flagged {
            continue;
        }
        if let Some(decision) = decision {
            engine.record_decision(&mut txn, &assessment, decision)?;
        }

        flagged.push(json!({
            "txn_id": txn.txn_id,
            "timestamp": txn.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "amount": txn.amount,
            "category": txn.category,
            "rules": assessment
                .risk_flags
                .iter()
                .map(|f| f.rule_name.clone())
                .collect::<Vec<_>>(),
            "explanations": assessment
                .risk_flags
                .iter()
                .map(|f| f.explanation.clone())
                .collect::<Vec<_>>(),
            "decision": txn.user_decision,
        }));
    }

    let metrics = engine.get_metrics();
    let intercept_log: Vec<Value> = engine
        .get_intercept_log(None)
        .iter()
        .map(|entry| {
            json!({
                "txn_id": entry.txn_id,
                "amount": entry.transaction.amount,
                "decision": entry.decision,
                "rules": entry
                    .risk_flags
                    .iter()
                    .map(|f| f.rule_name.clone())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    Ok(json!({
        "result": serde_json::to_value(&metrics)?,
        "flagged": flagged,
        "intercept_log": intercept_log,
        "load": {
            "total": report.total,
            "valid": report.total - report.skipped,
            "skipped": report.skipped,
        },
    }))
}
