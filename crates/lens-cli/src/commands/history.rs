use anyhow::Context;
use chrono::SecondsFormat;
use serde::Serialize;

use lens_core::entities::HistoryRecord;
use lens_core::enums::Verdict;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// One line of the history view as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub result: Verdict,
    pub confidence: f64,
    pub text: String,
    pub created_at: String,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id.clone(),
            result: record.result,
            confidence: record.confidence,
            text: record.text.clone(),
            created_at: record
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[must_use]
pub fn rows(records: &[HistoryRecord]) -> Vec<HistoryRow> {
    records.iter().map(HistoryRow::from).collect()
}

/// Handle `truthlens history`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = ctx.config.history.limit;
    let records = ctx
        .store
        .list(limit)
        .await
        .context("failed to list history")?;
    tracing::debug!(count = records.len(), limit, "history loaded");
    print_records(&records, flags.format)
}

/// Full records as JSON, one record per line for raw, and a summary table otherwise.
pub fn print_records(records: &[HistoryRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => output(&records, format),
        OutputFormat::Table => output(&rows(records), format),
        OutputFormat::Raw => {
            for record in records {
                output(record, format)?;
            }
            Ok(())
        }
    }
}
