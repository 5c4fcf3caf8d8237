//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use checkmate_domain::{CheckStatus, FactCheckRecord};
use chrono::DateTime;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of claim text shown in list tables
const CLAIM_COLUMN_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of records.
    pub fn format_records(&self, records: &[FactCheckRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(
                &records.iter().map(record_json).collect::<Vec<_>>(),
            )?),
            OutputFormat::Table => Ok(self.records_table(records)),
            OutputFormat::Quiet => Ok(quiet(records)),
        }
    }

    /// Format a single record with its full analysis.
    pub fn format_record(&self, record: &FactCheckRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&record_json(record))?),
            OutputFormat::Table => Ok(self.record_detail(record)),
            OutputFormat::Quiet => Ok(quiet(std::slice::from_ref(record))),
        }
    }

    fn records_table(&self, records: &[FactCheckRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No fact checks found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Status", "Verdict", "Score", "Claim", "Created"]);

        for record in records {
            let (verdict, score) = verdict_and_score(record);
            builder.push_record([
                record.id.to_string(),
                record.status.to_string(),
                self.colorize_verdict(&verdict),
                score,
                truncate(&record.claim, CLAIM_COLUMN_CHARS),
                format_timestamp(record.created_at),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn record_detail(&self, record: &FactCheckRecord) -> String {
        let (verdict, score) = verdict_and_score(record);

        let mut builder = Builder::default();
        builder.push_record(["ID".to_string(), record.id.to_string()]);
        builder.push_record(["Claim".to_string(), record.claim.clone()]);
        builder.push_record(["Status".to_string(), record.status.to_string()]);
        builder.push_record(["Verdict".to_string(), self.colorize_verdict(&verdict)]);
        builder.push_record(["Credibility".to_string(), score]);
        if let Some(url) = &record.source_url {
            builder.push_record(["Source".to_string(), url.clone()]);
        }
        builder.push_record([
            "Analysis".to_string(),
            record.analysis.clone().unwrap_or_default(),
        ]);
        builder.push_record(["Created".to_string(), format_timestamp(record.created_at)]);
        builder.push_record(["Updated".to_string(), format_timestamp(record.updated_at)]);

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Format a model turn in chat mode.
    pub fn model_reply(&self, text: &str) -> String {
        self.colorize(text, "cyan")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize_verdict(&self, verdict: &str) -> String {
        let color = match verdict {
            "true" => "green",
            "false" => "red",
            "partially-true" => "yellow",
            "error" => "magenta",
            "pending" => "",
            _ => "blue",
        };
        self.colorize(verdict, color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Verdict label and credibility score shown for a record.
fn verdict_and_score(record: &FactCheckRecord) -> (String, String) {
    match record.status {
        CheckStatus::Pending => ("pending".to_string(), "-".to_string()),
        CheckStatus::Error => ("error".to_string(), "0".to_string()),
        CheckStatus::Completed => match record.verdict() {
            Some(v) => (v.as_str().to_string(), v.credibility_score().to_string()),
            None => ("unclear".to_string(), "50".to_string()),
        },
    }
}

fn record_json(record: &FactCheckRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id.value(),
        "claim": record.claim,
        "status": record.status.as_str(),
        "result": record.result,
        "source_url": record.source_url,
        "analysis": record.analysis,
        "created_at": record.created_at,
        "updated_at": record.updated_at
    })
}

fn quiet(records: &[FactCheckRecord]) -> String {
    records
        .iter()
        .map(|r| r.id.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shorten `text` to `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Render milliseconds since the epoch as UTC time.
pub fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}
