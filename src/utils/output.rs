use crate::domain::model::Invoice;
use crate::utils::error::{InvoiceError, Result};
use chrono::DateTime;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(InvoiceError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: table, json, csv".to_string(),
            }),
        }
    }
}

pub fn render_invoice(invoice: &Invoice, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(invoice)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => render_csv(invoice),
    }
}

fn annotate_timestamp(seconds: i64) -> Option<String> {
    if seconds <= 0 {
        return None;
    }
    DateTime::from_timestamp(seconds, 0).map(|at| at.to_rfc3339())
}

/// One `field  value` row per schema column.
fn render_table(invoice: &Invoice) -> String {
    let width = Invoice::FIELDS.iter().map(|f| f.len()).max().unwrap_or(0);
    let mut out = String::new();

    for (field, value) in invoice.to_pairs() {
        let note = match field {
            "creation_date" => annotate_timestamp(invoice.creation_date),
            "settle_date" => annotate_timestamp(invoice.settle_date),
            "expiry" => invoice
                .expires_at()
                .map(|at| format!("expires {}", at.to_rfc3339())),
            _ => None,
        };
        match note {
            Some(note) => out.push_str(&format!("{:<width$}  {} ({})\n", field, value, note)),
            None => out.push_str(&format!("{:<width$}  {}\n", field, value)),
        }
    }
    out
}

fn render_csv(invoice: &Invoice) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let pairs = invoice.to_pairs();
    writer.write_record(pairs.iter().map(|(field, _)| *field))?;
    writer.write_record(pairs.iter().map(|(_, value)| value.as_str()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| InvoiceError::IoError(std::io::Error::other(e.to_string())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
