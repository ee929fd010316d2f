//! Output formatting for run reports

use super::RunReport;
use crate::error::Result;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Format type for the final summary
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Human-readable summary lines
    #[default]
    Text,
    /// Single-line JSON object
    Json,
    /// Indented JSON object
    JsonPretty,
}

/// Renders reports in the configured format
pub struct OutputFormatter {
    format: ReportFormat,
}

impl OutputFormatter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Render a report; the result always ends with a newline
    pub fn format(&self, report: &RunReport) -> Result<String> {
        let mut output = match self.format {
            ReportFormat::Text => format_text(report),
            ReportFormat::Json => serde_json::to_string(report)?,
            ReportFormat::JsonPretty => serde_json::to_string_pretty(report)?,
        };
        if !output.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }
}

fn format_text(report: &RunReport) -> String {
    [
        format!("The total is {}", report.result.sum),
        format!("The maximum is {}", report.result.max),
        format!("The minimum is {}", report.result.min),
        format!("The execution time is {} sec", report.elapsed_secs),
    ]
    .join("\n")
}

/// Render every row of a grid as `[ a b c ]`
pub fn format_grid(grid: &Grid) -> String {
    grid.rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            format!("[ {} ]\n", cells.join(" "))
        })
        .collect()
}
