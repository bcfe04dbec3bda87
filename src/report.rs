/*!
 * Reporting functionality for flatdir
 *
 * Renders the outcome of a run as a one-line confirmation and, on request,
 * a summary table built with the tabled library.
 */

use std::path::PathBuf;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::format_file_size;

/// Transform a run performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Flatten,
    Concat,
}

/// Outcome of one successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Transform performed
    pub kind: RunKind,
    /// Output directory (flatten) or file (concat)
    pub output: PathBuf,
    /// Files written or concatenated
    pub files: usize,
    /// Bytes written
    pub bytes: u64,
    /// Files replaced by an error marker (concat only)
    pub unreadable: usize,
    /// Wall time of the run
    pub duration: Duration,
}

/// Report generator for run summaries
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// One-line confirmation referencing the output location
    pub fn confirmation(&self, summary: &RunSummary) -> String {
        match summary.kind {
            RunKind::Flatten => format!(
                "Flattened {} files into {}",
                summary.files,
                summary.output.display()
            ),
            RunKind::Concat => format!(
                "Concatenated {} files into {}",
                summary.files,
                summary.output.display()
            ),
        }
    }

    /// Summary table of the run
    pub fn summary_table(&self, summary: &RunSummary) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mode = match summary.kind {
            RunKind::Flatten => "flatten",
            RunKind::Concat => "concat",
        };

        let mut rows = vec![
            SummaryRow {
                key: "Mode",
                value: mode.to_string(),
            },
            SummaryRow {
                key: "Output",
                value: summary.output.display().to_string(),
            },
            SummaryRow {
                key: "Files",
                value: summary.files.to_string(),
            },
            SummaryRow {
                key: "Size",
                value: format_file_size(summary.bytes),
            },
        ];

        if summary.kind == RunKind::Concat {
            rows.push(SummaryRow {
                key: "Unreadable",
                value: summary.unreadable.to_string(),
            });
        }

        rows.push(SummaryRow {
            key: "Time",
            value: format!("{:.4?}", summary.duration),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }
}
