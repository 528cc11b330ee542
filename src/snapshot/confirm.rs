use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};

use crate::snapshot::document::SnapshotDocument;

/// What the operator is asked to approve: per-entity row counts plus the
/// document's creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub export_date: DateTime<Utc>,
    pub users: usize,
    pub groups: usize,
    pub permissions: usize,
    pub models: usize,
}

impl ImportSummary {
    pub fn of(doc: &SnapshotDocument) -> Self {
        Self {
            export_date: doc.export_date,
            users: doc.users.len(),
            groups: doc.groups.len(),
            permissions: doc.permissions.len(),
            models: doc.openai_models.len(),
        }
    }
}

/// Decides whether a destructive import may proceed. Injectable so
/// automated runs and tests can answer without a terminal.
pub trait ConfirmationProvider {
    fn confirm(&mut self, summary: &ImportSummary) -> bool;
}

/// Fixed programmatic answer. Backs the `--yes` CLI flag and tests.
pub struct ScriptedConfirmation {
    answer: bool,
    asked: usize,
}

impl ScriptedConfirmation {
    pub fn new(answer: bool) -> Self {
        Self { answer, asked: 0 }
    }

    /// How many times the gate was consulted.
    pub fn times_asked(&self) -> usize {
        self.asked
    }
}

impl ConfirmationProvider for ScriptedConfirmation {
    fn confirm(&mut self, _summary: &ImportSummary) -> bool {
        self.asked += 1;
        self.answer
    }
}

/// Interactive gate: prints the summary and requires a literal `yes` on
/// stdin. Anything else declines.
pub struct StdinConfirmation;

impl ConfirmationProvider for StdinConfirmation {
    fn confirm(&mut self, summary: &ImportSummary) -> bool {
        println!(
            "{}",
            yansi::Paint::new("WARNING: this will create or overwrite rows in the target store.")
                .yellow()
                .bold()
        );
        println!("Snapshot created: {}", summary.export_date.to_rfc3339());
        print_summary_table(summary);
        print!("Continue? (yes/no): ");
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("yes")
    }
}

fn print_summary_table(summary: &ImportSummary) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }
    table.set_header(vec!["Entity", "Rows"]);
    table.add_row(vec!["users".to_string(), summary.users.to_string()]);
    table.add_row(vec!["groups".to_string(), summary.groups.to_string()]);
    table.add_row(vec![
        "permissions".to_string(),
        summary.permissions.to_string(),
    ]);
    table.add_row(vec!["openai_models".to_string(), summary.models.to_string()]);
    println!("\n{table}\n");
}
