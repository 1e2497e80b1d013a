use crate::session::prompt::Prompter;
use crate::session::rows::SessionRow;
use anyhow::{Context, Result};
use colored::Colorize;
use jsl_lib::duration::parse_hours;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SummaryLine {
    #[tabled(rename = "ISSUE")]
    pub key: String,
    #[tabled(rename = "STANDARD")]
    pub standard: String,
    #[tabled(rename = "MEETINGS")]
    pub meeting: String,
    #[tabled(rename = "STATUS")]
    pub transition: String,
}

/// Pending changes of the selected rows.
#[derive(Debug, Default)]
pub struct Summary {
    pub lines: Vec<SummaryLine>,
    pub total_hours: f64,
    /// Durations that couldn't be understood, shown but not fatal.
    pub diagnostics: Vec<String>,
}

impl Summary {
    pub fn build(rows: &[SessionRow]) -> Self {
        let mut summary = Summary::default();
        for row in rows.iter().filter(|row| row.is_selected) {
            let standard = summary.hours(&row.key, "standard", &row.standard_time);
            let meeting = summary.hours(&row.key, "meeting", &row.meeting_time);
            let transition = match row.requested_status() {
                Some(status) => format!("{} → {}", row.original_status, status),
                None => NOT_AVAILABLE.to_string(),
            };
            summary.lines.push(SummaryLine {
                key: row.key.clone(),
                standard,
                meeting,
                transition,
            });
        }
        summary
    }

    /// Adds the parsed value to the total and returns its label.
    fn hours(&mut self, key: &str, kind: &str, time_str: &str) -> String {
        if time_str.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        let hours = match parse_hours(time_str) {
            Ok(hours) => hours,
            Err(e) => {
                self.diagnostics.push(format!(
                    "Couldn't parse {} time for {}: '{}' ({})",
                    kind, key, time_str, e
                ));
                0.0
            }
        };
        if hours == 0.0 {
            return NOT_AVAILABLE.to_string();
        }
        self.total_hours += hours;
        format!("{:.2}h", hours)
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        for diagnostic in &self.diagnostics {
            output.push_str(&format!("{}\n", diagnostic.yellow()));
        }
        output.push_str(&format!(
            "{}{}\n",
            "Total logged time: ".purple(),
            format!("{:.2}h", self.total_hours).purple().bold()
        ));

        let mut table = Table::new(&self.lines);
        table.with(Style::modern().remove_horizontal());
        table.with(Modify::new(Columns::new(..)).with(Alignment::center()));
        table.with(
            Modify::new(Columns::first())
                .with(Color::BOLD | Color::FG_MAGENTA)
                .with(Alignment::center()),
        );
        output.push_str(&table.to_string());
        output
    }
}

/// Shows the summary and asks for confirmation.
pub fn confirm(rows: &[SessionRow], prompter: &dyn Prompter) -> Result<bool> {
    let summary = Summary::build(rows);
    prompter
        .confirm(&summary.render())
        .context("Confirmation form failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::rows::{issue, snapshot};
    use crate::session::selection::apply_selection;

    fn edited_rows() -> Vec<SessionRow> {
        let mut rows = snapshot(&[
            issue("PROJ-1", "Open", 8, 2),
            issue("PROJ-2", "In Review", 4, 4),
            issue("PROJ-3", "Open", 1, 0),
        ]);
        apply_selection(&mut rows, &[0, 1]);
        rows[0].standard_time = "3h".to_string();
        rows[0].status = "Done".to_string();
        rows[1].meeting_time = "1h".to_string();
        rows[2].standard_time = "5h".to_string();
        rows
    }

    #[test]
    fn test_summary_of_selected_rows() {
        let summary = Summary::build(&edited_rows());
        assert_eq!(summary.total_hours, 4.0);
        assert!(summary.diagnostics.is_empty());
        assert_eq!(
            summary.lines,
            vec![
                SummaryLine {
                    key: "PROJ-1".to_string(),
                    standard: "3.00h".to_string(),
                    meeting: "N/A".to_string(),
                    transition: "Open → Done".to_string(),
                },
                SummaryLine {
                    key: "PROJ-2".to_string(),
                    standard: "N/A".to_string(),
                    meeting: "1.00h".to_string(),
                    transition: "N/A".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_bare_numbers_count_as_hours() {
        let mut rows = edited_rows();
        rows[0].standard_time = "2".to_string();
        rows[1].meeting_time = "30m".to_string();
        let summary = Summary::build(&rows);
        assert_eq!(summary.total_hours, 2.5);
        assert_eq!(summary.lines[0].standard, "2.00h");
        assert_eq!(summary.lines[1].meeting, "0.50h");
    }

    #[test]
    fn test_unparseable_duration_is_zero_with_diagnostic() {
        let mut rows = edited_rows();
        rows[0].standard_time = "abc".to_string();
        let summary = Summary::build(&rows);
        assert_eq!(summary.total_hours, 1.0);
        assert_eq!(summary.lines[0].standard, "N/A");
        assert_eq!(summary.diagnostics.len(), 1);
        assert!(summary.diagnostics[0].contains("PROJ-1"));
        assert!(summary.diagnostics[0].contains("'abc'"));
    }

    #[test]
    fn test_render_shows_total_and_rows() {
        let rendered = Summary::build(&edited_rows()).render();
        assert!(rendered.contains("Total logged time"));
        assert!(rendered.contains("4.00h"));
        assert!(rendered.contains("PROJ-1"));
        assert!(rendered.contains("Open → Done"));
        assert!(!rendered.contains("PROJ-3"));
    }

    #[test]
    fn test_empty_selection() {
        let rows = snapshot(&[issue("PROJ-1", "Open", 8, 2)]);
        let summary = Summary::build(&rows);
        assert!(summary.lines.is_empty());
        assert_eq!(summary.total_hours, 0.0);
    }
}
