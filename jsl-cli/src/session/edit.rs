use crate::session::prompt::{FieldGroup, Prompter};
use crate::session::rows::{current_label, SessionRow};
use anyhow::{Context, Result};
use jsl_lib::ISSUE_STATUSES;

/// Status vocabulary with the original status relabeled as the current one.
pub fn status_options(original_status: &str) -> Vec<String> {
    let mut options: Vec<String> = ISSUE_STATUSES
        .iter()
        .map(|status| {
            if *status == original_status {
                current_label(status)
            } else {
                status.to_string()
            }
        })
        .collect();
    // keeps "no change" reachable for issues fetched in an unknown status
    if !ISSUE_STATUSES.contains(&original_status) {
        options.push(current_label(original_status));
    }
    options
}

pub fn field_group(row: &SessionRow) -> FieldGroup {
    let status_options = status_options(&row.original_status);
    let status_cursor = status_options
        .iter()
        .position(|option| *option == row.status)
        .unwrap_or(0);
    FieldGroup {
        title: row.key.clone(),
        description: row.short_description.clone(),
        standard_time: row.standard_time.clone(),
        meeting_time: row.meeting_time.clone(),
        status_options,
        status_cursor,
    }
}

pub fn edit(rows: &mut [SessionRow], prompter: &dyn Prompter) -> Result<()> {
    for row in rows.iter_mut().filter(|row| row.is_selected) {
        let values = prompter
            .edit_fields(&field_group(row))
            .context("Logging form failed")?;
        row.standard_time = values.standard_time;
        row.meeting_time = values.meeting_time;
        row.status = values.status;
    }
    Ok(())
}
