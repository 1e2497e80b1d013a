use crate::session::prompt::Prompter;
use crate::session::rows::SessionRow;
use anyhow::{Context, Result};
use jsl_lib::common::common::Common;

fn progress_label(row: &SessionRow) -> String {
    format!(
        "({} / {})",
        Common::readable_hours(&row.logged),
        Common::readable_hours(&row.estimate)
    )
}

fn widest<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0)
}

/// One aligned line per row: `key - status - (logged / estimate) - description`.
pub fn option_lines(rows: &[SessionRow]) -> Vec<String> {
    let progress: Vec<String> = rows.iter().map(progress_label).collect();
    let key_width = widest(rows.iter().map(|r| r.key.as_str()));
    let status_width = widest(rows.iter().map(|r| r.original_status.as_str()));
    let progress_width = widest(progress.iter().map(String::as_str));

    rows.iter()
        .zip(progress.iter())
        .map(|(row, progress)| {
            format!(
                "{:<kw$} - {:<sw$} - {:<pw$} - {}",
                row.key,
                row.original_status,
                progress,
                row.short_description,
                kw = key_width,
                sw = status_width,
                pw = progress_width,
            )
        })
        .collect()
}

pub fn selected_indices(rows: &[SessionRow]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.is_selected)
        .map(|(index, _)| index)
        .collect()
}

/// Overwrites every row's selection flag with the chosen set.
pub fn apply_selection(rows: &mut [SessionRow], chosen: &[usize]) {
    for (index, row) in rows.iter_mut().enumerate() {
        row.is_selected = chosen.contains(&index);
    }
}

pub fn select(rows: &mut [SessionRow], prompter: &dyn Prompter) -> Result<()> {
    let options = option_lines(rows);
    let chosen = prompter
        .pick_many("Pick issues to edit:", &options, &selected_indices(rows))
        .context("Issue picking form failed")?;
    apply_selection(rows, &chosen);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::prompt::scripted::ScriptedPrompter;
    use crate::session::rows::{issue, snapshot};

    fn rows() -> Vec<SessionRow> {
        snapshot(&[
            issue("PROJ-1", "Open", 8, 2),
            issue("PROJ-22", "In Review", 40, 4),
            issue("PROJ-3", "In Progress", 1, 0),
        ])
    }

    #[test]
    fn test_option_lines_are_aligned() {
        let lines = option_lines(&rows());
        assert_eq!(lines[0], "PROJ-1  - Open        - (2h / 8h)  - PROJ-1 description");
        assert_eq!(lines[1], "PROJ-22 - In Review   - (4h / 40h) - PROJ-22 description");
        assert_eq!(lines[2], "PROJ-3  - In Progress - (0h / 1h)  - PROJ-3 description");
    }

    #[test]
    fn test_apply_selection_overwrites() {
        let mut rows = rows();
        apply_selection(&mut rows, &[0, 1]);
        apply_selection(&mut rows, &[2]);
        assert_eq!(selected_indices(&rows), vec![2]);
    }

    #[test]
    fn test_deselected_rows_keep_their_fields() {
        let mut rows = rows();
        apply_selection(&mut rows, &[0]);
        rows[0].standard_time = "2h".to_string();
        apply_selection(&mut rows, &[]);
        assert!(!rows[0].is_selected);
        assert_eq!(rows[0].standard_time, "2h");
    }

    #[test]
    fn test_select_seeds_previous_choice() {
        let mut rows = rows();
        apply_selection(&mut rows, &[1]);
        let prompter = ScriptedPrompter::default().pick(&[0, 2]);
        select(&mut rows, &prompter).unwrap();

        let shown = prompter.shown_picks.lock().unwrap();
        assert_eq!(shown[0].0.len(), 3);
        assert_eq!(shown[0].1, vec![1]);
        assert_eq!(selected_indices(&rows), vec![0, 2]);
    }

    #[test]
    fn test_select_failure_is_reported() {
        let mut rows = rows();
        let error = select(&mut rows, &ScriptedPrompter::default()).unwrap_err();
        assert_eq!(error.to_string(), "Issue picking form failed");
    }
}
