use anyhow::Result;
use colored::Colorize;
use inquire::{Confirm, MultiSelect, Select, Text};

/// Fields presented for one issue during the edit phase.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup {
    pub title: String,
    pub description: String,
    pub standard_time: String,
    pub meeting_time: String,
    pub status_options: Vec<String>,
    pub status_cursor: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
    pub standard_time: String,
    pub meeting_time: String,
    pub status: String,
}

/// Terminal interactions used by a session. Any error is fatal to the session.
pub trait Prompter: Send + Sync {
    /// Returns the chosen indices into `options`, `defaults` being pre-checked.
    fn pick_many(&self, title: &str, options: &[String], defaults: &[usize]) -> Result<Vec<usize>>;

    fn edit_fields(&self, group: &FieldGroup) -> Result<FieldValues>;

    fn confirm(&self, summary: &str) -> Result<bool>;
}

pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn pick_many(&self, title: &str, options: &[String], defaults: &[usize]) -> Result<Vec<usize>> {
        if options.is_empty() {
            println!("Nothing to pick from.");
            return Ok(Vec::new());
        }
        let picked = MultiSelect::new(title, options.to_vec())
            .with_default(defaults)
            .with_page_size(15)
            .raw_prompt()?;
        Ok(picked.into_iter().map(|option| option.index).collect())
    }

    fn edit_fields(&self, group: &FieldGroup) -> Result<FieldValues> {
        println!("{}", format!("---- {} ----", group.title).bold());
        println!("{}", group.description.dimmed());
        let standard_time = Text::new("Standard hours:")
            .with_initial_value(&group.standard_time)
            .prompt()?;
        let meeting_time = Text::new("Meeting hours:")
            .with_initial_value(&group.meeting_time)
            .prompt()?;
        let status = Select::new("Status:", group.status_options.clone())
            .with_starting_cursor(group.status_cursor)
            .prompt()?;
        Ok(FieldValues {
            standard_time: standard_time.trim().to_string(),
            meeting_time: meeting_time.trim().to_string(),
            status,
        })
    }

    fn confirm(&self, summary: &str) -> Result<bool> {
        println!("{}", summary);
        let confirmed = Confirm::new("Submit these changes?")
            .with_default(true)
            .with_help_message("answer no to go back to the issue list")
            .prompt()?;
        Ok(confirmed)
    }
}
