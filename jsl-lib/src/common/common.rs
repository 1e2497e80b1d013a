use chrono::{DateTime, Duration, Local};

pub struct Common;

impl Common {
    /// `8h`, `1.5h`, `0.33h`: two decimals at most, trailing zeros trimmed.
    pub fn readable_hours(duration: &Duration) -> String {
        let hours = duration.num_seconds() as f64 / 3_600.0;
        let formatted = format!("{:.2}", hours);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        format!("{}h", trimmed)
    }

    /// Start timestamp for new worklogs, shifted by `day_delta` days from now.
    /// `None` when the shift leaves chrono's representable range.
    pub fn started_at(day_delta: i64) -> Option<DateTime<Local>> {
        Duration::try_days(day_delta).and_then(|delta| Local::now().checked_add_signed(delta))
    }

    /// Timestamp in the format Jira expects for `started`, e.g. `2024-03-01T09:15:00.000+0100`.
    pub fn jira_timestamp(date: &DateTime<Local>) -> String {
        date.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
    }

    pub fn clock_time(date: &DateTime<Local>) -> String {
        date.format("%H:%M:%S").to_string()
    }
}
