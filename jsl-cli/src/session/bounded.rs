use crate::logger::Logger;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::error::Elapsed;

/// Default deadlines of the two phases waiting on Jira.
#[derive(Debug, Clone, Copy)]
pub struct Deadlines {
    pub fetch: Duration,
    pub submission: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            fetch: Duration::from_secs(10),
            submission: Duration::from_secs(20),
        }
    }
}

/// Terminal spinner shown while waiting on Jira.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(title: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(title.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Wraps `inner` so its lines are printed with the spinner hidden, never on the spinner line.
    pub fn sink(&self, inner: Arc<dyn Logger>) -> Arc<dyn Logger> {
        Arc::new(SpinnerSink {
            bar: self.bar.clone(),
            inner,
        })
    }

    /// Awaits `operation` for at most `deadline`, then removes the spinner.
    ///
    /// On expiry the future is dropped, so callers that need the underlying work to keep
    /// going should hand in a join handle rather than the work itself.
    pub async fn wait<F, T>(self, deadline: Duration, operation: F) -> Result<T, Elapsed>
    where
        F: Future<Output = T>,
    {
        let result = tokio::time::timeout(deadline, operation).await;
        self.bar.finish_and_clear();
        result
    }
}

struct SpinnerSink {
    bar: ProgressBar,
    inner: Arc<dyn Logger>,
}

impl Logger for SpinnerSink {
    fn log(&self, message: String) {
        self.bar.suspend(|| self.inner.log(message));
    }
}

/// Awaits `operation` behind a spinner for at most `deadline`.
pub async fn with_spinner<F, T>(title: &str, deadline: Duration, operation: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    Spinner::start(title).wait(deadline, operation).await
}
