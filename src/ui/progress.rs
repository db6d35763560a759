use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a backend call is in flight.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Stop without leaving a line behind.
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

/// Await `fut` with a spinner; the spinner line is removed afterwards.
pub async fn with_spinner<F, T>(message: impl Into<String>, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = Spinner::start(message);
    let output = fut.await;
    spinner.clear();
    output
}
