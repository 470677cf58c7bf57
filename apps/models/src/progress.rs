//! Terminal download progress using indicatif.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use medassist_fetcher::DownloadProgress;

const BAR_TEMPLATE: &str =
    "{msg} [{bar:40.cyan/blue}] {percent:>3}% ({bytes}/{total_bytes}, {bytes_per_sec})";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})";

/// One bar per download: percent when the length is known, a byte counter otherwise.
pub(crate) struct CliDownloadProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliDownloadProgress {
    pub(crate) fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl DownloadProgress for CliDownloadProgress {
    fn started(&self, file_name: &str, total: Option<u64>) {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(BAR_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template(SPINNER_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        bar.set_message(file_name.to_string());

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn advanced(&self, downloaded: u64) {
        self.with_bar(|bar| bar.set_position(downloaded));
    }

    fn finished(&self) {
        if let Some(bar) = self.take_bar() {
            bar.finish();
        }
    }

    fn failed(&self) {
        if let Some(bar) = self.take_bar() {
            bar.abandon();
        }
    }
}
