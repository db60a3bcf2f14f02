//! Batch progress reporting. Without the `progress` feature every bar is a
//! no-op.

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(not(feature = "progress"))]
use self::noop::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Progress over a fixed number of documents, safe to share across workers
pub struct BatchProgress {
    bar: Option<ProgressBar>,
}

impl BatchProgress {
    /// A bar of `len` steps; `silent` hides it entirely
    pub fn new(len: u64, message: &'static str, silent: bool) -> Self {
        if silent {
            return Self { bar: None };
        }
        let bar = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("█▓▒░  "));
        }
        bar.set_message(message);
        Self { bar: Some(bar) }
    }

    /// One document done
    pub fn tick(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn finish(self, message: String) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(message);
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_none()
    }
}

#[cfg(not(feature = "progress"))]
mod noop {
    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new(_len: u64) -> Self {
            ProgressBar
        }

        pub fn set_style(&self, _style: ProgressStyle) {}
        pub fn set_message(&self, _msg: &'static str) {}
        pub fn inc(&self, _delta: u64) {}
        pub fn finish_with_message(&self, _msg: String) {}
    }

    pub struct ProgressStyle;

    impl ProgressStyle {
        pub fn default_bar() -> Self {
            ProgressStyle
        }

        pub fn template(self, _template: &str) -> Result<Self, std::convert::Infallible> {
            Ok(self)
        }

        pub fn progress_chars(self, _chars: &str) -> Self {
            self
        }
    }
}
