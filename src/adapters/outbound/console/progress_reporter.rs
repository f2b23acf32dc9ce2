use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::cell::RefCell;

const BAR_TEMPLATE: &str = "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// StderrProgressReporter adapter for reconciliation loops
///
/// Plain messages go to stderr; `report_progress` drives one indicatif bar,
/// which is cleared before any error or completion line is printed.
pub struct StderrProgressReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn bar_for(&self, total: usize) -> ProgressBar {
        let mut slot = self.bar.borrow_mut();
        match slot.as_ref() {
            Some(bar) => {
                bar.set_length(total as u64);
                bar.clone()
            }
            None => {
                let bar = ProgressBar::new(total as u64);
                if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                    bar.set_style(style.progress_chars("=>-"));
                }
                *slot = Some(bar.clone());
                bar
            }
        }
    }

    fn clear_bar(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        match self.bar.borrow().as_ref() {
            Some(bar) => bar.println(message),
            None => eprintln!("{}", message),
        }
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        let bar = self.bar_for(total);
        bar.set_position(current as u64);
        if let Some(msg) = message {
            bar.set_message(msg.to_string());
        }
    }

    fn report_error(&self, message: &str) {
        self.clear_bar();
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    fn report_completion(&self, message: &str) {
        self.clear_bar();
        eprintln!("{} {}", "done:".green().bold(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_is_dropped_after_completion() {
        let reporter = StderrProgressReporter::new();
        reporter.report_progress(1, 3, Some("processor"));
        assert!(reporter.bar.borrow().is_some());
        reporter.report("searching");
        reporter.report_completion("3 values checked");
        assert!(reporter.bar.borrow().is_none());
    }

    #[test]
    fn test_error_without_bar() {
        let reporter = StderrProgressReporter::default();
        reporter.report_error("remote search failed");
        assert!(reporter.bar.borrow().is_none());
    }
}
