use crate::PLACEHOLDER;
use std::fmt::Write;
use topbar_core::StatusState;

/// Displays the time the tick was taken at.
///
/// The format string comes from `[clock] format`.  An invalid format is
/// reported once at construction and renders as a placeholder.
#[derive(Debug)]
pub struct ClockWidget {
    format: String,
}

impl ClockWidget {
    pub fn new(format: &str) -> Self {
        let widget = Self {
            format: format.to_string(),
        };
        if widget.format_time(&StatusState::default()).is_none() {
            tracing::warn!("Invalid clock format '{format}'");
        }
        widget
    }

    pub fn render(&self, state: &StatusState) -> String {
        self.format_time(state)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    fn format_time(&self, state: &StatusState) -> Option<String> {
        let mut out = String::new();
        write!(out, "{}", state.time.format(&self.format)).ok()?;
        Some(out)
    }
}
