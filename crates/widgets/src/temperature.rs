use crate::labelled;
use topbar_core::StatusState;

/// Displays the smoothed CPU temperature.
#[derive(Debug, Default)]
pub struct TempWidget;

impl TempWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, state: &StatusState) -> String {
        labelled("TEMP", &state.temperature, |temp| format!("{temp:.2} C"))
    }
}
