use crate::labelled;
use topbar_core::StatusState;

/// Displays smoothed CPU usage as a percentage.
#[derive(Debug, Default)]
pub struct CpuWidget;

impl CpuWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, state: &StatusState) -> String {
        labelled("CPU", &state.cpu, |pct| format!("{pct:.2}%"))
    }
}
