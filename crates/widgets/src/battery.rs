use crate::labelled;
use topbar_core::StatusState;

/// Displays battery level, charging state, and estimated time remaining.
#[derive(Debug, Default)]
pub struct BatteryWidget;

impl BatteryWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, state: &StatusState) -> String {
        labelled("BAT", &state.battery, |bat| {
            let icon = if bat.charging { "+" } else { "-" };
            format!("{icon}{}% ({})", bat.capacity, bat.remaining)
        })
    }
}
