use crate::labelled;
use topbar_core::StatusState;

/// Displays the time since the last full system upgrade.
#[derive(Debug, Default)]
pub struct UpdatesWidget;

impl UpdatesWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, state: &StatusState) -> String {
        labelled("UPD", &state.updates, String::clone)
    }
}
