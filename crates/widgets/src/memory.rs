use crate::labelled;
use topbar_core::StatusState;

/// Displays RAM usage as `used / total GiB (X%)`.
#[derive(Debug, Default)]
pub struct MemoryWidget;

impl MemoryWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, state: &StatusState) -> String {
        labelled("RAM", &state.memory, |mem| {
            format!("{:.2} / {:.2} GiB ({:.2}%)", mem.used_gib, mem.total_gib, mem.percent)
        })
    }
}
