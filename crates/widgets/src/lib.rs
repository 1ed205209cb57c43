//! Text renderers for each status-line segment.

pub mod battery;
pub mod clock;
pub mod cpu;
pub mod memory;
pub mod temperature;
pub mod updates;
pub mod volume;

pub use battery::BatteryWidget;
pub use clock::ClockWidget;
pub use cpu::CpuWidget;
pub use memory::MemoryWidget;
pub use temperature::TempWidget;
pub use updates::UpdatesWidget;
pub use volume::VolumeWidget;

use topbar_config::{SegmentKind, TopbarConfig};
use topbar_core::{Reading, StatusState};

/// Shown in place of a value the sampler could not provide this tick.
pub const PLACEHOLDER: &str = "--";

/// Renders a [`StatusState`] into one line, segment by segment.
#[derive(Debug)]
pub struct StatusLine {
    segments:   Vec<SegmentKind>,
    separator:  String,
    cpu:        CpuWidget,
    memory:     MemoryWidget,
    temp:       TempWidget,
    volume:     VolumeWidget,
    microphone: VolumeWidget,
    battery:    BatteryWidget,
    updates:    UpdatesWidget,
    clock:      ClockWidget,
}

impl StatusLine {
    pub fn from_config(config: &TopbarConfig) -> Self {
        Self {
            segments:   config.segments.clone(),
            separator:  config.global.separator.clone(),
            cpu:        CpuWidget::new(),
            memory:     MemoryWidget::new(),
            temp:       TempWidget::new(),
            volume:     VolumeWidget::playback(),
            microphone: VolumeWidget::capture(),
            battery:    BatteryWidget::new(),
            updates:    UpdatesWidget::new(),
            clock:      ClockWidget::new(&config.clock.format),
        }
    }

    pub fn render(&self, state: &StatusState) -> String {
        self.segments
            .iter()
            .map(|kind| self.segment(*kind, state))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    fn segment(&self, kind: SegmentKind, state: &StatusState) -> String {
        match kind {
            SegmentKind::Cpu => self.cpu.render(state),
            SegmentKind::Memory => self.memory.render(state),
            SegmentKind::Temperature => self.temp.render(state),
            SegmentKind::Volume => self.volume.render(&state.volume),
            SegmentKind::Microphone => self.microphone.render(&state.microphone),
            SegmentKind::Battery => self.battery.render(state),
            SegmentKind::Updates => self.updates.render(state),
            SegmentKind::Clock => self.clock.render(state),
        }
    }
}

/// `label: value`, or `label: --` when the reading is missing.
pub(crate) fn labelled<T>(label: &str, reading: &Reading<T>, value: impl FnOnce(&T) -> String) -> String {
    match reading.value() {
        Some(v) => format!("{label}: {}", value(v)),
        None => format!("{label}: {PLACEHOLDER}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topbar_core::{AudioLevel, MemoryUsage};

    fn state() -> StatusState {
        StatusState {
            cpu: Reading::Ok(12.5),
            memory: Reading::Ok(MemoryUsage {
                used_gib: 3.5,
                total_gib: 16.0,
                percent: 21.8,
            }),
            temperature: Reading::Invalid("bad reading".into()),
            volume: Reading::Ok(AudioLevel { level: 70, active: true }),
            ..StatusState::default()
        }
    }

    #[test]
    fn renders_selected_segments_in_order() {
        let mut config = TopbarConfig::default();
        config.segments = vec![
            SegmentKind::Memory,
            SegmentKind::Cpu,
            SegmentKind::Temperature,
            SegmentKind::Volume,
            SegmentKind::Microphone,
        ];
        config.global.separator = " | ".into();

        let line = StatusLine::from_config(&config).render(&state());
        assert_eq!(
            line,
            "RAM: 3.50 / 16.00 GiB (21.80%) | CPU: 12.50% | TEMP: -- | VOL: 70% | MIC: --"
        );
    }

    #[test]
    fn empty_segment_list_renders_nothing() {
        let mut config = TopbarConfig::default();
        config.segments.clear();
        assert_eq!(StatusLine::from_config(&config).render(&state()), "");
    }
}
