use crate::labelled;
use topbar_core::{AudioLevel, Reading};

/// Displays a mixer level; shows `muted` when both front channels are off.
///
/// One instance per device: speakers (`VOL`) and microphone (`MIC`).
#[derive(Debug)]
pub struct VolumeWidget {
    label: &'static str,
}

impl VolumeWidget {
    pub fn playback() -> Self {
        Self { label: "VOL" }
    }

    pub fn capture() -> Self {
        Self { label: "MIC" }
    }

    pub fn render(&self, level: &Reading<AudioLevel>) -> String {
        labelled(self.label, level, |level| {
            if level.active {
                format!("{}%", level.level)
            } else {
                "muted".to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_hides_level() {
        let level = Reading::Ok(AudioLevel { level: 40, active: false });
        assert_eq!(VolumeWidget::capture().render(&level), "MIC: muted");
    }

    #[test]
    fn active_shows_level() {
        let level = Reading::Ok(AudioLevel { level: 40, active: true });
        assert_eq!(VolumeWidget::playback().render(&level), "VOL: 40%");
    }
}
