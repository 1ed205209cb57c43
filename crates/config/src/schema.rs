use serde::{Deserialize, Serialize};
use topbar_core::{Result, TopbarError};

/// Root configuration structure parsed from `topbar.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopbarConfig {
    /// Global settings for the tick loop and output line.
    pub global: GlobalConfig,
    /// Moving-average window sizes, in samples.
    pub smoothing: SmoothingConfig,
    pub clock: ClockConfig,
    /// Segments printed left to right.
    pub segments: Vec<SegmentKind>,
}

impl Default for TopbarConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            smoothing: SmoothingConfig::default(),
            clock: ClockConfig::default(),
            segments: SegmentKind::ALL.to_vec(),
        }
    }
}

impl TopbarConfig {
    /// Reject values the samplers cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.global.interval_ms == 0 {
            return Err(TopbarError::Config("global.interval_ms must be > 0".into()));
        }

        let windows = [
            ("cpu", self.smoothing.cpu),
            ("memory", self.smoothing.memory),
            ("thermal", self.smoothing.thermal),
            ("battery", self.smoothing.battery),
        ];
        for (name, size) in windows {
            if size == 0 {
                return Err(TopbarError::Config(format!(
                    "smoothing.{name} must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

/// Global bar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Text placed between two segments.
    pub separator: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            interval_ms: 250,
            separator: " | ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub cpu: usize,
    pub memory: usize,
    pub thermal: usize,
    /// Window for the remaining-time estimate.
    pub battery: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            cpu: 10,
            memory: 5,
            thermal: 5,
            battery: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// `strftime` format string for the clock segment.
    pub format: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// One printable segment of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Cpu,
    Memory,
    Temperature,
    Volume,
    Microphone,
    Battery,
    Updates,
    Clock,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 8] = [
        SegmentKind::Cpu,
        SegmentKind::Memory,
        SegmentKind::Temperature,
        SegmentKind::Volume,
        SegmentKind::Microphone,
        SegmentKind::Battery,
        SegmentKind::Updates,
        SegmentKind::Clock,
    ];
}
