use crate::error::TopbarError;
use chrono::{DateTime, Local};

/// Everything one tick produced. Widgets read only from this.
#[derive(Debug, Clone)]
pub struct StatusState {
    /// Smoothed CPU utilisation (0.0 – 100.0).
    pub cpu: Reading<f64>,
    pub memory: Reading<MemoryUsage>,
    /// Smoothed temperature of the primary probe in °C.
    pub temperature: Reading<f64>,
    /// Playback ("Master") level.
    pub volume: Reading<AudioLevel>,
    /// Capture ("Capture") level.
    pub microphone: Reading<AudioLevel>,
    pub battery: Reading<BatteryStatus>,
    /// Time since the last full system upgrade, already formatted.
    pub updates: Reading<String>,
    /// Wall-clock time the tick was taken at.
    pub time: DateTime<Local>,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            cpu: Reading::Unavailable,
            memory: Reading::Unavailable,
            temperature: Reading::Unavailable,
            volume: Reading::Unavailable,
            microphone: Reading::Unavailable,
            battery: Reading::Unavailable,
            updates: Reading::Unavailable,
            time: Local::now(),
        }
    }
}

/// Outcome of sampling one source for one tick.
///
/// Sampler-local failures never abort the tick; they land here and the
/// display layer decides what placeholder to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    Ok(T),
    /// The source answered with data that could not be used this tick.
    Invalid(String),
    /// The source was not found at start-up (or has no value yet).
    Unavailable,
}

impl<T> Reading<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Result<T, TopbarError>> for Reading<T> {
    fn from(result: Result<T, TopbarError>) -> Self {
        match result {
            Ok(v) => Self::Ok(v),
            Err(TopbarError::Unavailable { .. }) => Self::Unavailable,
            Err(e) => Self::Invalid(e.to_string()),
        }
    }
}

/// Memory usage derived from one `/proc/meminfo` snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryUsage {
    /// Smoothed used memory in GiB.
    pub used_gib: f64,
    pub total_gib: f64,
    /// Smoothed used memory as a percentage of total.
    pub percent: f64,
}

/// Battery charge regime, inferred from the textual `status` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeState {
    Charging,
    Discharging,
}

impl ChargeState {
    /// Anything other than the literal `"Discharging"` counts as charging
    /// (`"Charging"`, `"Full"`, `"Not charging"`, `"Unknown"` …).
    pub fn from_status(status: &str) -> Self {
        if status.trim() == "Discharging" {
            Self::Discharging
        } else {
            Self::Charging
        }
    }

    pub fn is_charging(self) -> bool {
        self == Self::Charging
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryStatus {
    /// Charge level (0–100).
    pub capacity: u8,
    pub charging: bool,
    /// Smoothed time estimate as `H:MM`; `"0:00"` when the draw is zero.
    pub remaining: String,
}

/// Normalised level of one mixer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioLevel {
    /// Louder of the two front channels (0–100).
    pub level: u8,
    /// `true` when at least one front channel switch is on (not muted).
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_discharging_is_discharging() {
        assert_eq!(ChargeState::from_status("Discharging\n"), ChargeState::Discharging);
        assert_eq!(ChargeState::from_status("Charging"), ChargeState::Charging);
        assert_eq!(ChargeState::from_status("Full"), ChargeState::Charging);
        assert_eq!(ChargeState::from_status("Not charging"), ChargeState::Charging);
    }

    #[test]
    fn unavailable_error_maps_to_unavailable_reading() {
        let r = Reading::from(Err::<f64, _>(TopbarError::unavailable("thermal", "no probe")));
        assert_eq!(r, Reading::Unavailable);

        let r = Reading::from(Err::<f64, _>(TopbarError::invalid("cpu", "short line")));
        assert!(matches!(r, Reading::Invalid(msg) if msg.contains("short line")));
    }
}
