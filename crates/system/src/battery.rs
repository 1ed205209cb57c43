use crate::smoothing::Smoother;
use std::path::{Path, PathBuf};
use topbar_core::{BatteryStatus, ChargeState, Result, TopbarError};
use tracing::info;

pub const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

const BATTERY_PREFIX: &str = "BAT";

/// sysfs reports µW / µWh (or µA / µAh).
const DEVICE_SCALE: f64 = 1e-6;

/// Label shown when there is no draw to divide by.
pub const UNKNOWN_REMAINING: &str = "0:00";

/// One raw read of a battery's sysfs attributes, already scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    pub capacity: u8,
    pub state:    ChargeState,
    /// Instantaneous draw (W or A).
    pub power:    f64,
    /// Energy left (Wh or Ah).
    pub now:      f64,
    /// Energy when full (Wh or Ah).
    pub full:     f64,
}

impl BatteryReading {
    /// Read `capacity`, `status` and the energy attributes of one supply.
    ///
    /// Batteries that report charge (`charge_*`, `current_now`) instead of
    /// energy are handled the same way; only the ratio matters.
    pub fn read(dir: &Path) -> Result<Self> {
        let capacity = read_attr(dir, "capacity")?;
        let capacity = capacity.parse::<u16>().map_err(|e| {
            TopbarError::invalid("battery", format!("bad capacity '{capacity}': {e}"))
        })?;
        let status = read_attr(dir, "status")?;

        Ok(Self {
            capacity: capacity.min(100) as u8,
            state:    ChargeState::from_status(&status),
            power:    read_scaled(dir, &["power_now", "current_now"])?,
            now:      read_scaled(dir, &["energy_now", "charge_now"])?,
            full:     read_scaled(dir, &["energy_full", "charge_full"])?,
        })
    }
}

fn read_attr(dir: &Path, name: &str) -> Result<String> {
    std::fs::read_to_string(dir.join(name))
        .map(|s| s.trim().to_string())
        .map_err(|e| TopbarError::invalid("battery", format!("{name}: {e}")))
}

/// First attribute of `names` that exists, scaled from device units.
fn read_scaled(dir: &Path, names: &[&str]) -> Result<f64> {
    let name = names
        .iter()
        .find(|name| dir.join(name).exists())
        .ok_or_else(|| TopbarError::invalid("battery", format!("none of {names:?} present")))?;

    let raw = read_attr(dir, name)?;
    let value = raw
        .parse::<f64>()
        .map_err(|e| TopbarError::invalid("battery", format!("bad {name} '{raw}': {e}")))?;
    Ok(value.abs() * DEVICE_SCALE)
}

/// Find the lowest-numbered `BAT<n>` supply under `root`.
pub fn discover(root: impl AsRef<Path>) -> Result<PathBuf> {
    let root = root.as_ref();
    std::fs::read_dir(root)
        .map_err(|e| TopbarError::unavailable("battery", format!("{}: {e}", root.display())))?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().into_string().ok()?;
            let index = name.strip_prefix(BATTERY_PREFIX)?.parse::<u32>().ok()?;
            Some((index, entry.path()))
        })
        .min_by_key(|(index, _)| *index)
        .map(|(_, path)| path)
        .ok_or_else(|| TopbarError::unavailable("battery", "no battery present"))
}

/// Capacity, charge state and a smoothed time-remaining estimate.
///
/// The estimate is smoothed only within one charge regime: when the
/// battery switches between charging and discharging the window is
/// refilled with the first estimate of the new regime.
#[derive(Debug, Clone)]
pub struct BatterySampler {
    dir:      PathBuf,
    regime:   Option<ChargeState>,
    smoother: Smoother,
}

impl BatterySampler {
    pub fn new(window: usize) -> Result<Self> {
        let dir = discover(POWER_SUPPLY_DIR)?;
        info!("Using battery {}", dir.display());
        Ok(Self::with_dir(dir, window))
    }

    pub fn with_dir(dir: impl AsRef<Path>, window: usize) -> Self {
        Self {
            dir:      dir.as_ref().to_path_buf(),
            regime:   None,
            smoother: Smoother::new(window),
        }
    }

    pub fn sample(&mut self) -> Result<BatteryStatus> {
        let reading = BatteryReading::read(&self.dir)?;
        Ok(self.update(&reading))
    }

    pub fn update(&mut self, reading: &BatteryReading) -> BatteryStatus {
        let charging = reading.state.is_charging();
        let remaining = if reading.power > 0.0 {
            let energy = if charging { reading.full } else { reading.now };
            format_hours(self.estimate(reading.state, energy / reading.power))
        } else {
            // The regime is not recorded either, so a flip that happens
            // while the draw reads zero still resets the window later.
            UNKNOWN_REMAINING.to_string()
        };

        BatteryStatus {
            capacity: reading.capacity,
            charging,
            remaining,
        }
    }

    fn estimate(&mut self, state: ChargeState, hours: f64) -> f64 {
        match self.regime.replace(state) {
            Some(previous) if previous == state => self.smoother.push(hours),
            _ => self.smoother.reset(hours),
        }
    }
}

/// Format fractional hours as `H:MM`.
pub fn format_hours(hours: f64) -> String {
    let minutes = (hours * 60.0).round().max(0.0) as u64;
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn reading(state: ChargeState, power: f64, now: f64, full: f64) -> BatteryReading {
        BatteryReading {
            capacity: 50,
            state,
            power,
            now,
            full,
        }
    }

    #[test]
    fn zero_draw_is_unknown() {
        let mut battery = BatterySampler::with_dir("/nonexistent", 4);
        for state in [ChargeState::Charging, ChargeState::Discharging] {
            let status = battery.update(&reading(state, 0.0, 40.0, 50.0));
            assert_eq!(status.remaining, UNKNOWN_REMAINING);
        }
        assert_eq!(battery.smoother.average(), None);
    }

    #[test]
    fn discharging_uses_current_energy() {
        let mut battery = BatterySampler::with_dir("/nonexistent", 4);
        let status = battery.update(&reading(ChargeState::Discharging, 10.0, 25.0, 50.0));
        assert_eq!(status.remaining, "2:30");
        assert!(!status.charging);
    }

    #[test]
    fn charging_uses_full_energy() {
        let mut battery = BatterySampler::with_dir("/nonexistent", 4);
        let status = battery.update(&reading(ChargeState::Charging, 20.0, 25.0, 50.0));
        assert_eq!(status.remaining, "2:30");
        assert!(status.charging);
    }

    #[test]
    fn same_regime_is_smoothed() {
        let mut battery = BatterySampler::with_dir("/nonexistent", 4);
        battery.update(&reading(ChargeState::Discharging, 10.0, 40.0, 50.0));
        let status = battery.update(&reading(ChargeState::Discharging, 10.0, 30.0, 50.0));
        // (4h * 3 + 3h) / 4
        assert_eq!(status.remaining, "3:45");
    }

    #[test]
    fn regime_flip_resets_window() {
        let mut battery = BatterySampler::with_dir("/nonexistent", 4);
        battery.update(&reading(ChargeState::Discharging, 10.0, 40.0, 50.0));
        battery.update(&reading(ChargeState::Discharging, 10.0, 10.0, 50.0));

        let status = battery.update(&reading(ChargeState::Charging, 10.0, 10.0, 50.0));
        assert_eq!(status.remaining, "5:00");
        assert_eq!(battery.smoother.average(), Some(5.0));

        let status = battery.update(&reading(ChargeState::Discharging, 10.0, 10.0, 50.0));
        assert_eq!(status.remaining, "1:00");
    }

    #[test]
    fn flip_during_zero_draw_still_resets() {
        let mut battery = BatterySampler::with_dir("/nonexistent", 4);
        battery.update(&reading(ChargeState::Discharging, 10.0, 40.0, 50.0));
        battery.update(&reading(ChargeState::Charging, 0.0, 40.0, 50.0));

        let status = battery.update(&reading(ChargeState::Charging, 10.0, 40.0, 60.0));
        assert_eq!(status.remaining, "6:00");
    }

    #[test]
    fn formats_hours_with_padded_minutes() {
        assert_eq!(format_hours(0.0), "0:00");
        assert_eq!(format_hours(1.05), "1:03");
        assert_eq!(format_hours(12.5), "12:30");
    }

    #[test]
    fn discovers_lowest_battery() {
        let root = tempdir().unwrap();
        for name in ["AC", "BAT1", "BAT0", "BAT10", "ucsi-source-psy-USBC000:001"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        assert_eq!(discover(root.path()).unwrap(), root.path().join("BAT0"));
    }

    #[test]
    fn no_battery_is_unavailable() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("AC")).unwrap();
        assert!(matches!(
            discover(root.path()),
            Err(TopbarError::Unavailable { sampler: "battery", .. })
        ));
    }

    #[test]
    fn reads_energy_attributes() {
        let root = tempdir().unwrap();
        let dir = root.path().join("BAT0");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("capacity"), "81\n").unwrap();
        fs::write(dir.join("status"), "Discharging\n").unwrap();
        fs::write(dir.join("power_now"), "12000000\n").unwrap();
        fs::write(dir.join("energy_now"), "36000000\n").unwrap();
        fs::write(dir.join("energy_full"), "48000000\n").unwrap();

        let mut battery = BatterySampler::with_dir(&dir, 4);
        let status = battery.sample().unwrap();
        assert_eq!(status.capacity, 81);
        assert!(!status.charging);
        assert_eq!(status.remaining, "3:00");
    }

    #[test]
    fn reads_charge_attributes() {
        let root = tempdir().unwrap();
        let dir = root.path().join("BAT1");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("capacity"), "100\n").unwrap();
        fs::write(dir.join("status"), "Full\n").unwrap();
        fs::write(dir.join("current_now"), "0\n").unwrap();
        fs::write(dir.join("charge_now"), "3000000\n").unwrap();
        fs::write(dir.join("charge_full"), "3000000\n").unwrap();

        let status = BatterySampler::with_dir(&dir, 4).sample().unwrap();
        assert!(status.charging);
        assert_eq!(status.remaining, UNKNOWN_REMAINING);
    }

    #[test]
    fn missing_attribute_is_invalid() {
        let root = tempdir().unwrap();
        let dir = root.path().join("BAT0");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("capacity"), "50\n").unwrap();

        let err = BatterySampler::with_dir(&dir, 4).sample().unwrap_err();
        assert!(matches!(err, TopbarError::InvalidReading { sampler: "battery", .. }));
    }
}
