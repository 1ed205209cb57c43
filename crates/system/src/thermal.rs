use crate::smoothing::Smoother;
use std::path::{Path, PathBuf};
use topbar_core::{Result, TopbarError};
use tracing::info;

pub const HWMON_DIR: &str = "/sys/class/hwmon";

/// hwmon chip names that carry the CPU package / die temperature.
pub const KNOWN_CHIPS: [&str; 6] = [
    "coretemp",
    "via_cputemp",
    "cpu_thermal",
    "k10temp",
    "zenpower",
    "acpitz",
];

/// Feature holding the primary reading (package id / Tctl / zone 0).
const PRIMARY_FEATURE: &str = "temp1";

/// A resolved temperature input, found once at start-up.
#[derive(Debug, Clone)]
pub struct ThermalProbe {
    chip:  String,
    input: PathBuf,
}

impl ThermalProbe {
    /// Walk `root` (normally `/sys/class/hwmon`) in index order and bind to
    /// the primary input of the first known chip.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut chips: Vec<PathBuf> = std::fs::read_dir(root)
            .map_err(|e| TopbarError::unavailable("thermal", format!("{}: {e}", root.display())))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        chips.sort_by_key(|path| hwmon_index(path));

        for dir in chips {
            let Ok(name) = std::fs::read_to_string(dir.join("name")) else {
                continue;
            };
            let name = name.trim();
            if !KNOWN_CHIPS.contains(&name) {
                continue;
            }

            info!("Found temperature chip '{name}' at {}", dir.display());
            let input = primary_input(&dir).ok_or_else(|| {
                TopbarError::unavailable(
                    "thermal",
                    format!("chip '{name}' has no {PRIMARY_FEATURE} input"),
                )
            })?;
            info!("Selected temperature input {}", input.display());

            return Ok(Self {
                chip: name.to_string(),
                input,
            });
        }

        Err(TopbarError::unavailable(
            "thermal",
            format!("no known chip under {}", root.display()),
        ))
    }

    pub fn chip(&self) -> &str {
        &self.chip
    }

    /// Current reading in °C (hwmon reports millidegrees).
    pub fn read_celsius(&self) -> Result<f64> {
        let raw = std::fs::read_to_string(&self.input)?;
        let milli = raw.trim().parse::<f64>().map_err(|e| {
            TopbarError::invalid("thermal", format!("bad reading '{}': {e}", raw.trim()))
        })?;
        Ok(milli / 1000.0)
    }
}

fn hwmon_index(path: &Path) -> u32 {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.trim_start_matches("hwmon").parse().ok())
        .unwrap_or(u32::MAX)
}

/// `temp1_input` itself, else the lowest-numbered `temp*_input` whose
/// feature name contains [`PRIMARY_FEATURE`].
fn primary_input(dir: &Path) -> Option<PathBuf> {
    let exact = dir.join(format!("{PRIMARY_FEATURE}_input"));
    if exact.exists() {
        return Some(exact);
    }

    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
        .filter_map(|name| {
            let feature = name.strip_suffix("_input")?;
            if !feature.contains(PRIMARY_FEATURE) {
                return None;
            }
            let index = feature.trim_start_matches("temp").parse::<u32>().unwrap_or(u32::MAX);
            Some((index, name))
        })
        .min()
        .map(|(_, name)| dir.join(name))
}

#[derive(Debug, Clone)]
pub struct ThermalSampler {
    probe:    ThermalProbe,
    smoother: Smoother,
}

impl ThermalSampler {
    pub fn new(window: usize) -> Result<Self> {
        Ok(Self::with_probe(ThermalProbe::discover(HWMON_DIR)?, window))
    }

    pub fn with_probe(probe: ThermalProbe, window: usize) -> Self {
        Self {
            probe,
            smoother: Smoother::new(window),
        }
    }

    pub fn sample(&mut self) -> Result<f64> {
        let celsius = self.probe.read_celsius()?;
        Ok(self.smoother.push(celsius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn chip(root: &TempDir, index: u32, name: &str, inputs: &[(&str, &str)]) -> PathBuf {
        let dir = root.path().join(format!("hwmon{index}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), format!("{name}\n")).unwrap();
        for (file, value) in inputs {
            fs::write(dir.join(file), value).unwrap();
        }
        dir
    }

    #[test]
    fn picks_first_known_chip_and_temp1() {
        let root = tempdir().unwrap();
        chip(&root, 0, "nvme", &[("temp1_input", "38000\n")]);
        chip(&root, 2, "k10temp", &[("temp1_input", "51500\n")]);
        let coretemp = chip(
            &root,
            1,
            "coretemp",
            &[("temp2_input", "40000\n"), ("temp1_input", "47250\n")],
        );

        let probe = ThermalProbe::discover(root.path()).unwrap();
        assert_eq!(probe.chip(), "coretemp");
        assert_eq!(probe.input, coretemp.join("temp1_input"));
        assert_eq!(probe.read_celsius().unwrap(), 47.25);
    }

    #[test]
    fn temp1_wins_over_temp10() {
        let root = tempdir().unwrap();
        let dir = chip(
            &root,
            0,
            "coretemp",
            &[("temp10_input", "40000\n"), ("temp1_input", "80000\n")],
        );

        let probe = ThermalProbe::discover(root.path()).unwrap();
        assert_eq!(probe.input, dir.join("temp1_input"));
        assert_eq!(probe.read_celsius().unwrap(), 80.0);
    }

    #[test]
    fn without_temp1_lowest_numbered_match_wins() {
        let root = tempdir().unwrap();
        let dir = chip(
            &root,
            0,
            "coretemp",
            &[("temp12_input", "45000\n"), ("temp10_input", "40000\n"), ("temp11_input", "41000\n")],
        );

        let probe = ThermalProbe::discover(root.path()).unwrap();
        assert_eq!(probe.input, dir.join("temp10_input"));
    }

    #[test]
    fn no_known_chip_is_unavailable() {
        let root = tempdir().unwrap();
        chip(&root, 0, "nvme", &[("temp1_input", "38000\n")]);

        let err = ThermalProbe::discover(root.path()).unwrap_err();
        assert!(matches!(err, TopbarError::Unavailable { sampler: "thermal", .. }));
    }

    #[test]
    fn known_chip_without_temp1_is_unavailable() {
        let root = tempdir().unwrap();
        chip(&root, 0, "acpitz", &[("temp3_input", "38000\n")]);

        assert!(ThermalProbe::discover(root.path()).is_err());
    }

    #[test]
    fn readings_are_smoothed() {
        let root = tempdir().unwrap();
        let dir = chip(&root, 0, "zenpower", &[("temp1_input", "40000\n")]);

        let mut thermal = ThermalSampler::with_probe(ThermalProbe::discover(root.path()).unwrap(), 2);
        assert_eq!(thermal.sample().unwrap(), 40.0);

        fs::write(dir.join("temp1_input"), "50000\n").unwrap();
        assert_eq!(thermal.sample().unwrap(), 45.0);
    }

    #[test]
    fn garbage_reading_is_invalid() {
        let root = tempdir().unwrap();
        chip(&root, 0, "cpu_thermal", &[("temp1_input", "n/a\n")]);

        let mut thermal = ThermalSampler::with_probe(ThermalProbe::discover(root.path()).unwrap(), 2);
        assert!(matches!(thermal.sample(), Err(TopbarError::InvalidReading { .. })));
    }
}
