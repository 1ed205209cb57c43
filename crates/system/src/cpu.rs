use crate::smoothing::Smoother;
use std::path::{Path, PathBuf};
use topbar_core::{Result, TopbarError};

pub const PROC_STAT: &str = "/proc/stat";

/// Position of the idle counter on the aggregate `cpu` line.
const IDLE: usize = 3;

/// Turns the cumulative jiffy counters of `/proc/stat` into a smoothed
/// utilisation percentage.
#[derive(Debug, Clone)]
pub struct CpuSampler {
    path:     PathBuf,
    previous: Option<Totals>,
    smoother: Smoother,
}

#[derive(Debug, Clone, Copy)]
struct Totals {
    idle:  u64,
    total: u64,
}

impl CpuSampler {
    /// Open the sampler on `/proc/stat` and take the baseline reading, so
    /// the first [`sample`](Self::sample) already has a real delta.
    pub fn new(window: usize) -> Result<Self> {
        Self::with_path(PROC_STAT, window)
    }

    pub fn with_path(path: impl AsRef<Path>, window: usize) -> Result<Self> {
        let mut sampler = Self::unprimed(path, window);
        let counters = sampler
            .read()
            .map_err(|e| TopbarError::unavailable("cpu", e.to_string()))?;
        sampler.update(&counters)?;
        Ok(sampler)
    }

    fn unprimed(path: impl AsRef<Path>, window: usize) -> Self {
        Self {
            path:     path.as_ref().to_path_buf(),
            previous: None,
            smoother: Smoother::new(window),
        }
    }

    pub fn sample(&mut self) -> Result<f64> {
        let counters = self.read()?;
        self.update(&counters)?
            .ok_or_else(|| TopbarError::invalid("cpu", "no time elapsed since the baseline"))
    }

    /// Feed one tick's counters.
    ///
    /// Returns `Ok(None)` while there is nothing to compare against (the
    /// very first reading).  When the counters did not move at all the last
    /// smoothed value is returned unchanged.
    pub fn update(&mut self, counters: &[u64]) -> Result<Option<f64>> {
        if counters.len() <= IDLE {
            return Err(TopbarError::invalid(
                "cpu",
                format!("expected at least {} counters, got {}", IDLE + 1, counters.len()),
            ));
        }

        let current = Totals {
            idle:  counters[IDLE],
            total: counters.iter().sum(),
        };
        let Some(previous) = self.previous.replace(current) else {
            return Ok(None);
        };

        let idle_delta  = current.idle.saturating_sub(previous.idle) as f64;
        let total_delta = current.total.saturating_sub(previous.total) as f64;
        if total_delta == 0.0 {
            return Ok(self.smoother.average());
        }

        let usage = (100.0 * (1.0 - idle_delta / total_delta)).clamp(0.0, 100.0);
        Ok(Some(self.smoother.push(usage)))
    }

    fn read(&self) -> Result<Vec<u64>> {
        let raw = std::fs::read_to_string(&self.path)?;
        parse_counters(&raw)
    }
}

/// Parse the aggregate `cpu  …` line (the first line of `/proc/stat`).
fn parse_counters(raw: &str) -> Result<Vec<u64>> {
    let line = raw
        .lines()
        .next()
        .ok_or_else(|| TopbarError::invalid("cpu", "empty stat file"))?;

    let mut fields = line.split_whitespace();
    if fields.next() != Some("cpu") {
        return Err(TopbarError::invalid("cpu", "first line is not the aggregate cpu line"));
    }

    fields
        .map(|f| {
            f.parse::<u64>()
                .map_err(|e| TopbarError::invalid("cpu", format!("bad counter '{f}': {e}")))
        })
        .collect()
}
