use crate::smoothing::Smoother;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use topbar_core::{MemoryUsage, Result, TopbarError};

pub const PROC_MEMINFO: &str = "/proc/meminfo";

/// `/proc/meminfo` reports kibibytes.
const KIB_TO_GIB: f64 = 1.0 / 1_048_576.0;

/// The counters used to derive "used" memory, in kiB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemInfo {
    pub total:       f64,
    pub free:        f64,
    pub buffers:     f64,
    pub cached:      f64,
    pub reclaimable: f64,
}

impl MemInfo {
    /// Parse `Key:   value kB` lines, looking fields up by name so the order
    /// of the file does not matter.
    pub fn parse(raw: &str) -> Result<Self> {
        let fields: HashMap<&str, &str> = raw
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(key, rest)| (key.trim(), rest.trim()))
            .collect();

        let get = |key: &str| -> Result<f64> {
            let value = fields
                .get(key)
                .ok_or_else(|| TopbarError::invalid("memory", format!("missing {key}")))?;
            let number = value.split_whitespace().next().unwrap_or_default();
            number
                .parse::<f64>()
                .map_err(|e| TopbarError::invalid("memory", format!("bad {key} '{number}': {e}")))
        };

        Ok(Self {
            total:       get("MemTotal")?,
            free:        get("MemFree")?,
            buffers:     get("Buffers")?,
            cached:      get("Cached")?,
            reclaimable: get("SReclaimable")?,
        })
    }

    /// Memory not accounted for by free, buffer, page-cache or reclaimable
    /// slab pages.
    pub fn used(&self) -> f64 {
        self.total - self.free - self.buffers - self.cached - self.reclaimable
    }
}

#[derive(Debug, Clone)]
pub struct MemorySampler {
    path:     PathBuf,
    smoother: Smoother,
}

impl MemorySampler {
    pub fn new(window: usize) -> Result<Self> {
        Self::with_path(PROC_MEMINFO, window)
    }

    pub fn with_path(path: impl AsRef<Path>, window: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(TopbarError::unavailable(
                "memory",
                format!("'{}' does not exist", path.display()),
            ));
        }
        Ok(Self {
            path,
            smoother: Smoother::new(window),
        })
    }

    pub fn sample(&mut self) -> Result<MemoryUsage> {
        let raw = std::fs::read_to_string(&self.path)?;
        let info = MemInfo::parse(&raw)?;
        self.update(&info)
    }

    pub fn update(&mut self, info: &MemInfo) -> Result<MemoryUsage> {
        if info.total <= 0.0 {
            return Err(TopbarError::invalid("memory", "MemTotal is zero"));
        }

        let used = self.smoother.push(info.used());
        Ok(MemoryUsage {
            used_gib:  used * KIB_TO_GIB,
            total_gib: info.total * KIB_TO_GIB,
            percent:   used / info.total * 100.0,
        })
    }
}
