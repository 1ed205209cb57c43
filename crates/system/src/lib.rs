//! The sampling-and-smoothing engine.
//!
//! Each sampler owns its source handle and its smoothing state; the
//! [`Monitor`] builds them once and runs them one after another per tick.

pub mod audio;
pub mod battery;
pub mod cpu;
pub mod memory;
pub mod smoothing;
pub mod thermal;
pub mod updates;

pub use audio::{AudioSampler, Direction, MixerElement};
pub use battery::BatterySampler;
pub use cpu::CpuSampler;
pub use memory::MemorySampler;
pub use smoothing::{Smoother, SmoothingBuffer};
pub use thermal::{ThermalProbe, ThermalSampler};
pub use updates::{LogSource, UpdateTracker};

use chrono::Local;
use topbar_config::SmoothingConfig;
use topbar_core::{Reading, Result, StatusState};
use tracing::{debug, info, warn};

/// Owns every sampler for the lifetime of the process.
///
/// A sampler whose source could not be opened at start-up is left out for
/// good; its segment reads [`Reading::Unavailable`] on every tick.
pub struct Monitor {
    cpu:         Option<CpuSampler>,
    memory:      Option<MemorySampler>,
    thermal:     Option<ThermalSampler>,
    battery:     Option<BatterySampler>,
    volume:      Option<AudioSampler>,
    microphone:  Option<AudioSampler>,
    updates:     Option<UpdateTracker>,
}

impl Monitor {
    /// Open every source.  Failures are logged once here.
    pub fn new(windows: &SmoothingConfig) -> Self {
        Self {
            cpu:        start("cpu", CpuSampler::new(windows.cpu)),
            memory:     start("memory", MemorySampler::new(windows.memory)),
            thermal:    start("thermal", ThermalSampler::new(windows.thermal)),
            battery:    start("battery", BatterySampler::new(windows.battery)),
            volume:     start("volume", AudioSampler::open(Direction::Playback)),
            microphone: start("microphone", AudioSampler::open(Direction::Capture)),
            updates:    start("updates", UpdateTracker::new()),
        }
    }

    /// Run every sampler once, in order.
    pub fn tick(&mut self) -> StatusState {
        StatusState {
            cpu:         sample("cpu", self.cpu.as_mut(), CpuSampler::sample),
            memory:      sample("memory", self.memory.as_mut(), MemorySampler::sample),
            temperature: sample("thermal", self.thermal.as_mut(), ThermalSampler::sample),
            battery:     sample("battery", self.battery.as_mut(), BatterySampler::sample),
            volume:      sample("volume", self.volume.as_mut(), AudioSampler::sample),
            microphone:  sample("microphone", self.microphone.as_mut(), AudioSampler::sample),
            updates:     sample("updates", self.updates.as_mut(), UpdateTracker::sample),
            time:        Local::now(),
        }
    }
}

fn start<T>(name: &str, opened: Result<T>) -> Option<T> {
    match opened {
        Ok(sampler) => {
            info!("{name} sampler ready");
            Some(sampler)
        }
        Err(e) => {
            warn!("{name} sampler disabled: {e}");
            None
        }
    }
}

fn sample<S, T>(
    name: &str,
    sampler: Option<&mut S>,
    read: impl FnOnce(&mut S) -> Result<T>,
) -> Reading<T> {
    let Some(sampler) = sampler else {
        return Reading::Unavailable;
    };
    let result = read(sampler);
    if let Err(e) = &result {
        debug!("{name}: {e}");
    }
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use topbar_core::TopbarError;

    #[test]
    fn missing_sampler_reads_unavailable() {
        let cpu: Option<&mut CpuSampler> = None;
        let reading = sample("cpu", cpu, CpuSampler::sample);
        assert_eq!(reading, Reading::Unavailable);
    }

    #[test]
    fn failed_read_is_invalid_not_fatal() {
        let mut smoother = Smoother::new(3);
        smoother.push(10.0);

        let reading = sample("thermal", Some(&mut smoother), |_| -> Result<f64> {
            Err(TopbarError::invalid("thermal", "bad reading"))
        });
        assert!(matches!(reading, Reading::Invalid(_)));
        assert_eq!(smoother.average(), Some(10.0));
    }
}
