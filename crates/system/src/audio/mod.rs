//! Playback / capture level sampling on top of a mixer element.
//!
//! The arithmetic lives here and is backend-agnostic; the ALSA binding in
//! [`alsa_mixer`] is only compiled with the `alsa` feature.

#[cfg(feature = "alsa")]
pub mod alsa_mixer;

use topbar_core::{AudioLevel, Result, TopbarError};

/// Default card opened for both devices.
pub const DEFAULT_CARD: &str = "default";
/// Simple element driving the speakers / headphones.
pub const PLAYBACK_ELEMENT: &str = "Master";
/// Simple element driving the microphone.
pub const CAPTURE_ELEMENT: &str = "Capture";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Playback,
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    FrontLeft,
    FrontRight,
}

pub const FRONT: [Channel; 2] = [Channel::FrontLeft, Channel::FrontRight];

/// A mixer element handle, bound to one direction at start-up.
pub trait MixerElement {
    /// Pull pending mixer events so subsequent reads see fresh values.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    /// `(min, max)` in raw device units.
    fn volume_range(&self) -> Result<(i64, i64)>;

    fn volume(&self, channel: Channel) -> Result<i64>;

    /// Channel switch; `true` means the channel is on (not muted).
    fn switch(&self, channel: Channel) -> Result<bool>;

    fn set_volume(&mut self, channel: Channel, raw: i64) -> Result<()>;
}

/// Reads and sets the level of one mixer element on a 0–100 scale.
///
/// Every mixer call is checked; the first failure aborts the tick for this
/// device and is returned to the caller.
pub struct AudioSampler {
    element: Box<dyn MixerElement>,
}

impl AudioSampler {
    pub fn new(element: Box<dyn MixerElement>) -> Self {
        Self { element }
    }

    /// Open the default card's element for `direction`.
    pub fn open(direction: Direction) -> Result<Self> {
        Ok(Self::new(open_element(direction)?))
    }

    pub fn sample(&mut self) -> Result<AudioLevel> {
        self.element.refresh()?;
        let (min, max) = self.element.volume_range()?;

        let left  = self.element.volume(Channel::FrontLeft)?;
        let right = self.element.volume(Channel::FrontRight)?;
        let left_on  = self.element.switch(Channel::FrontLeft)?;
        let right_on = self.element.switch(Channel::FrontRight)?;

        Ok(AudioLevel {
            level:  to_percent(left, min, max).max(to_percent(right, min, max)),
            active: left_on || right_on,
        })
    }

    /// Set both front channels to `percent` (0–100).  Out-of-range requests
    /// are rejected before touching the mixer.
    pub fn set_level(&mut self, percent: i64) -> Result<()> {
        if !(0..=100).contains(&percent) {
            return Err(TopbarError::OutOfRange {
                value: percent,
                min:   0,
                max:   100,
            });
        }

        self.element.refresh()?;
        let (min, max) = self.element.volume_range()?;
        let raw = to_raw(percent, min, max);
        for channel in FRONT {
            self.element.set_volume(channel, raw)?;
        }
        Ok(())
    }
}

/// Map a raw channel value into `0..=100`, rounding to nearest.
pub fn to_percent(raw: i64, min: i64, max: i64) -> u8 {
    let span = max - min;
    if span <= 0 {
        return 0;
    }
    let offset = (raw - min).clamp(0, span);
    ((100 * offset + span / 2) / span) as u8
}

/// Inverse of [`to_percent`]: `percent` of the range above `min`.
pub fn to_raw(percent: i64, min: i64, max: i64) -> i64 {
    let span = (max - min).max(0);
    min + (percent * span + 50) / 100
}

#[cfg(feature = "alsa")]
fn open_element(direction: Direction) -> Result<Box<dyn MixerElement>> {
    let element = match direction {
        Direction::Playback => PLAYBACK_ELEMENT,
        Direction::Capture => CAPTURE_ELEMENT,
    };
    Ok(Box::new(alsa_mixer::AlsaElement::open(DEFAULT_CARD, element, direction)?))
}

#[cfg(not(feature = "alsa"))]
fn open_element(_direction: Direction) -> Result<Box<dyn MixerElement>> {
    Err(TopbarError::unavailable("audio", "built without the `alsa` feature"))
}
