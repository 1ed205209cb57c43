use super::{Channel, Direction, MixerElement};
use ::alsa::mixer::{Mixer, Selem, SelemChannelId, SelemId};
use topbar_core::{Result, TopbarError};
use tracing::info;

/// A simple mixer element on an ALSA card.
///
/// `Selem` borrows the `Mixer`, so only the element id is kept and the
/// element is looked up again on every call.
pub struct AlsaElement {
    mixer:     Mixer,
    id:        SelemId,
    name:      String,
    direction: Direction,
}

impl AlsaElement {
    /// Open `card`, attach, register and load it, then check that `element`
    /// exists.  Any failure here makes the device unavailable for good.
    pub fn open(card: &str, element: &str, direction: Direction) -> Result<Self> {
        let mixer = Mixer::new(card, false).map_err(|e| {
            TopbarError::unavailable("audio", format!("cannot open mixer '{card}': {e}"))
        })?;
        info!("Sound mixer '{card}' opened");

        let id = SelemId::new(element, 0);
        if mixer.find_selem(&id).is_none() {
            return Err(TopbarError::unavailable(
                "audio",
                format!("element '{element}' not found on '{card}'"),
            ));
        }
        info!("Sound element '{element}' found");

        Ok(Self {
            mixer,
            id,
            name: element.to_string(),
            direction,
        })
    }

    fn selem(&self) -> Result<Selem<'_>> {
        self.mixer
            .find_selem(&self.id)
            .ok_or_else(|| TopbarError::Mixer(format!("element '{}' went away", self.name)))
    }
}

fn channel_id(channel: Channel) -> SelemChannelId {
    match channel {
        Channel::FrontLeft => SelemChannelId::FrontLeft,
        Channel::FrontRight => SelemChannelId::FrontRight,
    }
}

fn mixer_err(what: &str, channel: Channel, e: ::alsa::Error) -> TopbarError {
    TopbarError::Mixer(format!("{what} {channel:?}: {e}"))
}

impl MixerElement for AlsaElement {
    fn refresh(&mut self) -> Result<()> {
        self.mixer
            .handle_events()
            .map(|_| ())
            .map_err(|e| TopbarError::Mixer(format!("handle events: {e}")))
    }

    fn volume_range(&self) -> Result<(i64, i64)> {
        let selem = self.selem()?;
        Ok(match self.direction {
            Direction::Playback => selem.get_playback_volume_range(),
            Direction::Capture => selem.get_capture_volume_range(),
        })
    }

    fn volume(&self, channel: Channel) -> Result<i64> {
        let selem = self.selem()?;
        let id = channel_id(channel);
        match self.direction {
            Direction::Playback => selem.get_playback_volume(id),
            Direction::Capture => selem.get_capture_volume(id),
        }
        .map_err(|e| mixer_err("get volume", channel, e))
    }

    fn switch(&self, channel: Channel) -> Result<bool> {
        let selem = self.selem()?;
        let id = channel_id(channel);
        match self.direction {
            Direction::Playback => selem.get_playback_switch(id),
            Direction::Capture => selem.get_capture_switch(id),
        }
        .map(|on| on != 0)
        .map_err(|e| mixer_err("get switch", channel, e))
    }

    fn set_volume(&mut self, channel: Channel, raw: i64) -> Result<()> {
        let selem = self.selem()?;
        let id = channel_id(channel);
        match self.direction {
            Direction::Playback => selem.set_playback_volume(id, raw),
            Direction::Capture => selem.set_capture_volume(id, raw),
        }
        .map_err(|e| mixer_err("set volume", channel, e))
    }
}
