//! # Raw Sound Samples
//!
//! Sound effects are headerless sample files (`.raw`) kept in RAM until the
//! game unloads them. The sample rate and format aren't in the file, so they
//! are given at load time and handed to the [`SamplePlayer`] on every play.

use alloc::vec::Vec;

use log::{debug, info};

use crate::config::{Config, RAWSOUND_MAX_SIZE, SLOTS_RAWSOUND};
use crate::error::Result;
use crate::hw::SamplePlayer;
use crate::loader::{load_blob_limited, resource_path, ByteSource};
use crate::slots::SlotTable;

/// Sample encodings understood by the sound hardware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum SampleFormat {
    Pcm8 = 0,
    Pcm16 = 1,
    ImaAdpcm = 2,
}

impl SampleFormat {
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(SampleFormat::Pcm8),
            1 => Some(SampleFormat::Pcm16),
            2 => Some(SampleFormat::ImaAdpcm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSound {
    pub data: Vec<u8>,
    pub freq: u16,
    pub format: SampleFormat,
}

impl RawSound {
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

pub struct SoundBank {
    slots: SlotTable<RawSound, SLOTS_RAWSOUND>,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundBank {
    pub fn new() -> Self {
        Self { slots: SlotTable::new("Raw Sound") }
    }

    pub fn init(&mut self) {
        self.slots.init();
    }

    pub fn reset(&mut self) {
        self.slots.reset();
    }

    /// Load `{name}.raw` into slot `id`.
    ///
    /// Samples over 256KB are refused with `SizeLimitExceeded`.
    pub fn load_raw_sound(
        &mut self,
        source: &mut impl ByteSource,
        config: &Config,
        id: usize,
        name: &str,
        freq: u16,
        format: SampleFormat,
    ) -> Result<()> {
        let sound = self.slots.load_with(id, || {
            let path = resource_path(config, name, "raw");
            let data = load_blob_limited(source, &path, RAWSOUND_MAX_SIZE)?;
            Ok(RawSound { data, freq, format })
        })?;
        info!("raw sound {} loaded into slot {} ({} bytes, {}Hz)", name, id, sound.size(), freq);
        Ok(())
    }

    pub fn unload_raw_sound(&mut self, id: usize) -> Result<()> {
        self.slots.unload(id)?;
        info!("raw sound slot {} freed", id);
        Ok(())
    }

    pub fn is_in_use(&self, id: usize) -> bool {
        self.slots.is_in_use(id)
    }

    pub fn get(&self, id: usize) -> Result<&RawSound> {
        self.slots.get(id)
    }

    /// Start playing slot `id` and return the channel the player picked.
    ///
    /// `volume` and `pan` are 0-127 (64 is centered). With `looping`, playback
    /// restarts at `loop_from` (in 32-bit words) after the first pass.
    pub fn play_raw_sound(
        &self,
        player: &mut impl SamplePlayer,
        id: usize,
        volume: u8,
        pan: u8,
        looping: bool,
        loop_from: u16,
    ) -> Result<u8> {
        let sound = self.slots.get(id)?;
        let channel = player.play(
            &sound.data,
            sound.format,
            sound.freq,
            volume,
            pan,
            looping,
            loop_from,
        );
        debug!("raw sound {} playing on channel {}", id, channel);
        Ok(channel)
    }
}
