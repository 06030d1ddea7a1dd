//! # Hardware Sinks
//!
//! The library never touches registers directly. Everything that reaches the
//! console goes through one of two traits:
//!
//! - [`VideoHardware`]: scroll offsets, display control, bulk copies into
//!   video memory and the sprite rotation/scale unit.
//! - [`SamplePlayer`]: the sound engine's sample playback.
//!
//! The `nds` feature provides memory-mapped implementations in `mmio`. Tests
//! use recording doubles.

use crate::error::{Error, Result};
use crate::sound::SampleFormat;

/// One of the two displays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Main engine.
    Top = 0,
    /// Sub engine.
    Bottom = 1,
}

impl Screen {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(screen: u8) -> Option<Self> {
        match screen {
            0 => Some(Screen::Top),
            1 => Some(Screen::Bottom),
            _ => None,
        }
    }
}

/// Background layer 0-3.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Layer(u8);

impl Layer {
    pub const COUNT: usize = 4;

    pub fn new(layer: u8) -> Result<Self> {
        if (layer as usize) < Self::COUNT {
            Ok(Layer(layer))
        } else {
            Err(Error::InvalidId { what: "Background layer", id: layer as usize, limit: 3 })
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

pub trait VideoHardware {
    /// Write the horizontal and vertical offset registers of a layer.
    fn set_bg_scroll(&mut self, screen: Screen, layer: Layer, hofs: u16, vofs: u16);

    /// Write a screen's display control register.
    fn set_display_control(&mut self, screen: Screen, bits: u32);

    /// Copy `src` into video memory starting at `dest`.
    ///
    /// Must complete before returning.
    fn copy_to_vram(&mut self, dest: u32, src: &[u8]);

    /// Program a rotation group of the sprite affine unit.
    ///
    /// `angle` uses a 32768 unit circle. `sx`/`sy` are inverse scales
    /// where 256 is 1:1.
    fn set_sprite_affine(&mut self, screen: Screen, group: u8, angle: i32, sx: u16, sy: u16);
}

pub trait SamplePlayer {
    /// Start playing a sample and return the channel it got.
    #[allow(clippy::too_many_arguments)]
    fn play(
        &mut self,
        sample: &[u8],
        format: SampleFormat,
        freq: u16,
        volume: u8,
        pan: u8,
        looping: bool,
        loop_from: u16,
    ) -> u8;
}
