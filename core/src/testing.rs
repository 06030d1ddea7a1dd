//! Recording hardware doubles for unit tests.

use alloc::vec::Vec;

use crate::hw::{Layer, SamplePlayer, Screen, VideoHardware};
use crate::sound::SampleFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VramCopy {
    pub dest: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affine {
    pub screen: Screen,
    pub group: u8,
    pub angle: i32,
    pub sx: u16,
    pub sy: u16,
}

#[derive(Debug, Default)]
pub struct RecordingVideo {
    pub scroll: Vec<(Screen, Layer, u16, u16)>,
    pub dispcnt: [u32; 2],
    pub copies: Vec<VramCopy>,
    pub affine: Vec<Affine>,
}

impl RecordingVideo {
    pub fn last_scroll(&self) -> Option<(u16, u16)> {
        self.scroll.last().map(|&(_, _, h, v)| (h, v))
    }
}

impl VideoHardware for RecordingVideo {
    fn set_bg_scroll(&mut self, screen: Screen, layer: Layer, hofs: u16, vofs: u16) {
        self.scroll.push((screen, layer, hofs, vofs));
    }

    fn set_display_control(&mut self, screen: Screen, bits: u32) {
        self.dispcnt[screen.index()] = bits;
    }

    fn copy_to_vram(&mut self, dest: u32, src: &[u8]) {
        self.copies.push(VramCopy { dest, data: src.to_vec() });
    }

    fn set_sprite_affine(&mut self, screen: Screen, group: u8, angle: i32, sx: u16, sy: u16) {
        self.affine.push(Affine { screen, group, angle, sx, sy });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCall {
    pub len: usize,
    pub format: SampleFormat,
    pub freq: u16,
    pub volume: u8,
    pub pan: u8,
    pub looping: bool,
    pub loop_from: u16,
}

#[derive(Debug, Default)]
pub struct RecordingPlayer {
    pub calls: Vec<PlayCall>,
}

impl SamplePlayer for RecordingPlayer {
    fn play(
        &mut self,
        sample: &[u8],
        format: SampleFormat,
        freq: u16,
        volume: u8,
        pan: u8,
        looping: bool,
        loop_from: u16,
    ) -> u8 {
        self.calls.push(PlayCall {
            len: sample.len(),
            format,
            freq,
            volume,
            pan,
            looping,
            loop_from,
        });
        (self.calls.len() - 1) as u8
    }
}
