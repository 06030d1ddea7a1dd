//! # Display Control
//!
//! Each screen has a write-through shadow of its display control register:
//!
//! | Bits   | Meaning                                   |
//! |--------|-------------------------------------------|
//! | 0-2    | BG mode (0, 2 or 5 for 2D games)          |
//! | 8-11   | BG0-BG3 enabled                           |
//! | 12     | Sprites enabled                           |
//! | 16     | Graphics display on                       |
//!
//! Changing mode with [`Display::set_2d`] rewrites the whole register, so all
//! layers start hidden until shown again.

use bit_field::BitField;
use log::warn;

use crate::hw::{Layer, Screen, VideoHardware};

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DisplayControl: u32 {
        const BG0_ACTIVE      = 1 << 8;
        const BG1_ACTIVE      = 1 << 9;
        const BG2_ACTIVE      = 1 << 10;
        const BG3_ACTIVE      = 1 << 11;
        const SPR_ACTIVE      = 1 << 12;
        const DISPLAY_ON      = 1 << 16;

        // mode bits
        const _ = 0b111;
    }
}

impl DisplayControl {
    pub const fn bg_active(layer: Layer) -> Self {
        match layer.index() {
            0 => Self::BG0_ACTIVE,
            1 => Self::BG1_ACTIVE,
            2 => Self::BG2_ACTIVE,
            _ => Self::BG3_ACTIVE,
        }
    }

    pub fn mode(&self) -> u8 {
        self.bits().get_bits(0..3) as u8
    }
}

/// 2D background modes usable with tiled backgrounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VideoMode {
    /// Four text layers.
    Mode0 = 0,
    /// Two text layers, two affine.
    Mode2 = 2,
    /// Two text layers, two extended affine.
    Mode5 = 5,
}

impl VideoMode {
    pub const fn from_number(mode: u8) -> Option<Self> {
        match mode {
            0 => Some(VideoMode::Mode0),
            2 => Some(VideoMode::Mode2),
            5 => Some(VideoMode::Mode5),
            _ => None,
        }
    }
}

pub struct Display {
    dispcnt: [DisplayControl; 2],
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    pub const fn new() -> Self {
        Self { dispcnt: [DisplayControl::empty(); 2] }
    }

    pub fn control(&self, screen: Screen) -> DisplayControl {
        self.dispcnt[screen.index()]
    }

    /// Switch a screen to a 2D mode. Anything but 0, 2 and 5 is ignored.
    pub fn set_2d(&mut self, video: &mut impl VideoHardware, screen: Screen, mode: u8) {
        let Some(mode) = VideoMode::from_number(mode) else {
            warn!("ignoring unsupported 2d mode {} on screen {}", mode, screen.index());
            return;
        };
        let mut bits = DisplayControl::DISPLAY_ON.bits();
        bits.set_bits(0..3, mode as u32);
        self.dispcnt[screen.index()] = DisplayControl::from_bits_retain(bits);
        self.write(video, screen);
    }

    pub fn show_bg(&mut self, video: &mut impl VideoHardware, screen: Screen, layer: Layer) {
        self.dispcnt[screen.index()].insert(DisplayControl::bg_active(layer));
        self.write(video, screen);
    }

    pub fn hide_bg(&mut self, video: &mut impl VideoHardware, screen: Screen, layer: Layer) {
        self.dispcnt[screen.index()].remove(DisplayControl::bg_active(layer));
        self.write(video, screen);
    }

    #[inline(always)]
    fn write(&self, video: &mut impl VideoHardware, screen: Screen) {
        video.set_display_control(screen, self.dispcnt[screen.index()].bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingVideo;

    fn layer(n: u8) -> Layer {
        Layer::new(n).unwrap()
    }

    #[test]
    fn set_2d_writes_mode() {
        let mut video = RecordingVideo::default();
        let mut display = Display::new();
        display.set_2d(&mut video, Screen::Bottom, 5);
        assert_eq!(video.dispcnt[1], 0x1_0005);
        assert_eq!(display.control(Screen::Bottom).mode(), 5);
        assert_eq!(video.dispcnt[0], 0);
    }

    #[test]
    fn unsupported_modes_are_ignored() {
        let mut video = RecordingVideo::default();
        let mut display = Display::new();
        display.set_2d(&mut video, Screen::Top, 2);
        display.set_2d(&mut video, Screen::Top, 3);
        assert_eq!(display.control(Screen::Top).mode(), 2);
    }

    #[test]
    fn show_and_hide_touch_one_bit() {
        let mut video = RecordingVideo::default();
        let mut display = Display::new();
        display.set_2d(&mut video, Screen::Top, 0);
        display.show_bg(&mut video, Screen::Top, layer(0));
        display.show_bg(&mut video, Screen::Top, layer(3));
        assert_eq!(video.dispcnt[0], 0x1_0000 | 1 << 8 | 1 << 11);

        display.hide_bg(&mut video, Screen::Top, layer(0));
        assert_eq!(video.dispcnt[0], 0x1_0000 | 1 << 11);

        // hiding twice is harmless
        display.hide_bg(&mut video, Screen::Top, layer(0));
        assert_eq!(video.dispcnt[0], 0x1_0000 | 1 << 11);
    }

    #[test]
    fn mode_change_hides_layers() {
        let mut video = RecordingVideo::default();
        let mut display = Display::new();
        display.show_bg(&mut video, Screen::Top, layer(1));
        display.set_2d(&mut video, Screen::Top, 0);
        assert!(!display.control(Screen::Top).contains(DisplayControl::BG1_ACTIVE));
    }
}
