//! # Memory-Mapped Video Hardware
//!
//! [`VideoHardware`] for the real console, ARM9 side:
//!
//! | Address       | Register                                    |
//! |---------------|---------------------------------------------|
//! | `$0400_0000`  | Main engine DISPCNT, BG0-3 HOFS/VOFS at +16 |
//! | `$0400_1000`  | Sub engine, same layout                     |
//! | `$0400_00D4`  | DMA channel 3 (SAD, DAD, CNT)               |
//! | `$0700_0000`  | Main OAM, rotation groups every 32 bytes    |
//! | `$0700_0400`  | Sub OAM                                     |
//!
//! Sound registers belong to the ARM7, so there's no [`SamplePlayer`] here;
//! hook one up to the platform's sound engine.
//!
//! [`SamplePlayer`]: crate::hw::SamplePlayer

use bit_field::BitField;
use volatile_register::{RW, WO};

use crate::hw::{Layer, Screen, VideoHardware};
use crate::sine_table::affine_matrix;

#[repr(C)]
pub struct BgOffset {
    pub hofs: WO<u16>,
    pub vofs: WO<u16>,
}

/// One 2D engine's register block.
#[repr(C)]
pub struct Engine {
    pub dispcnt: RW<u32>,
    _dispstat_bgcnt: [u32; 3],
    pub bg: [BgOffset; 4],
}

impl Engine {
    #[inline(always)]
    pub unsafe fn new(screen: Screen) -> &'static mut Engine {
        let base = match screen {
            Screen::Top => 0x0400_0000,
            Screen::Bottom => 0x0400_1000,
        };
        unsafe { &mut *(base as *mut Engine) }
    }
}

#[repr(C)]
pub struct Dma {
    pub src: WO<u32>,
    pub dest: WO<u32>,
    pub cnt: RW<u32>,
}

impl Dma {
    pub const ENABLE: usize = 31;
    pub const WORDS: usize = 26;

    #[inline(always)]
    pub unsafe fn channel3() -> &'static mut Dma {
        unsafe { &mut *(0x0400_00D4 as *mut Dma) }
    }

    /// Copy `words` 32-bit words and spin until done.
    pub unsafe fn copy_words(&mut self, src: u32, dest: u32, words: u32) {
        let mut cnt = 0u32;
        cnt.set_bits(0..21, words);
        cnt.set_bit(Self::WORDS, true);
        cnt.set_bit(Self::ENABLE, true);
        unsafe {
            self.src.write(src);
            self.dest.write(dest);
            self.cnt.write(cnt);
        }
        while self.cnt.read().get_bit(Self::ENABLE) {}
    }
}

/// Affine parameters interleaved with three sprites' attributes.
#[repr(C)]
pub struct RotScale {
    _attr0: [u16; 3],
    pub pa: WO<i16>,
    _attr1: [u16; 3],
    pub pb: WO<i16>,
    _attr2: [u16; 3],
    pub pc: WO<i16>,
    _attr3: [u16; 3],
    pub pd: WO<i16>,
}

impl RotScale {
    #[inline(always)]
    pub unsafe fn new(screen: Screen, group: u8) -> &'static mut RotScale {
        let base = match screen {
            Screen::Top => 0x0700_0000,
            Screen::Bottom => 0x0700_0400,
        };
        unsafe { &mut *((base + group as usize * 32) as *mut RotScale) }
    }
}

/// Write back the data cache lines covering `src` so DMA sees them.
#[cfg(target_arch = "arm")]
fn flush_dcache(src: &[u8]) {
    let start = src.as_ptr() as usize & !31;
    let end = src.as_ptr() as usize + src.len();
    for line in (start..end).step_by(32) {
        unsafe { core::arch::asm!("mcr p15, 0, {}, c7, c10, 1", in(reg) line) };
    }
}

#[cfg(not(target_arch = "arm"))]
fn flush_dcache(_src: &[u8]) {}

/// The console's video registers.
pub struct Nds {
    _private: (),
}

impl Nds {
    /// Only one may exist; it owns every register it writes.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl VideoHardware for Nds {
    fn set_bg_scroll(&mut self, screen: Screen, layer: Layer, hofs: u16, vofs: u16) {
        let bg = unsafe { &mut Engine::new(screen).bg[layer.index()] };
        unsafe {
            bg.hofs.write(hofs);
            bg.vofs.write(vofs);
        }
    }

    fn set_display_control(&mut self, screen: Screen, bits: u32) {
        unsafe { Engine::new(screen).dispcnt.write(bits) };
    }

    /// `dest` must be halfword aligned; vram drops byte writes.
    fn copy_to_vram(&mut self, dest: u32, src: &[u8]) {
        if src.is_empty() {
            return;
        }
        let aligned = (src.as_ptr() as u32 | dest | src.len() as u32) & 3 == 0;
        if aligned {
            flush_dcache(src);
            unsafe { Dma::channel3().copy_words(src.as_ptr() as u32, dest, src.len() as u32 / 4) };
            return;
        }

        let dst = dest as *mut u16;
        for (i, pair) in src.chunks(2).enumerate() {
            unsafe {
                let half = match *pair {
                    [lo, hi] => u16::from_le_bytes([lo, hi]),
                    // trailing byte, keep the high half already in vram
                    [lo] => (dst.add(i).read_volatile() & 0xFF00) | lo as u16,
                    _ => return,
                };
                dst.add(i).write_volatile(half);
            }
        }
    }

    fn set_sprite_affine(&mut self, screen: Screen, group: u8, angle: i32, sx: u16, sy: u16) {
        let [pa, pb, pc, pd] = affine_matrix(angle, sx, sy);
        let rot = unsafe { RotScale::new(screen, group) };
        unsafe {
            rot.pa.write(pa);
            rot.pb.write(pb);
            rot.pc.write(pc);
            rot.pd.write(pd);
        }
    }
}
