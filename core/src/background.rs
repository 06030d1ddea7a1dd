//! # Tiled Backgrounds & Infinite Scrolling
//!
//! A text background layer can show at most a 512×512 pixel map (64×64 tiles,
//! 8KB of map data) from video memory. Bigger maps stay in RAM and only the
//! part around the camera is copied into vram, one 2KB block (32×32 tiles,
//! 256×256 pixels) at a time.
//!
//! ## Map layout in RAM
//!
//! Maps are stored as a grid of 2KB blocks, row by row. The vram window for a
//! layer holds a 2×2 neighbourhood of those blocks:
//!
//! ```text
//!   RAM (width 1024 → 4 blocks per row)         vram map base
//!   ┌────┬────┬────┬────┐                       ┌────┬────┐
//!   │ 0  │ 1  │ 2  │ 3  │                       │ A  │ B  │  +0
//!   ├────┼────┼────┼────┤   camera in (1, 0)    ├────┼────┤
//!   │ 4  │ 5  │ 6  │ 7  │   ───────────────►    │ C  │ D  │  +4096
//!   └────┴────┴────┴────┘   A,B = 1,2 C,D = 5,6 └────┴────┘
//! ```
//!
//! ## Background types
//!
//! | Type   | Map size             | Paging                          |
//! |--------|----------------------|---------------------------------|
//! | Fixed  | ≤ 512 × ≤ 512        | none, the whole map is resident |
//! | Wide   | > 512 × ≤ 256        | horizontal, blocks A and B      |
//! | Tall   | ≤ 256 × > 512        | vertical, blocks A and B        |
//! | Both   | anything else        | both axes, blocks A to D        |
//!
//! [`TiledBackgrounds::scroll_bg`] only copies when the camera crosses into a
//! different block. Scrolling inside the current block just writes the two
//! offset registers.

use alloc::vec::Vec;

use log::{debug, info, warn};

use crate::config::{
    Config, BG_VRAM_MAIN, BG_VRAM_SUB, MAP_BLOCK_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, SLOTS_TBG,
};
use crate::error::Result;
use crate::hw::{Layer, Screen, VideoHardware};
use crate::loader::{load_blob, resource_path, ByteSource};
use crate::slots::SlotTable;

/// Bytes copied per window: two blocks side by side.
const WINDOW_SIZE: usize = MAP_BLOCK_SIZE * 2;
/// Largest map a fixed background can hold in vram.
const FIXED_MAP_MAX: usize = MAP_BLOCK_SIZE * 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BgType {
    #[default]
    Fixed = 0,
    Wide = 1,
    Tall = 2,
    Both = 3,
}

impl BgType {
    pub const fn for_size(width: u16, height: u16) -> Self {
        if width <= 512 && height <= 512 {
            BgType::Fixed
        } else if height <= 256 {
            BgType::Wide
        } else if width <= 256 {
            BgType::Tall
        } else {
            BgType::Both
        }
    }
}

/// Map data of a background, as loaded from a `.map` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgMap {
    pub data: Vec<u8>,
    /// Size in pixels.
    pub width: u16,
    pub height: u16,
}

/// Scroll state of one layer of one screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct BgLayer {
    pub created: bool,
    pub bg_type: BgType,
    /// Map slot the layer pages from.
    pub slot: usize,
    /// Vram map base, in 2KB units.
    pub mapbase: u8,
    pub width: u16,
    pub height: u16,
    /// Block currently resident in vram.
    pub blockx: u16,
    pub blocky: u16,
}

/// What [`TiledBackgrounds::scroll_bg`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Scroll {
    /// Values written to the offset registers.
    pub hofs: u16,
    pub vofs: u16,
    /// Whether new blocks were copied into vram.
    pub swapped: bool,
}

pub struct TiledBackgrounds {
    maps: SlotTable<BgMap, SLOTS_TBG>,
    layers: [[BgLayer; Layer::COUNT]; 2],
}

impl Default for TiledBackgrounds {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn map_address(screen: Screen, mapbase: u8) -> u32 {
    let vram = match screen {
        Screen::Top => BG_VRAM_MAIN,
        Screen::Bottom => BG_VRAM_SUB,
    };
    vram + ((mapbase as u32) << 11)
}

/// Copy `len` bytes of `data` from `offset`, clipped to the end of the map.
fn copy_window(video: &mut impl VideoHardware, dest: u32, data: &[u8], offset: usize, len: usize) {
    if offset >= data.len() {
        warn!("map window at {:#X} is past the end of the map ({} bytes)", offset, data.len());
        return;
    }
    let end = (offset + len).min(data.len());
    if end - offset < len {
        debug!("map window at {:#X} clipped to {} bytes", offset, end - offset);
    }
    video.copy_to_vram(dest, &data[offset..end]);
}

impl TiledBackgrounds {
    pub fn new() -> Self {
        Self {
            maps: SlotTable::new("Tiled Bg"),
            layers: [[BgLayer::default(); Layer::COUNT]; 2],
        }
    }

    pub fn init(&mut self) {
        self.maps.init();
        self.layers = [[BgLayer::default(); Layer::COUNT]; 2];
    }

    pub fn reset(&mut self) {
        self.maps.reset();
        self.init();
    }

    /// Load `{name}.map` into map slot `slot`. `width`/`height` are in pixels.
    pub fn load_tiled_bg_map(
        &mut self,
        source: &mut impl ByteSource,
        config: &Config,
        slot: usize,
        name: &str,
        width: u16,
        height: u16,
    ) -> Result<()> {
        self.maps.load_with(slot, || {
            let data = load_blob(source, &resource_path(config, name, "map"))?;
            Ok(BgMap { data, width, height })
        })?;
        info!("tiled bg map {} loaded into slot {} ({}x{})", name, slot, width, height);
        Ok(())
    }

    /// Put already loaded map data into slot `slot`.
    pub fn insert_map(&mut self, slot: usize, map: BgMap) -> Result<()> {
        self.maps.load(slot, map).map(|_| ())
    }

    pub fn unload_tiled_bg_map(&mut self, slot: usize) -> Result<()> {
        self.maps.unload(slot)?;
        info!("tiled bg map slot {} freed", slot);
        Ok(())
    }

    pub fn map(&self, slot: usize) -> Result<&BgMap> {
        self.maps.get(slot)
    }

    pub fn layer(&self, screen: Screen, layer: Layer) -> &BgLayer {
        &self.layers[screen.index()][layer.index()]
    }

    /// Show map slot `slot` on a layer, uploading its first blocks to
    /// `mapbase` (in 2KB units) and resetting the scroll to the origin.
    pub fn create_tiled_bg(
        &mut self,
        video: &mut impl VideoHardware,
        screen: Screen,
        layer: Layer,
        slot: usize,
        mapbase: u8,
    ) -> Result<()> {
        let map = self.maps.get(slot)?;
        let bg_type = BgType::for_size(map.width, map.height);
        let address = map_address(screen, mapbase);

        match bg_type {
            BgType::Fixed => {
                copy_window(video, address, &map.data, 0, map.data.len().min(FIXED_MAP_MAX));
            }
            BgType::Wide | BgType::Tall => {
                copy_window(video, address, &map.data, 0, WINDOW_SIZE);
            }
            BgType::Both => {
                let rowsize = Self::row_size(map.width);
                copy_window(video, address, &map.data, 0, WINDOW_SIZE);
                copy_window(video, address + WINDOW_SIZE as u32, &map.data, rowsize, WINDOW_SIZE);
            }
        }

        self.layers[screen.index()][layer.index()] = BgLayer {
            created: true,
            bg_type,
            slot,
            mapbase,
            width: map.width,
            height: map.height,
            blockx: 0,
            blocky: 0,
        };
        video.set_bg_scroll(screen, layer, 0, 0);

        info!(
            "tiled bg slot {} created on screen {} layer {} ({:?}, {}x{})",
            slot,
            screen.index(),
            layer.index(),
            bg_type,
            map.width,
            map.height
        );
        Ok(())
    }

    pub fn delete_tiled_bg(&mut self, screen: Screen, layer: Layer) {
        self.layers[screen.index()][layer.index()] = BgLayer::default();
    }

    /// Bytes per row of blocks: `ceil(width / 256)` blocks of 2KB.
    #[inline(always)]
    fn row_size(width: u16) -> usize {
        ((((width as usize).saturating_sub(1)) >> 8) + 1) << 11
    }

    /// Scroll a layer so pixel `(x, y)` of its map is at the top-left corner
    /// of the screen.
    ///
    /// The position is clamped to keep the screen inside the map. Paged
    /// backgrounds swap blocks in when the camera enters a different one.
    pub fn scroll_bg(
        &mut self,
        video: &mut impl VideoHardware,
        screen: Screen,
        layer: Layer,
        x: i16,
        y: i16,
    ) -> Result<Scroll> {
        let state = &mut self.layers[screen.index()][layer.index()];

        let max_x = (state.width as i32 - SCREEN_WIDTH).max(0);
        let max_y = (state.height as i32 - SCREEN_HEIGHT).max(0);
        let sx = (x as i32).clamp(0, max_x);
        let sy = (y as i32).clamp(0, max_y);

        let mut scroll = Scroll { hofs: sx as u16, vofs: sy as u16, swapped: false };

        if state.created && state.bg_type != BgType::Fixed {
            let map = self.maps.get(state.slot)?;
            let address = map_address(screen, state.mapbase);

            let blockx = (sx >> 8) as u16;
            let blocky = (sy >> 8) as u16;

            match state.bg_type {
                BgType::Wide => {
                    if state.blockx != blockx {
                        copy_window(video, address, &map.data, (blockx as usize) << 11, WINDOW_SIZE);
                        state.blockx = blockx;
                        scroll.swapped = true;
                    }
                    scroll.hofs = (sx - ((blockx as i32) << 8)) as u16;
                }
                BgType::Tall => {
                    if state.blocky != blocky {
                        copy_window(video, address, &map.data, (blocky as usize) << 11, WINDOW_SIZE);
                        state.blocky = blocky;
                        scroll.swapped = true;
                    }
                    scroll.vofs = (sy - ((blocky as i32) << 8)) as u16;
                }
                BgType::Both => {
                    if state.blockx != blockx || state.blocky != blocky {
                        let rowsize = Self::row_size(state.width);
                        let top = (blocky as usize * rowsize) + ((blockx as usize) << 11);
                        let bottom = top + rowsize;

                        copy_window(video, address, &map.data, top, WINDOW_SIZE);
                        copy_window(video, address + WINDOW_SIZE as u32, &map.data, bottom, WINDOW_SIZE);

                        state.blockx = blockx;
                        state.blocky = blocky;
                        scroll.swapped = true;
                    }
                    scroll.hofs = (sx - ((blockx as i32) << 8)) as u16;
                    scroll.vofs = (sy - ((blocky as i32) << 8)) as u16;
                }
                BgType::Fixed => {}
            }

            if scroll.swapped {
                debug!(
                    "screen {} layer {} now at block ({}, {})",
                    screen.index(),
                    layer.index(),
                    state.blockx,
                    state.blocky
                );
            }
        }

        video.set_bg_scroll(screen, layer, scroll.hofs, scroll.vofs);
        Ok(scroll)
    }
}
