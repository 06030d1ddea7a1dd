//! Fixed capacities, hardware constants and runtime configuration.

use heapless::String;

/// Collision map slots.
pub const SLOTS_CMAP: usize = 32;
/// Raw sound slots.
pub const SLOTS_RAWSOUND: usize = 32;
/// Tiled background map buffers in RAM.
pub const SLOTS_TBG: usize = 64;
/// 256 colour sprite graphics buffers in RAM.
pub const SLOTS_SPR256GFX: usize = 256;

/// Sprites (and sprite vram graphics records) per screen.
pub const SPRITES_PER_SCREEN: usize = 128;
/// Hardware rotation/scale groups per screen.
pub const ROT_GROUPS: usize = 32;

/// Largest raw sample that may be loaded, in bytes.
pub const RAWSOUND_MAX_SIZE: usize = 1 << 18;

/// Visible screen size in pixels.
pub const SCREEN_WIDTH: i32 = 256;
pub const SCREEN_HEIGHT: i32 = 192;

/// Bytes in one 32x32 tile block of map data.
pub const MAP_BLOCK_SIZE: usize = 2048;

/// Background vram (map bases are 2KB offsets into these).
pub const BG_VRAM_MAIN: u32 = 0x0600_0000;
pub const BG_VRAM_SUB: u32 = 0x0620_0000;

/// Sprite vram and the amount managed per screen.
pub const SPR_VRAM_MAIN: u32 = 0x0640_0000;
pub const SPR_VRAM_SUB: u32 = 0x0660_0000;
pub const SPR_VRAM_SIZE: u32 = 128 * 1024;
/// Sprite vram allocation granularity.
pub const SPR_VRAM_BLOCK: u32 = 128;

pub const MAX_PATH: usize = 256;

/// Runtime settings shared by every loader.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder all asset names are relative to.
    pub root_folder: String<32>,
}

impl Config {
    /// Returns `None` if the folder name doesn't fit.
    pub fn with_root_folder(folder: &str) -> Option<Self> {
        let mut root_folder = String::new();
        root_folder.push_str(folder).ok()?;
        Some(Self { root_folder })
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut root_folder = String::new();
        // fits, 10 < 32
        let _ = root_folder.push_str("nitrofiles");
        Self { root_folder }
    }
}
