//! # Collision Maps
//!
//! A collision map is a grid of 8×8 tiles stored exactly as the map tools
//! export it, so assets load without any conversion:
//!
//! - **`.cmp`**: one little-endian `u16` tile index per tile, row-major. The
//!   first tile row is a header row, so tile row `n` of the map is stored at
//!   row `n + 1`.
//! - **`.dat`** (collision backgrounds only): one 64-byte block per tile index,
//!   holding an 8×8 mask value per pixel.
//!
//! ```text
//! .cmp, width = 16 (2 columns):
//!  byte  0   1   2   3 │  4   5   6   7 │  8 ...
//!       [hdr    ][hdr ] │ [t(0,0)][t(1,0)]│ [t(0,1)] ...
//! ```
//!
//! Queries outside `[0, width) × [0, height)` are not errors: tile and point
//! reads return 0 ("nothing here") and tile writes are dropped.

use alloc::vec::Vec;

use log::info;

use crate::config::{Config, SLOTS_CMAP};
use crate::error::Result;
use crate::loader::{load_blob, resource_path, ByteSource};
use crate::slots::SlotTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMap {
    /// Packed tile indices, header row first.
    pub map: Vec<u8>,
    /// Per-pixel masks, `None` for plain collision maps.
    pub tiles: Option<Vec<u8>>,
    /// Size in pixels.
    pub width: u16,
    pub height: u16,
}

impl CollisionMap {
    pub fn new(map: Vec<u8>, width: u16, height: u16) -> Self {
        Self { map, tiles: None, width, height }
    }

    pub fn with_tiles(map: Vec<u8>, tiles: Vec<u8>, width: u16, height: u16) -> Self {
        Self { map, tiles: Some(tiles), width, height }
    }

    #[inline(always)]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Byte offset of the tile under an in-range pixel.
    #[inline(always)]
    fn tile_address(&self, x: i32, y: i32) -> usize {
        let columns = (self.width >> 3) as usize;
        let tile_x = (x >> 3) as usize;
        // +1 skips the header row
        let tile_y = (y >> 3) as usize + 1;
        ((tile_y * columns) + tile_x) << 1
    }

    #[inline(always)]
    fn read_u16(&self, address: usize) -> u16 {
        match self.map.get(address..address + 2) {
            Some(&[lo, hi]) => ((hi as u16) << 8) | lo as u16,
            _ => 0,
        }
    }

    /// Tile index under pixel `(x, y)`, 0 when outside the map.
    pub fn get_tile(&self, x: i32, y: i32) -> u16 {
        if !self.contains(x, y) {
            return 0;
        }
        self.read_u16(self.tile_address(x, y))
    }

    /// Overwrite the tile under pixel `(x, y)`. Ignored outside the map.
    pub fn set_tile(&mut self, x: i32, y: i32, value: u16) {
        if !self.contains(x, y) {
            return;
        }
        let address = self.tile_address(x, y);
        if let Some(bytes) = self.map.get_mut(address..address + 2) {
            bytes.copy_from_slice(&value.to_le_bytes());
        }
    }

    /// Mask value of pixel `(x, y)`, 0 when outside the map.
    ///
    /// Plain collision maps have no masks and always read 0.
    pub fn get_point(&self, x: i32, y: i32) -> u8 {
        if !self.contains(x, y) {
            return 0;
        }
        let Some(tiles) = self.tiles.as_ref() else {
            return 0;
        };

        let tile_x = x >> 3;
        let tile_y = (y >> 3) + 1;

        let pixel_x = (x - (tile_x << 3)) as usize;
        // y is shifted by the header row too, so this lands back in 0..8
        let pixel_y = ((y + 8) - (tile_y << 3)) as usize;

        let tile = self.read_u16(self.tile_address(x, y)) as usize;
        let address = (tile << 6) + (pixel_y << 3) + pixel_x;
        tiles.get(address).copied().unwrap_or(0)
    }
}

/// All collision map slots.
pub struct CollisionMaps {
    slots: SlotTable<CollisionMap, SLOTS_CMAP>,
}

impl Default for CollisionMaps {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionMaps {
    pub fn new() -> Self {
        Self { slots: SlotTable::new("Collision Map") }
    }

    pub fn init(&mut self) {
        self.slots.init();
    }

    pub fn reset(&mut self) {
        self.slots.reset();
    }

    /// Load `{name}.cmp` into slot `id`. `width`/`height` are in pixels.
    pub fn load_collision_map(
        &mut self,
        source: &mut impl ByteSource,
        config: &Config,
        id: usize,
        name: &str,
        width: u16,
        height: u16,
    ) -> Result<()> {
        self.slots.load_with(id, || {
            let map = load_blob(source, &resource_path(config, name, "cmp"))?;
            Ok(CollisionMap::new(map, width, height))
        })?;
        info!("collision map {} loaded into slot {} ({}x{})", name, id, width, height);
        Ok(())
    }

    /// Load `{name}.dat` (pixel masks) and `{name}.cmp` into slot `id`.
    pub fn load_collision_bg(
        &mut self,
        source: &mut impl ByteSource,
        config: &Config,
        id: usize,
        name: &str,
        width: u16,
        height: u16,
    ) -> Result<()> {
        self.slots.load_with(id, || {
            let tiles = load_blob(source, &resource_path(config, name, "dat"))?;
            let map = load_blob(source, &resource_path(config, name, "cmp"))?;
            Ok(CollisionMap::with_tiles(map, tiles, width, height))
        })?;
        info!("collision background {} loaded into slot {} ({}x{})", name, id, width, height);
        Ok(())
    }

    /// Put an already built map into slot `id`.
    pub fn insert(&mut self, id: usize, map: CollisionMap) -> Result<()> {
        self.slots.load(id, map).map(|_| ())
    }

    pub fn unload_collision_map(&mut self, id: usize) -> Result<()> {
        self.slots.unload(id)?;
        info!("collision map slot {} freed", id);
        Ok(())
    }

    pub fn unload_collision_bg(&mut self, id: usize) -> Result<()> {
        self.slots.unload(id)?;
        info!("collision background slot {} freed", id);
        Ok(())
    }

    pub fn is_in_use(&self, id: usize) -> bool {
        self.slots.is_in_use(id)
    }

    pub fn get(&self, id: usize) -> Result<&CollisionMap> {
        self.slots.get(id)
    }

    pub fn get_tile(&self, slot: usize, x: i32, y: i32) -> Result<u16> {
        Ok(self.slots.get(slot)?.get_tile(x, y))
    }

    pub fn set_tile(&mut self, slot: usize, x: i32, y: i32, value: u16) -> Result<()> {
        self.slots.get_mut(slot)?.set_tile(x, y, value);
        Ok(())
    }

    pub fn get_point(&self, slot: usize, x: i32, y: i32) -> Result<u8> {
        Ok(self.slots.get(slot)?.get_point(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::loader::MemorySource;
    use alloc::vec;

    /// 2x1 tiles plus the header row.
    fn small_map() -> CollisionMap {
        let map = vec![
            0xEE, 0xEE, 0xEE, 0xEE, // header
            0x34, 0x12, 0x02, 0x00, // tiles (0,0) = 0x1234, (1,0) = 2
        ];
        CollisionMap::new(map, 16, 8)
    }

    #[test]
    fn first_tile_skips_header_row() {
        let m = small_map();
        // tile_y = 1, columns = 2, so the read is at byte 4
        assert_eq!(m.get_tile(0, 0), 0x1234);
        assert_eq!(m.get_tile(7, 7), 0x1234);
        assert_eq!(m.get_tile(8, 0), 2);
        assert_eq!(m.get_tile(15, 7), 2);
    }

    #[test]
    fn outside_the_map_reads_zero() {
        let m = small_map();
        for (x, y) in [(-1, 0), (0, -1), (16, 0), (0, 8), (i32::MIN, i32::MAX)] {
            assert_eq!(m.get_tile(x, y), 0);
            assert_eq!(m.get_point(x, y), 0);
        }
    }

    #[test]
    fn outside_the_map_writes_nothing() {
        let mut m = small_map();
        let before = m.clone();
        for (x, y) in [(-8, 0), (0, -8), (16, 4), (4, 8)] {
            m.set_tile(x, y, 0xFFFF);
        }
        assert_eq!(m, before);
    }

    #[test]
    fn set_then_get() {
        let mut m = CollisionMap::new(vec![0; 2 * 4 * 5], 32, 32);
        for (x, y, v) in [(0, 0, 0xBEEF), (31, 31, 1), (9, 17, 0x0100), (24, 0, 0xFFFF)] {
            m.set_tile(x, y, v);
            assert_eq!(m.get_tile(x, y), v);
        }
        // header row untouched
        assert!(m.map[..8].iter().all(|&b| b == 0));
        // little endian on disk
        assert_eq!(&m.map[8..10], &[0xEF, 0xBE]);
    }

    #[test]
    fn points_come_from_the_tile_masks() {
        let mut tiles = vec![0u8; 64 * 2];
        // tile 1: solid bottom row, one dot at (3, 2)
        for x in 0..8 {
            tiles[64 + 7 * 8 + x] = 1;
        }
        tiles[64 + 2 * 8 + 3] = 7;
        let map = vec![0, 0, 0, 0, 1, 0, 0, 0];
        let m = CollisionMap::with_tiles(map, tiles, 16, 8);

        assert_eq!(m.get_point(0, 7), 1);
        assert_eq!(m.get_point(7, 7), 1);
        assert_eq!(m.get_point(3, 2), 7);
        assert_eq!(m.get_point(3, 3), 0);
        // second tile is index 0, all clear
        assert_eq!(m.get_point(8, 7), 0);
    }

    #[test]
    fn plain_maps_have_no_points() {
        assert_eq!(small_map().get_point(0, 0), 0);
    }

    #[test]
    fn truncated_assets_read_zero() {
        let m = CollisionMap::new(vec![0, 0, 0, 0], 16, 16);
        assert_eq!(m.get_tile(0, 8), 0);
        let mut m = m;
        m.set_tile(0, 8, 5);
        assert_eq!(m.map, vec![0, 0, 0, 0]);
    }

    fn source() -> MemorySource {
        let mut src = MemorySource::new();
        src.insert("nitrofiles/lvl.cmp", vec![0, 0, 0, 0, 1, 0, 0, 0]);
        src.insert("nitrofiles/lvl.dat", vec![3u8; 128]);
        src
    }

    #[test]
    fn slot_lifecycle() {
        let cfg = Config::default();
        let mut src = source();
        let mut maps = CollisionMaps::new();

        maps.load_collision_map(&mut src, &cfg, 0, "lvl", 16, 8).unwrap();
        assert_eq!(maps.get_tile(0, 0, 0), Ok(1));
        assert_eq!(
            maps.load_collision_map(&mut src, &cfg, 0, "lvl", 16, 8).unwrap_err(),
            Error::SlotInUse { table: "Collision Map", id: 0 }
        );

        maps.unload_collision_map(0).unwrap();
        assert!(!maps.is_in_use(0));
        assert_eq!(
            maps.unload_collision_map(0).unwrap_err(),
            Error::SlotNotInUse { table: "Collision Map", id: 0 }
        );

        maps.load_collision_bg(&mut src, &cfg, 0, "lvl", 16, 8).unwrap();
        assert_eq!(maps.get_point(0, 4, 4), Ok(3));
        maps.unload_collision_bg(0).unwrap();
    }

    #[test]
    fn bad_ids() {
        let cfg = Config::default();
        let mut src = source();
        let mut maps = CollisionMaps::new();
        let err = maps.load_collision_map(&mut src, &cfg, SLOTS_CMAP, "lvl", 16, 8).unwrap_err();
        assert_eq!(err.code(), 106);
        assert_eq!(maps.get_tile(1, 0, 0).unwrap_err().code(), 110);
    }

    #[test]
    fn missing_tiles_file_keeps_slot_free() {
        let cfg = Config::default();
        let mut src = source();
        src.remove("nitrofiles/lvl.dat");
        let mut maps = CollisionMaps::new();
        let err = maps.load_collision_bg(&mut src, &cfg, 2, "lvl", 16, 8).unwrap_err();
        assert_eq!(err.code(), 101);
        assert!(!maps.is_in_use(2));
    }

    #[test]
    fn reset_frees_all_maps() {
        let cfg = Config::default();
        let mut src = source();
        let mut maps = CollisionMaps::new();
        maps.load_collision_map(&mut src, &cfg, 0, "lvl", 16, 8).unwrap();
        maps.load_collision_map(&mut src, &cfg, 5, "lvl", 16, 8).unwrap();
        maps.reset();
        assert!(!maps.is_in_use(0) && !maps.is_in_use(5));
    }
}
