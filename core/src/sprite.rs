//! # Sprites
//!
//! Sprite graphics go through three stages:
//!
//! 1. **RAM**: [`Sprites::load_sprite_gfx`] reads a 256 colour sheet (`.img`)
//!    of equally sized frames into a RAM slot.
//! 2. **VRAM**: [`Sprites::vram_sprite_gfx`] copies it into a screen's sprite
//!    vram, either every frame or, with `keep_frames`, only the first one.
//! 3. **OAM**: [`Sprites::create_sprite`] puts a sprite on screen using those
//!    graphics.
//!
//! ## Animation
//!
//! [`Sprites::set_frame`] picks the frame to show. If all frames are in vram
//! it just points the sprite at another one. With `keep_frames` the frame is
//! copied from RAM over the single vram frame instead, trading a small copy for
//! a lot of vram on long animations.
//!
//! ## Rotation & Scaling
//!
//! Sprites join one of 32 rotation groups per screen; every sprite in a group
//! shares the angle and scale set with [`Sprites::set_rotation_scale`].

use alloc::vec::Vec;

use log::{debug, info};

use crate::config::{
    Config, ROT_GROUPS, SLOTS_SPR256GFX, SPRITES_PER_SCREEN, SPR_VRAM_BLOCK, SPR_VRAM_MAIN,
    SPR_VRAM_SIZE, SPR_VRAM_SUB,
};
use crate::error::{Error, Result};
use crate::hw::{Screen, VideoHardware};
use crate::loader::{load_blob, resource_path, ByteSource};
use crate::slots::SlotTable;

/// A sprite sheet in RAM. `width`/`height` are the size of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteGfx {
    pub data: Vec<u8>,
    pub width: u16,
    pub height: u16,
}

impl SpriteGfx {
    /// Bytes per frame at 8 bits per pixel.
    #[inline(always)]
    pub fn frame_size(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    pub fn frames(&self) -> u16 {
        match self.frame_size() {
            0 => 0,
            size => (self.data.len() as u32 / size) as u16,
        }
    }
}

/// Graphics copied into sprite vram.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VramGfx {
    pub in_use: bool,
    /// RAM slot the graphics came from.
    pub ram_id: usize,
    pub address: u32,
    /// Vram taken, rounded up to the allocation block.
    pub size: u32,
    pub frame_size: u32,
    pub last_frame: u16,
    pub keep_frames: bool,
}

impl VramGfx {
    const EMPTY: Self = Self {
        in_use: false,
        ram_id: 0,
        address: 0,
        size: 0,
        frame_size: 0,
        last_frame: 0,
        keep_frames: false,
    };
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpriteOam {
    pub created: bool,
    /// Vram graphics record in use.
    pub gfx_id: usize,
    /// Address of the graphics of the current frame.
    pub gfx: u32,
    pub frame: u16,
    pub last_frame: u16,
    pub frame_size: u32,
    /// Rotation group, `None` when not rotating.
    pub rot: Option<u8>,
    pub double_size: bool,
    pub x: i16,
    pub y: i16,
}

impl SpriteOam {
    const EMPTY: Self = Self {
        created: false,
        gfx_id: 0,
        gfx: 0,
        frame: 0,
        last_frame: 0,
        frame_size: 0,
        rot: None,
        double_size: false,
        x: 0,
        y: 0,
    };
}

/// Convert an angle (512 units per turn, one wrap either way) to the affine
/// unit's 32768 unit circle, where positive angles turn clockwise.
pub fn hardware_angle(angle: i16) -> i32 {
    let mut angle = angle as i32;
    if angle < -512 {
        angle += 512;
    }
    if angle >= 512 {
        angle -= 512;
    }
    if angle < 0 {
        (-angle) << 6
    } else {
        -(angle << 6)
    }
}

#[inline(always)]
fn check_sprite(id: u8) -> Result<usize> {
    if id as usize >= SPRITES_PER_SCREEN {
        return Err(Error::InvalidId { what: "Sprite", id: id as usize, limit: SPRITES_PER_SCREEN - 1 });
    }
    Ok(id as usize)
}

#[inline(always)]
fn check_rot_group(group: u8) -> Result<u8> {
    if group as usize >= ROT_GROUPS {
        return Err(Error::InvalidId { what: "RotScale", id: group as usize, limit: ROT_GROUPS - 1 });
    }
    Ok(group)
}

#[inline(always)]
fn vram_base(screen: Screen) -> u32 {
    match screen {
        Screen::Top => SPR_VRAM_MAIN,
        Screen::Bottom => SPR_VRAM_SUB,
    }
}

pub struct Sprites {
    gfx: SlotTable<SpriteGfx, SLOTS_SPR256GFX>,
    vram: [[VramGfx; SPRITES_PER_SCREEN]; 2],
    /// Bytes of sprite vram handed out, per screen.
    vram_used: [u32; 2],
    oam: [[SpriteOam; SPRITES_PER_SCREEN]; 2],
}

impl Default for Sprites {
    fn default() -> Self {
        Self::new()
    }
}

impl Sprites {
    pub fn new() -> Self {
        Self {
            gfx: SlotTable::new("Sprite Gfx"),
            vram: [[VramGfx::EMPTY; SPRITES_PER_SCREEN]; 2],
            vram_used: [0; 2],
            oam: [[SpriteOam::EMPTY; SPRITES_PER_SCREEN]; 2],
        }
    }

    pub fn init(&mut self) {
        self.gfx.init();
        self.vram = [[VramGfx::EMPTY; SPRITES_PER_SCREEN]; 2];
        self.vram_used = [0; 2];
        self.oam = [[SpriteOam::EMPTY; SPRITES_PER_SCREEN]; 2];
    }

    pub fn reset(&mut self) {
        self.gfx.reset();
        self.init();
    }

    /// Load `{name}.img` into RAM slot `ram_id`. `width`/`height` are the
    /// size of one frame in pixels.
    pub fn load_sprite_gfx(
        &mut self,
        source: &mut impl ByteSource,
        config: &Config,
        ram_id: usize,
        name: &str,
        width: u16,
        height: u16,
    ) -> Result<()> {
        let gfx = self.gfx.load_with(ram_id, || {
            let data = load_blob(source, &resource_path(config, name, "img"))?;
            Ok(SpriteGfx { data, width, height })
        })?;
        info!("sprite gfx {} loaded into slot {} ({} frames)", name, ram_id, gfx.frames());
        Ok(())
    }

    pub fn insert_gfx(&mut self, ram_id: usize, gfx: SpriteGfx) -> Result<()> {
        self.gfx.load(ram_id, gfx).map(|_| ())
    }

    pub fn unload_sprite_gfx(&mut self, ram_id: usize) -> Result<()> {
        self.gfx.unload(ram_id)?;
        info!("sprite gfx slot {} freed", ram_id);
        Ok(())
    }

    pub fn vram_free(&self, screen: Screen) -> u32 {
        SPR_VRAM_SIZE - self.vram_used[screen.index()]
    }

    pub fn vram_gfx(&self, screen: Screen, vram_id: u8) -> Result<&VramGfx> {
        let id = check_sprite(vram_id)?;
        let record = &self.vram[screen.index()][id];
        if !record.in_use {
            return Err(Error::SlotNotInUse { table: "Sprite Gfx VRAM", id });
        }
        Ok(record)
    }

    /// Copy RAM slot `ram_id` into `screen`'s sprite vram as record `vram_id`.
    ///
    /// With `keep_frames` only the first frame is copied and later frames are
    /// streamed from RAM by [`Sprites::set_frame`].
    pub fn vram_sprite_gfx(
        &mut self,
        video: &mut impl VideoHardware,
        screen: Screen,
        ram_id: usize,
        vram_id: u8,
        keep_frames: bool,
    ) -> Result<()> {
        let id = check_sprite(vram_id)?;
        if self.vram[screen.index()][id].in_use {
            return Err(Error::SlotInUse { table: "Sprite Gfx VRAM", id });
        }
        let gfx = self.gfx.get(ram_id)?;

        let frame_size = gfx.frame_size();
        let bytes = if keep_frames {
            frame_size.min(gfx.data.len() as u32)
        } else {
            gfx.data.len() as u32
        };
        let size = bytes.div_ceil(SPR_VRAM_BLOCK) * SPR_VRAM_BLOCK;

        let used = self.vram_used[screen.index()];
        let available = SPR_VRAM_SIZE - used;
        if size > available {
            return Err(Error::VramFull { requested: size as usize, available: available as usize });
        }

        let address = vram_base(screen) + used;
        video.copy_to_vram(address, &gfx.data[..bytes as usize]);

        self.vram_used[screen.index()] = used + size;
        self.vram[screen.index()][id] = VramGfx {
            in_use: true,
            ram_id,
            address,
            size,
            frame_size,
            last_frame: gfx.frames().saturating_sub(1),
            keep_frames,
        };
        debug!(
            "sprite gfx {} -> screen {} vram {} at {:#010X} ({} bytes)",
            ram_id,
            screen.index(),
            vram_id,
            address,
            size
        );
        Ok(())
    }

    /// Release vram record `vram_id`.
    ///
    /// Vram is only given back when this was the latest allocation; the rest
    /// returns on `reset`.
    pub fn free_sprite_gfx(&mut self, screen: Screen, vram_id: u8) -> Result<()> {
        let record = *self.vram_gfx(screen, vram_id)?;
        let s = screen.index();
        if record.address + record.size == vram_base(screen) + self.vram_used[s] {
            self.vram_used[s] -= record.size;
        }
        self.vram[s][vram_id as usize] = VramGfx::EMPTY;
        Ok(())
    }

    pub fn oam(&self, screen: Screen, id: u8) -> Result<&SpriteOam> {
        Ok(&self.oam[screen.index()][check_sprite(id)?])
    }

    fn created_mut(&mut self, screen: Screen, id: u8) -> Result<&mut SpriteOam> {
        let sprite = &mut self.oam[screen.index()][check_sprite(id)?];
        if !sprite.created {
            return Err(Error::SpriteNotCreated { screen: screen as u8, sprite: id });
        }
        Ok(sprite)
    }

    /// Put sprite `id` on screen using vram graphics `vram_id`, showing frame 0.
    pub fn create_sprite(&mut self, screen: Screen, id: u8, vram_id: u8, x: i16, y: i16) -> Result<()> {
        let sid = check_sprite(id)?;
        let gfx = *self.vram_gfx(screen, vram_id)?;
        self.oam[screen.index()][sid] = SpriteOam {
            created: true,
            gfx_id: vram_id as usize,
            gfx: gfx.address,
            frame: 0,
            last_frame: gfx.last_frame,
            frame_size: gfx.frame_size,
            rot: None,
            double_size: false,
            x,
            y,
        };
        Ok(())
    }

    pub fn delete_sprite(&mut self, screen: Screen, id: u8) -> Result<()> {
        *self.created_mut(screen, id)? = SpriteOam::EMPTY;
        Ok(())
    }

    pub fn move_sprite(&mut self, screen: Screen, id: u8, x: i16, y: i16) -> Result<()> {
        let sprite = self.created_mut(screen, id)?;
        sprite.x = x;
        sprite.y = y;
        Ok(())
    }

    /// Show animation frame `frame` of sprite `id`.
    pub fn set_frame(&mut self, video: &mut impl VideoHardware, screen: Screen, id: u8, frame: u16) -> Result<()> {
        let sid = check_sprite(id)?;
        let sprite = self.oam[screen.index()][sid];

        if frame > sprite.last_frame {
            return Err(Error::InvalidFrame { sprite: id, frame, last_frame: sprite.last_frame });
        }
        if sprite.frame == frame {
            return Ok(());
        }

        let record = self.vram[screen.index()][sprite.gfx_id];
        let offset = sprite.frame_size * frame as u32;

        if record.keep_frames {
            let gfx = self.gfx.get(record.ram_id)?;
            let start = offset as usize;
            let end = (start + sprite.frame_size as usize).min(gfx.data.len());
            video.copy_to_vram(record.address, &gfx.data[start.min(end)..end]);
            debug!("sprite {} frame {} copied from ram", id, frame);
        } else {
            self.oam[screen.index()][sid].gfx = record.address + offset;
        }

        self.oam[screen.index()][sid].frame = frame;
        Ok(())
    }

    pub fn enable_rotation(&mut self, screen: Screen, sprite: u8, group: u8, double_size: bool) -> Result<()> {
        check_sprite(sprite)?;
        let group = check_rot_group(group)?;
        let oam = self.created_mut(screen, sprite)?;
        oam.rot = Some(group);
        oam.double_size = double_size;
        Ok(())
    }

    pub fn disable_rotation(&mut self, screen: Screen, sprite: u8) -> Result<()> {
        let oam = self.created_mut(screen, sprite)?;
        oam.rot = None;
        oam.double_size = false;
        Ok(())
    }

    /// Set angle and scale of a rotation group.
    ///
    /// `angle` is 512 units per turn and may be up to one turn out of range.
    /// Scales run 0-512 where 256 is normal size; bigger values are clamped.
    pub fn set_rotation_scale(
        &mut self,
        video: &mut impl VideoHardware,
        screen: Screen,
        group: u8,
        angle: i16,
        sx: u16,
        sy: u16,
    ) -> Result<()> {
        let group = check_rot_group(group)?;
        let sx = sx.min(512);
        let sy = sy.min(512);
        video.set_sprite_affine(screen, group, hardware_angle(angle), 512 - sx, 512 - sy);
        Ok(())
    }
}
