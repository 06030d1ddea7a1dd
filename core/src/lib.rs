//! # nflib
//!
//! Resource slots and addressing for dual-screen handheld homebrew: collision
//! maps, raw sound samples, paged ("infinite") tiled backgrounds and sprite
//! animation frames.
//!
//! Everything lives in explicit state structs. The simplest way in is
//! [`Context`], which owns one of each:
//!
//! ```ignore
//! let mut nf = Context::new(Config::default());
//! nf.init();
//! nf.collision.load_collision_bg(&mut source, &nf.config, 0, "maps/level1", 1024, 512)?;
//! nf.backgrounds.load_tiled_bg_map(&mut source, &nf.config, 0, "maps/level1", 1024, 512)?;
//! nf.backgrounds.create_tiled_bg(&mut video, Screen::Top, Layer::new(3)?, 0, 8)?;
//!
//! loop {
//!     if nf.collision.get_point(0, px, py + 16)? == 1 {
//!         // standing on ground
//!     }
//!     nf.backgrounds.scroll_bg(&mut video, Screen::Top, Layer::new(3)?, cam_x, cam_y)?;
//! }
//! ```
//!
//! Hardware is reached through the traits in [`hw`]. Enable the `nds` feature
//! for the memory-mapped implementation in `mmio`.

#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod background;
pub mod collision;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod hw;
pub mod loader;
pub mod sine_table;
pub mod slots;
pub mod sound;
pub mod sprite;

#[cfg(feature = "nds")]
pub mod mmio;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use context::Context;
pub use error::{fatal, Error, Result};
pub use hw::{Layer, SamplePlayer, Screen, VideoHardware};
pub use loader::{ByteSource, MemorySource};
