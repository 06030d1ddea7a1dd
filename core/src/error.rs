use alloc::string::String;
use core::fmt::{Display, Formatter};
use log::error;

pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while managing slots, sprites and sounds.
///
/// Coordinate queries outside a map are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Slot index past the end of its table.
    InvalidSlotId { table: &'static str, id: usize, capacity: usize },
    /// Load into a slot that already holds something.
    SlotInUse { table: &'static str, id: usize },
    /// Unload or query of an empty slot.
    SlotNotInUse { table: &'static str, id: usize },
    OutOfMemory { bytes: usize },
    ResourceNotFound { path: String },
    SizeLimitExceeded { path: String, limit: usize },
    /// Sprite, layer or rotation group id past its limit.
    InvalidId { what: &'static str, id: usize, limit: usize },
    InvalidFrame { sprite: u8, frame: u16, last_frame: u16 },
    SpriteNotCreated { screen: u8, sprite: u8 },
    VramFull { requested: usize, available: usize },
}

impl Error {
    /// Numeric code used by the console library's error screen.
    pub const fn code(&self) -> u16 {
        match self {
            Error::ResourceNotFound { .. } => 101,
            Error::OutOfMemory { .. } => 102,
            Error::InvalidSlotId { .. } | Error::InvalidId { .. } | Error::InvalidFrame { .. } => 106,
            Error::SlotInUse { .. } => 109,
            Error::SlotNotInUse { .. } => 110,
            Error::SpriteNotCreated { .. } => 112,
            Error::VramFull { .. } => 113,
            Error::SizeLimitExceeded { .. } => 116,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidSlotId { table, id, capacity } => {
                write!(f, "{} id {} out of range (0 - {})", table, id, capacity - 1)
            }
            Error::SlotInUse { table, id } => write!(f, "{} id {} is already in use", table, id),
            Error::SlotNotInUse { table, id } => write!(f, "{} id {} is not in use", table, id),
            Error::OutOfMemory { bytes } => write!(f, "out of memory allocating {} bytes", bytes),
            Error::ResourceNotFound { path } => write!(f, "file {} not found", path),
            Error::SizeLimitExceeded { path, limit } => {
                write!(f, "file {} is bigger than {} bytes", path, limit)
            }
            Error::InvalidId { what, id, limit } => {
                write!(f, "{} id {} out of range (0 - {})", what, id, limit)
            }
            Error::InvalidFrame { sprite, frame, last_frame } => write!(
                f,
                "sprite {} frame {} out of range (0 - {})",
                sprite, frame, last_frame
            ),
            Error::SpriteNotCreated { screen, sprite } => {
                write!(f, "sprite {} on screen {} was never created", sprite, screen)
            }
            Error::VramFull { requested, available } => write!(
                f,
                "not enough sprite vram: {} bytes requested, {} free",
                requested, available
            ),
        }
    }
}

/// Report an error and halt.
///
/// Continuing past a corrupted resource table is never safe on the console,
/// so applications that don't want to handle errors route them here:
///
/// ```ignore
/// nf.sound.unload_raw_sound(3).unwrap_or_else(|e| fatal(&e));
/// ```
pub fn fatal(err: &Error) -> ! {
    error!("error {}: {}", err.code(), err);
    panic!("nflib error {}: {}", err.code(), err);
}
