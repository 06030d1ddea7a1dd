//! # Asset Loading
//!
//! Slot tables are filled from a [`ByteSource`]: anything that can report a
//! resource's size and then read it whole. On the console that's the
//! filesystem; [`MemorySource`] serves assets linked into the binary (and tests).
//!
//! Resource names are relative to [`Config::root_folder`](crate::Config) and
//! get an extension per asset kind, so `load_collision_map(.., "maps/cave", ..)`
//! reads `nitrofiles/maps/cave.cmp`.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;

use log::debug;

use crate::config::{Config, MAX_PATH};
use crate::error::{Error, Result};

pub type Path = heapless::String<MAX_PATH>;

pub trait ByteSource {
    /// Size in bytes of the resource at `path`, or `None` if it doesn't exist.
    fn size(&mut self, path: &str) -> Option<usize>;

    /// Fill `buf` with the start of the resource and return how much was read.
    fn read(&mut self, path: &str, buf: &mut [u8]) -> Option<usize>;
}

/// Build `"{root}/{name}.{ext}"`, truncated to [`MAX_PATH`] bytes.
pub fn resource_path(config: &Config, name: &str, ext: &str) -> Path {
    let mut path = Path::new();
    // overflow only truncates; the lookup then fails as not found
    let _ = write!(path, "{}/{}.{}", config.root_folder, name, ext);
    path
}

/// Read a whole resource into a freshly allocated buffer.
pub fn load_blob(source: &mut impl ByteSource, path: &str) -> Result<Vec<u8>> {
    load_blob_limited(source, path, usize::MAX)
}

/// Like [`load_blob`], but refuse anything bigger than `limit` before allocating.
pub fn load_blob_limited(source: &mut impl ByteSource, path: &str, limit: usize) -> Result<Vec<u8>> {
    let not_found = || Error::ResourceNotFound { path: path.to_string() };

    let size = source.size(path).ok_or_else(not_found)?;
    if size > limit {
        return Err(Error::SizeLimitExceeded { path: path.to_string(), limit });
    }

    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| Error::OutOfMemory { bytes: size })?;
    buf.resize(size, 0);

    let read = source.read(path, &mut buf).ok_or_else(not_found)?;
    // short reads leave the tail zeroed
    debug!("loaded {} ({} of {} bytes)", path, read, size);
    Ok(buf)
}

/// Assets held in memory, keyed by full path.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, data: impl Into<Vec<u8>>) {
        self.files.insert(path.to_string(), data.into());
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }
}

impl ByteSource for MemorySource {
    fn size(&mut self, path: &str) -> Option<usize> {
        self.files.get(path).map(Vec::len)
    }

    fn read(&mut self, path: &str, buf: &mut [u8]) -> Option<usize> {
        let data = self.files.get(path)?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Some(n)
    }
}
