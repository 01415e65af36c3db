//! Save files in `MessagePack`.
//!
//! A save holds only what changed since the story's starting world, plus
//! the turn it was taken on. Loading one needs the same starting world.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use parlance_foundation::{Error, ErrorKind, Result};
use parlance_world::SaveDelta;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Save file format version.
pub const FORMAT_VERSION: u32 = 1;

/// File extension for saves.
pub const EXTENSION: &str = "psave";

/// The contents of a save file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Format version the file was written with
    pub version: u32,
    /// Turn the save was taken on
    pub turn: u64,
    /// Changes since the starting world
    pub delta: SaveDelta,
}

impl SaveFile {
    /// Wraps a delta in the current format.
    #[must_use]
    pub fn new(turn: u64, delta: SaveDelta) -> Self {
        Self {
            version: FORMAT_VERSION,
            turn,
            delta,
        }
    }
}

/// Serializes a save with named fields.
///
/// # Errors
///
/// Returns a `Serialization` error if encoding fails.
pub fn to_bytes(save: &SaveFile) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(save).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a save.
///
/// # Errors
///
/// Returns a `Serialization` error if decoding fails or the file was
/// written by a different format version.
pub fn from_bytes(bytes: &[u8]) -> Result<SaveFile> {
    let save: SaveFile = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))?;
    if save.version != FORMAT_VERSION {
        return Err(Error::new(ErrorKind::Serialization(format!(
            "save format version {} is not supported (expected {FORMAT_VERSION})",
            save.version
        ))));
    }
    Ok(save)
}

/// Returns the path for a named save in `dir`.
#[must_use]
pub fn save_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name).with_extension(EXTENSION)
}

/// Writes a save to a file, replacing it if present.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be written.
pub fn save_to_file<P: AsRef<Path>>(save: &SaveFile, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_error = |e: std::io::Error| {
        Error::new(ErrorKind::Io(format!(
            "failed to write '{}': {e}",
            path.display()
        )))
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&to_bytes(save)?).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    debug!(path = %path.display(), turn = save.turn, "save written");
    Ok(())
}

/// Reads a save from a file.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be read, or a `Serialization`
/// error if its contents are not a save.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<SaveFile> {
    let path = path.as_ref();
    let io_error = |e: std::io::Error| {
        Error::new(ErrorKind::Io(format!(
            "failed to read '{}': {e}",
            path.display()
        )))
    };

    let file = File::open(path).map_err(io_error)?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(io_error)?;
    from_bytes(&bytes)
}
