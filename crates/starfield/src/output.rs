//! # Buffer Output
//!
//! Writes a field as raw little-endian `f32` files, one per attribute, ready
//! to be memory-mapped or uploaded by a renderer:
//!
//! | File            | Layout                     |
//! |-----------------|----------------------------|
//! | `positions.f32` | `x y z` per point          |
//! | `colors.f32`    | `r g b` per point          |
//! | `scales.f32`    | one scale per point        |
//! | `offsets.f32`   | `dx dy dz` per point       |
//! | `vertices.bin`  | [`PointVertex`] per point  |
//!
//! `scales.f32`/`offsets.f32` exist only for fields that carry them,
//! `vertices.bin` only on request.

use std::fs;
use std::path::{Path, PathBuf};

use starfield_procedural::{PointField, PointVertex};

use crate::error::{ConfigError, ConfigResult};

/// Writes the buffers of `field` into `dir`, creating it if needed.
///
/// Returns the written paths in table order.
///
/// # Errors
///
/// [`ConfigError::Io`] for the first file that cannot be written.
pub fn write_field(field: &PointField, dir: &Path, interleaved: bool) -> ConfigResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;

    let mut written = Vec::with_capacity(5);
    let mut write = |name: &str, values: &[f32]| -> ConfigResult<()> {
        let path = dir.join(name);
        let bytes = le_bytes(values);
        fs::write(&path, &bytes).map_err(|e| ConfigError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "buffer written");
        written.push(path);
        Ok(())
    };

    write("positions.f32", field.positions())?;
    write("colors.f32", field.colors())?;
    if let Some(scales) = field.scales() {
        write("scales.f32", scales)?;
    }
    if let Some(offsets) = field.offsets() {
        write("offsets.f32", offsets)?;
    }
    if interleaved {
        let vertices: Vec<PointVertex> = field.interleaved();
        write("vertices.bin", bytemuck::cast_slice(&vertices))?;
    }

    Ok(written)
}

/// Reads a file written by [`write_field`] back into floats.
///
/// # Errors
///
/// [`ConfigError::Io`] when the file cannot be read or its length is not a
/// multiple of four.
pub fn read_f32_file(path: &Path) -> ConfigResult<Vec<f32>> {
    let bytes = fs::read(path).map_err(|e| ConfigError::io(path, e))?;
    if bytes.len() % 4 != 0 {
        return Err(ConfigError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "length is not a multiple of 4"),
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(target_endian = "little")]
fn le_bytes(values: &[f32]) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Borrowed(PointField::as_bytes(values))
}

#[cfg(target_endian = "big")]
fn le_bytes(values: &[f32]) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(values.iter().flat_map(|v| v.to_le_bytes()).collect())
}
