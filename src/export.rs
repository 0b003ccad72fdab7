//! Grayscale PNG export

use std::path::Path;

use image::GrayImage;

use crate::core::Error;

/// Write a row-major 8-bit buffer as a single-channel grayscale PNG.
///
/// The buffer length must be exactly `width * height`.
pub fn write_grayscale_png(
    path: impl AsRef<Path>,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
) -> Result<(), Error> {
    let expected = (width as usize) * (height as usize);
    let actual = pixels.len();
    if actual != expected {
        return Err(Error::BufferSize { expected, actual });
    }
    let img = GrayImage::from_raw(width, height, pixels)
        .ok_or(Error::BufferSize { expected, actual })?;
    img.save(path)?;
    Ok(())
}
