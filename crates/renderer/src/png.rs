//! PNG encoding for RGBA figure data.
//!
//! Writes truecolour-with-alpha PNGs (color type 6) with optional `tEXt`
//! metadata chunks for the figure title and axis names.

use std::io::Write;

use crate::error::{RenderError, RenderResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create a PNG image from RGBA pixel data.
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    create_png_with_text(pixels, width, height, &[])
}

/// Create a PNG image with `tEXt` chunks.
///
/// Keywords must be 1-79 Latin-1 characters; invalid entries are skipped.
/// Non-Latin-1 characters in values are replaced with `?`.
pub fn create_png_with_text(
    pixels: &[u8],
    width: usize,
    height: usize,
    text: &[(&str, &str)],
) -> RenderResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(RenderError::Encode(format!(
            "invalid image size {}x{}",
            width, height
        )));
    }
    if pixels.len() != width * height * 4 {
        return Err(RenderError::Encode(format!(
            "expected {} bytes of RGBA data for {}x{}, got {}",
            width * height * 4,
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    for (keyword, value) in text {
        if let Some(data) = text_chunk_data(keyword, value) {
            write_chunk(&mut png, b"tEXt", &data);
        }
    }

    let idat_data = deflate_idat_rgba(pixels, width, height)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Build the payload of a `tEXt` chunk: keyword, NUL separator, value.
fn text_chunk_data(keyword: &str, value: &str) -> Option<Vec<u8>> {
    let valid_keyword = (1..=79).contains(&keyword.len())
        && keyword.chars().all(|c| (' '..='~').contains(&c))
        && !keyword.starts_with(' ')
        && !keyword.ends_with(' ');
    if !valid_keyword {
        return None;
    }

    let mut data = Vec::with_capacity(keyword.len() + 1 + value.len());
    data.extend_from_slice(keyword.as_bytes());
    data.push(0);
    data.extend(value.chars().map(|c| match u32::from(c) {
        0 => b'?',
        code @ 1..=255 => code as u8,
        _ => b'?',
    }));
    Some(data)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGBA image data for IDAT chunk.
fn deflate_idat_rgba(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    // Add filter byte (0 = no filter) to each scanline
    let stride = width * 4;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride).take(height) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}
