//! Embedded-image reconstruction.
//!
//! Source images arrive as raw decoded stream bytes plus declared bit
//! depth, colorspace, and filter chain. This module rebuilds something
//! displayable from them: JPEG payloads pass through (CMYK variants are
//! inverted and converted to RGB first), low-level bitmaps are wrapped in
//! a minimal BMP container, and anything else degrades to a tagged raw
//! passthrough instead of failing. Reconstructed rasters that are
//! uniformly pure black or pure white are treated as redaction artifacts
//! and rejected.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};
use crate::model::{ColorSpace, ImageElement};

/// Outcome of reconstructing an image element.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconstructedImage {
    /// A JPEG payload, embeddable as-is.
    Jpeg(Vec<u8>),
    /// A BMP file built from raw bitmap rows.
    Bmp(Vec<u8>),
    /// Unrecognized bit-depth/colorspace permutation: the raw decoded
    /// stream, tagged with enough out-of-band data for manual inspection.
    Raw {
        data: Vec<u8>,
        bits: u8,
        width: u32,
        height: u32,
    },
}

/// Round a byte count up to a 4-byte boundary.
fn align32(x: usize) -> usize {
    x.div_ceil(4) * 4
}

const BMP_FILE_HEADER_LEN: usize = 14;
const BMP_INFO_HEADER_LEN: usize = 40;

/// Minimal BMP container builder.
///
/// Fixed file header + fixed info header + optional color table + row
/// data in bottom-to-top order, each row padded to a 4-byte boundary.
/// Supports the three layouts the reconstructor emits: 1-bit two-color,
/// 8-bit gray-palette, and 24-bit truecolor.
pub struct BmpEncoder {
    buf: Vec<u8>,
    line_size: usize,
    height: u32,
    /// Offset of the first (bottom-most) row slot.
    data_start: usize,
}

impl BmpEncoder {
    /// Create an encoder for the given bit depth and pixel dimensions.
    pub fn new(bits: u8, width: u32, height: u32) -> Result<Self> {
        let ncols: usize = match bits {
            1 => 2,
            8 => 256,
            24 => 0,
            _ => {
                return Err(Error::ImageDecode(format!(
                    "unsupported BMP bit depth: {bits}"
                )))
            }
        };

        let line_size = align32((width as usize * bits as usize + 7) / 8);
        let data_size = line_size * height as usize;
        let header_size = BMP_FILE_HEADER_LEN + BMP_INFO_HEADER_LEN + ncols * 4;

        let mut buf = Vec::with_capacity(header_size + data_size);

        // File header.
        buf.extend_from_slice(b"BM");
        buf.extend_from_slice(&((header_size + data_size) as u32).to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&(header_size as u32).to_le_bytes());

        // Info header.
        buf.extend_from_slice(&(BMP_INFO_HEADER_LEN as u32).to_le_bytes());
        buf.extend_from_slice(&(width as i32).to_le_bytes());
        buf.extend_from_slice(&(height as i32).to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // planes
        buf.extend_from_slice(&(bits as u16).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes()); // compression: none
        buf.extend_from_slice(&(data_size as u32).to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes()); // x pixels/meter
        buf.extend_from_slice(&0i32.to_le_bytes()); // y pixels/meter
        buf.extend_from_slice(&(ncols as u32).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes()); // important colors

        // Color table.
        match ncols {
            2 => {
                for i in [0u8, 255] {
                    buf.extend_from_slice(&[i, i, i, 0]);
                }
            }
            256 => {
                // Linear gray ramp.
                for i in 0..=255u8 {
                    buf.extend_from_slice(&[i, i, i, 0]);
                }
            }
            _ => {}
        }

        debug_assert_eq!(buf.len(), header_size);
        let data_start = buf.len();
        buf.resize(header_size + data_size, 0);

        Ok(Self {
            buf,
            line_size,
            height,
            data_start,
        })
    }

    /// Padded byte length of one destination row.
    pub fn line_size(&self) -> usize {
        self.line_size
    }

    /// Write source row `y` (0 = top). Rows land in reverse order so the
    /// container's bottom-to-top layout displays the image upright.
    pub fn write_row(&mut self, y: u32, data: &[u8]) -> Result<()> {
        if y >= self.height {
            return Err(Error::ImageDecode(format!(
                "row {y} out of range for height {}",
                self.height
            )));
        }
        if data.len() > self.line_size {
            return Err(Error::ImageDecode(format!(
                "row data of {} bytes exceeds line size {}",
                data.len(),
                self.line_size
            )));
        }
        let end = self.data_start + self.line_size * self.height as usize;
        let offset = end - (y as usize + 1) * self.line_size;
        self.buf[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Finish and return the complete BMP file bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Reconstruct displayable bytes from an image element.
///
/// Dispatch order: declared DCT filter first, then bit depth/colorspace.
/// Never fails on an unrecognized permutation (that degrades to
/// [`ReconstructedImage::Raw`]); it does fail on corrupt or truncated
/// pixel data, and the caller decides to skip-and-log.
pub fn reconstruct(element: &ImageElement) -> Result<ReconstructedImage> {
    let (width, height) = (element.pixel_width, element.pixel_height);

    if element.dct_encoded {
        if element.colorspace == ColorSpace::Cmyk {
            // CMYK JPEGs from this pipeline store inverted channel values.
            let mut img = image::load_from_memory_with_format(&element.data, ImageFormat::Jpeg)?;
            img.invert();
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let mut out = Vec::new();
            JpegEncoder::new_with_quality(&mut out, 90).encode_image(&rgb)?;
            return Ok(ReconstructedImage::Jpeg(out));
        }
        return Ok(ReconstructedImage::Jpeg(element.data.clone()));
    }

    match (element.bits, &element.colorspace) {
        (1, _) => {
            let src_row = (width as usize + 7) / 8;
            pack_bmp(1, width, height, src_row, &element.data)
        }
        (8, ColorSpace::Rgb) => {
            let src_row = width as usize * 3;
            let needed = src_row * height as usize;
            if element.data.len() < needed {
                return Err(Error::ImageDecode(format!(
                    "truncated image stream: {} bytes, {needed} required for {width}x{height} RGB",
                    element.data.len()
                )));
            }
            // The container stores channels as BGR; swap while copying.
            let mut swapped = element.data[..needed].to_vec();
            for px in swapped.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            pack_bmp(24, width, height, src_row, &swapped)
        }
        (8, ColorSpace::Gray) => {
            let src_row = width as usize;
            pack_bmp(8, width, height, src_row, &element.data)
        }
        _ => Ok(ReconstructedImage::Raw {
            data: element.data.clone(),
            bits: element.bits,
            width,
            height,
        }),
    }
}

/// Copy byte-packed source rows into a BMP container.
fn pack_bmp(
    bits: u8,
    width: u32,
    height: u32,
    src_row: usize,
    data: &[u8],
) -> Result<ReconstructedImage> {
    let needed = src_row * height as usize;
    if data.len() < needed {
        return Err(Error::ImageDecode(format!(
            "truncated image stream: {} bytes, {} required for {}x{} at {} bpp",
            data.len(),
            needed,
            width,
            height,
            bits
        )));
    }

    let mut bmp = BmpEncoder::new(bits, width, height)?;
    let mut i = 0;
    for y in 0..height {
        bmp.write_row(y, &data[i..i + src_row])?;
        i += src_row;
    }
    Ok(ReconstructedImage::Bmp(bmp.into_bytes()))
}

/// Decode reconstructed bytes into pixels.
///
/// Raw passthrough payloads are not decodable; the error carries the
/// out-of-band tag so the log identifies the stream.
pub fn decode(reconstructed: &ReconstructedImage) -> Result<DynamicImage> {
    match reconstructed {
        ReconstructedImage::Jpeg(bytes) => {
            Ok(image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?)
        }
        ReconstructedImage::Bmp(bytes) => {
            Ok(image::load_from_memory_with_format(bytes, ImageFormat::Bmp)?)
        }
        ReconstructedImage::Raw {
            bits,
            width,
            height,
            data,
        } => Err(Error::ImageDecode(format!(
            "raw passthrough image ({} bytes, {} bpp, {}x{}) is not displayable",
            data.len(),
            bits,
            width,
            height
        ))),
    }
}

/// Blank-image detection: reject rasters that are uniformly pure black
/// or pure white. Anything with two distinct luminance values, or a
/// uniform mid tone, is kept.
pub fn is_blank(img: &DynamicImage) -> bool {
    let luma = img.to_luma8();
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for p in luma.pixels() {
        min = min.min(p.0[0]);
        max = max.max(p.0[0]);
    }
    min == max && (min == 0 || min == u8::MAX)
}
