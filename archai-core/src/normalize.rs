//! Image normalization for the style classifier.
//!
//! The network was trained on images prepared in a fixed way, and the same
//! preparation must be reproduced exactly at inference time:
//!
//! 1. channels reordered from RGB to BGR
//! 2. resized to 256x256 by area averaging
//! 3. converted to 8-bit grayscale with luminance weights
//! 4. scaled to `f32` in [0.0, 1.0]
//!
//! Swapping the resampling filter (nearest, bilinear, Lanczos) or the
//! grayscale weights shifts accuracy without any visible error, so both are
//! implemented here rather than borrowed from `image::imageops`.
//!
//! The resize follows OpenCV's `INTER_AREA`: true area averaging when both
//! axes shrink, a two-tap area-linear kernel on both axes when either one
//! grows. Weights are applied in `f64` and rounded once per pass, whereas
//! OpenCV accumulates in 11-bit fixed point, so individual samples may differ
//! from OpenCV by one gray level.
//!
//! # Usage
//!
//! ```no_run
//! use archai_core::ImageNormalizer;
//!
//! let bytes = std::fs::read("facade.jpg").unwrap();
//! let tensor = ImageNormalizer::default().normalize_bytes(&bytes).unwrap();
//! assert_eq!(tensor.shape(), [256, 256, 1]);
//! ```

use std::io::Cursor;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader, RgbImage};
use tracing::debug;

use crate::error::{ImageFault, Result};
use crate::tensor::{ImageTensor, TENSOR_HEIGHT, TENSOR_WIDTH};

/// Channels in an RGB/BGR pixel.
const COLOR_CHANNELS: usize = 3;

/// Luminance weights in 14-bit fixed point (0.114, 0.587, 0.299).
const GRAY_SHIFT: u32 = 14;
const GRAY_B: u32 = 1868;
const GRAY_G: u32 = 9617;
const GRAY_R: u32 = 4899;

/// Converts arbitrary RGB images into classifier input tensors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer;

impl ImageNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize an optional image, reporting absence as [`ImageFault::Missing`].
    pub fn normalize_input(&self, image: Option<&RgbImage>) -> Result<ImageTensor> {
        let image = image.ok_or(ImageFault::Missing)?;
        self.normalize(image)
    }

    /// Normalize an RGB image of any size.
    pub fn normalize(&self, image: &RgbImage) -> Result<ImageTensor> {
        let (width, height) = image.dimensions();
        self.normalize_raw(width, height, COLOR_CHANNELS, image.as_raw())
    }

    /// Normalize a decoded image of any pixel format.
    ///
    /// Non-RGB formats (grayscale, RGBA, 16-bit) are converted to RGB8 first;
    /// alpha is discarded.
    pub fn normalize_dynamic(&self, image: &DynamicImage) -> Result<ImageTensor> {
        match image {
            DynamicImage::ImageRgb8(rgb) => self.normalize(rgb),
            other => self.normalize(&other.to_rgb8()),
        }
    }

    /// Decode an encoded image (JPEG, PNG, GIF, WebP, BMP) and normalize it.
    ///
    /// The EXIF orientation tag, when present, is applied before
    /// normalizing, so a portrait phone photo is classified upright.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<ImageTensor> {
        if bytes.is_empty() {
            return Err(ImageFault::Missing.into());
        }
        let image = decode_upright(bytes)?;
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded image"
        );
        self.normalize_dynamic(&image)
    }

    /// Normalize an interleaved RGB pixel buffer.
    ///
    /// `channels` must be 3 and `pixels` must hold exactly
    /// `width * height * channels` samples.
    pub fn normalize_raw(
        &self,
        width: u32,
        height: u32,
        channels: usize,
        pixels: &[u8],
    ) -> Result<ImageTensor> {
        if width == 0 || height == 0 {
            return Err(ImageFault::ZeroArea { width, height }.into());
        }
        if channels != COLOR_CHANNELS {
            return Err(ImageFault::Layout(format!(
                "expected {COLOR_CHANNELS} color channels, got {channels}"
            ))
            .into());
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| ImageFault::Layout(format!("{width}x{height} image is too large")))?;
        if pixels.len() != expected {
            return Err(ImageFault::Layout(format!(
                "{width}x{height}x{channels} image needs {expected} samples, got {}",
                pixels.len()
            ))
            .into());
        }

        let bgr = rgb_to_bgr(pixels);
        let resized = resize_area(
            &bgr,
            width as usize,
            height as usize,
            COLOR_CHANNELS,
            TENSOR_WIDTH,
            TENSOR_HEIGHT,
        );
        let gray = bgr_to_gray(&resized);
        let data = gray.into_iter().map(|v| v as f32 / 255.0).collect();

        debug!(width, height, "Normalized image to 256x256x1");
        Ok(ImageTensor::from_normalized(data))
    }
}

/// Decode with format sniffing and rotate/flip per the stored orientation.
fn decode_upright(bytes: &[u8]) -> Result<DynamicImage> {
    let decode = |e: ImageError| ImageFault::Decode(e.to_string());

    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageFault::Decode(e.to_string()))?
        .into_decoder()
        .map_err(decode)?;

    // Unreadable metadata must not reject an otherwise valid image
    let orientation = decoder.orientation().unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring unreadable orientation metadata");
        Orientation::NoTransforms
    });

    let mut image = DynamicImage::from_decoder(decoder).map_err(decode)?;
    if orientation != Orientation::NoTransforms {
        debug!(orientation = ?orientation, "Applying EXIF orientation");
        image.apply_orientation(orientation);
    }
    Ok(image)
}

/// Swap the first and third sample of every pixel.
fn rgb_to_bgr(pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len());
    for px in pixels.chunks_exact(COLOR_CHANNELS) {
        out.extend_from_slice(&[px[2], px[1], px[0]]);
    }
    out
}

/// Luminance of interleaved BGR pixels, rounded to 8 bits.
fn bgr_to_gray(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(COLOR_CHANNELS)
        .map(|px| {
            let (b, g, r) = (px[0] as u32, px[1] as u32, px[2] as u32);
            ((b * GRAY_B + g * GRAY_G + r * GRAY_R + (1 << (GRAY_SHIFT - 1))) >> GRAY_SHIFT) as u8
        })
        .collect()
}

/// Source pixels covering one destination pixel along an axis, with the
/// fraction of each source pixel that falls inside it.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);

            (first..last)
                .filter_map(|s| {
                    let overlap = end.min((s + 1) as f64) - start.max(s as f64);
                    (overlap > 1e-12).then_some((s, overlap / (end - start)))
                })
                .collect()
        })
        .collect()
}

/// Two-tap weights used along both axes when either axis is enlarged.
///
/// Destination pixel `d` starts at source pixel `floor(d * scale)` and blends
/// into the next one by the part of the enlarged source pixel it overhangs,
/// so integer enlargements replicate pixels instead of smoothing them.
fn area_linear_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    let inv_scale = dst_len as f64 / src_len as f64;
    (0..dst_len)
        .map(|d| {
            let s = (d as f64 * scale).floor() as usize;
            let overhang = (d + 1) as f64 - (s + 1) as f64 * inv_scale;
            let f = if overhang <= 0.0 {
                0.0
            } else {
                overhang - overhang.floor()
            };

            if s + 1 >= src_len {
                vec![(src_len - 1, 1.0)]
            } else if f == 0.0 {
                vec![(s, 1.0)]
            } else {
                vec![(s, 1.0 - f), (s + 1, f)]
            }
        })
        .collect()
}

/// Resize interleaved 8-bit pixels in area mode.
///
/// When both axes shrink, each destination pixel is the mean of the source
/// region it covers, with partially covered source pixels weighted by the
/// covered fraction. When either axis grows, both axes switch to the two-tap
/// kernel of [`area_linear_weights`]. The filter is separable, so rows and
/// columns are resampled in two passes.
fn resize_area(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    let (x_weights, y_weights) = if dst_w <= src_w && dst_h <= src_h {
        (area_weights(src_w, dst_w), area_weights(src_h, dst_h))
    } else {
        (
            area_linear_weights(src_w, dst_w),
            area_linear_weights(src_h, dst_h),
        )
    };

    // Horizontal pass: src_h rows of dst_w pixels
    let mut rows = vec![0f64; src_h * dst_w * channels];
    for y in 0..src_h {
        let src_row = &src[y * src_w * channels..(y + 1) * src_w * channels];
        let out_row = &mut rows[y * dst_w * channels..(y + 1) * dst_w * channels];
        for (dx, weights) in x_weights.iter().enumerate() {
            for &(sx, w) in weights {
                for c in 0..channels {
                    out_row[dx * channels + c] += w * src_row[sx * channels + c] as f64;
                }
            }
        }
    }

    // Vertical pass
    let mut out = vec![0u8; dst_h * dst_w * channels];
    let row_len = dst_w * channels;
    for (dy, weights) in y_weights.iter().enumerate() {
        let out_row = &mut out[dy * row_len..(dy + 1) * row_len];
        for (i, sample) in out_row.iter_mut().enumerate() {
            let acc: f64 = weights
                .iter()
                .map(|&(sy, w)| w * rows[sy * row_len + i])
                .sum();
            *sample = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
