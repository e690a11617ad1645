//! CPU raster primitives backing filter expressions: 4x5 colour matrices and gaussian blur.

use image::RgbaImage;
use rayon::prelude::*;

use crate::filters::expr::{FilterChain, FilterOp};
use crate::foundation::core::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::foundation::error::{BoothError, BoothResult};

const MAX_BLUR_RADIUS: u32 = 256;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RasterPass {
    /// Row-major 4x5 matrix over straight RGBA in [0,1]; column 5 is the offset.
    ColorMatrix([f32; 20]),
    Blur { radius: u32, sigma: f32 },
}

pub(crate) fn compile_passes(chain: &FilterChain) -> Vec<RasterPass> {
    let mut passes = Vec::with_capacity(chain.ops().len());
    for op in chain.ops() {
        match *op {
            FilterOp::Blur(sigma) => {
                if sigma <= 0.0 {
                    continue;
                }
                let radius = ((sigma * 3.0).ceil() as u32).clamp(1, MAX_BLUR_RADIUS);
                passes.push(RasterPass::Blur { radius, sigma });
            }
            other => {
                if let Some(m) = color_matrix_for(other) {
                    passes.push(RasterPass::ColorMatrix(m));
                }
            }
        }
    }
    passes
}

/// Apply every primitive of `chain` to `img` in expression order.
pub fn apply_filter(chain: &FilterChain, img: &mut RgbaImage) -> BoothResult<()> {
    let (width, height) = img.dimensions();
    for pass in compile_passes(chain) {
        match pass {
            RasterPass::ColorMatrix(m) => color_matrix_rgba8_in_place(img, &m),
            RasterPass::Blur { radius, sigma } => {
                let mut premul = img.as_raw().clone();
                premultiply_rgba8_in_place(&mut premul);
                let mut out = blur_rgba8_premul(&premul, width, height, radius, sigma)?;
                unpremultiply_rgba8_in_place(&mut out);
                *img = RgbaImage::from_raw(width, height, out)
                    .ok_or_else(|| BoothError::encode("blur output size mismatch"))?;
            }
        }
    }
    Ok(())
}

fn color_matrix_for(op: FilterOp) -> Option<[f32; 20]> {
    let m = match op {
        FilterOp::Grayscale(a) => {
            let i = 1.0 - a;
            [
                0.2126 + 0.7874 * i, 0.7152 - 0.7152 * i, 0.0722 - 0.0722 * i, 0.0, 0.0,
                0.2126 - 0.2126 * i, 0.7152 + 0.2848 * i, 0.0722 - 0.0722 * i, 0.0, 0.0,
                0.2126 - 0.2126 * i, 0.7152 - 0.7152 * i, 0.0722 + 0.9278 * i, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]
        }
        FilterOp::Sepia(a) => {
            let i = 1.0 - a;
            [
                0.393 + 0.607 * i, 0.769 - 0.769 * i, 0.189 - 0.189 * i, 0.0, 0.0,
                0.349 - 0.349 * i, 0.686 + 0.314 * i, 0.168 - 0.168 * i, 0.0, 0.0,
                0.272 - 0.272 * i, 0.534 - 0.534 * i, 0.131 + 0.869 * i, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]
        }
        FilterOp::Saturate(s) => [
            0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s, 0.0, 0.0,
            0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s, 0.0, 0.0,
            0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0, 0.0,
        ],
        FilterOp::HueRotate(deg) => {
            let (sin, cos) = deg.to_radians().sin_cos();
            [
                0.213 + cos * 0.787 - sin * 0.213,
                0.715 - cos * 0.715 - sin * 0.715,
                0.072 - cos * 0.072 + sin * 0.928,
                0.0,
                0.0,
                0.213 - cos * 0.213 + sin * 0.143,
                0.715 + cos * 0.285 + sin * 0.140,
                0.072 - cos * 0.072 - sin * 0.283,
                0.0,
                0.0,
                0.213 - cos * 0.213 - sin * 0.787,
                0.715 - cos * 0.715 + sin * 0.715,
                0.072 + cos * 0.928 + sin * 0.072,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
                0.0,
            ]
        }
        FilterOp::Invert(a) => {
            let d = 1.0 - 2.0 * a;
            [
                d, 0.0, 0.0, 0.0, a, //
                0.0, d, 0.0, 0.0, a, //
                0.0, 0.0, d, 0.0, a, //
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]
        }
        FilterOp::Opacity(a) => [
            1.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, a, 0.0,
        ],
        FilterOp::Brightness(b) => [
            b, 0.0, 0.0, 0.0, 0.0, //
            0.0, b, 0.0, 0.0, 0.0, //
            0.0, 0.0, b, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ],
        FilterOp::Contrast(c) => {
            let o = 0.5 - 0.5 * c;
            [
                c, 0.0, 0.0, 0.0, o, //
                0.0, c, 0.0, 0.0, o, //
                0.0, 0.0, c, 0.0, o, //
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]
        }
        FilterOp::Blur(_) => return None,
    };
    Some(m)
}

fn color_matrix_rgba8_in_place(img: &mut RgbaImage, m: &[f32; 20]) {
    let row_len = (img.width() as usize) * 4;
    if row_len == 0 {
        return;
    }
    let buf: &mut [u8] = img;
    buf.par_chunks_mut(row_len).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let r = px[0] as f32 / 255.0;
            let g = px[1] as f32 / 255.0;
            let b = px[2] as f32 / 255.0;
            let a = px[3] as f32 / 255.0;

            let out_r = m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4];
            let out_g = m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9];
            let out_b = m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14];
            let out_a = m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19];

            px[0] = unit_to_u8(out_r);
            px[1] = unit_to_u8(out_g);
            px[2] = unit_to_u8(out_b);
            px[3] = unit_to_u8(out_a);
        }
    });
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> BoothResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BoothError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(BoothError::validation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> BoothResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BoothError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push rounding drift into the centre tap so the kernel sums to exactly 1.0 in Q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let row_len = (width as usize) * 4;
    dst.par_chunks_mut(row_len)
        .take(height as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    let idx = ((y * w + sx) as usize) * 4;
                    for c in 0..4 {
                        acc[c] += (kw as u64) * (src[idx + c] as u64);
                    }
                }
                let out_idx = (x as usize) * 4;
                for c in 0..4 {
                    row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    let row_len = (width as usize) * 4;
    dst.par_chunks_mut(row_len)
        .take(height as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                    let idx = ((sy * w + x) as usize) * 4;
                    for c in 0..4 {
                        acc[c] += (kw as u64) * (src[idx + c] as u64);
                    }
                }
                let out_idx = (x as usize) * 4;
                for c in 0..4 {
                    row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/filters/raster.rs"]
mod tests;
