/// One level of a mip chain: tightly packed RGBA8 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Number of levels in a full chain down to 1×1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

fn srgb_to_linear(v: u8) -> f32 {
    let c = v as f32 / 255.0;
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn linear_to_srgb(c: f32) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let s = if c <= 0.003_130_8 { c * 12.92 } else { 1.055 * c.powf(1.0 / 2.4) - 0.055 };
    (s * 255.0).round() as u8
}

/// Builds levels 1.. of the mip chain for sRGB-encoded `rgba` with a 2×2
/// box filter.
///
/// Colour channels are averaged in linear light and re-encoded; alpha is
/// averaged as stored. Level 0 is the caller's buffer and is not repeated.
/// Odd edges clamp, so the last row/column is weighted twice.
pub fn mip_chain(width: u32, height: u32, rgba: &[u8]) -> Vec<MipLevel> {
    let levels = mip_level_count(width, height);
    let to_linear: [f32; 256] = std::array::from_fn(|i| srgb_to_linear(i as u8));
    let mut out: Vec<MipLevel> = Vec::with_capacity(levels.saturating_sub(1) as usize);

    let (mut sw, mut sh) = (width, height);
    for _ in 1..levels {
        let src = out.last().map_or(rgba, |l| l.rgba.as_slice());
        let (dw, dh) = ((sw / 2).max(1), (sh / 2).max(1));
        let mut dst = vec![0u8; (dw * dh * 4) as usize];

        for y in 0..dh {
            for x in 0..dw {
                let x0 = (2 * x).min(sw - 1);
                let x1 = (2 * x + 1).min(sw - 1);
                let y0 = (2 * y).min(sh - 1);
                let y1 = (2 * y + 1).min(sh - 1);
                let texel = |tx: u32, ty: u32, c: u32| src[((ty * sw + tx) * 4 + c) as usize];
                let quad = [(x0, y0), (x1, y0), (x0, y1), (x1, y1)];
                let at = ((y * dw + x) * 4) as usize;

                for c in 0..3 {
                    let sum: f32 = quad.iter().map(|&(tx, ty)| to_linear[texel(tx, ty, c) as usize]).sum();
                    dst[at + c as usize] = linear_to_srgb(sum / 4.0);
                }
                let alpha: u32 = quad.iter().map(|&(tx, ty)| texel(tx, ty, 3) as u32).sum();
                dst[at + 3] = ((alpha + 2) / 4) as u8;
            }
        }

        out.push(MipLevel { width: dw, height: dh, rgba: dst });
        sw = dw;
        sh = dh;
    }

    out
}
