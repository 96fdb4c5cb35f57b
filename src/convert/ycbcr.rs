use crate::canvas::surface::Canvas;
use crate::foundation::core::{BufferDescriptor, PixelFormat};
use crate::foundation::error::ChromaplaneResult;
use crate::pool::buffer::{PixelBuffer, PlaneReader, PlaneWriter};
use crate::pool::manager::BufferPool;

/// Q16 fixed-point scale.
const ONE_Q16: i64 = 1 << 16;
const HALF_Q16: i64 = 1 << 15;

/// BT.709 luma coefficients.
const KR: f64 = 0.2126;
const KB: f64 = 0.0722;

/// Full-range pixel range table: biases and clamp bounds applied after the
/// coefficient matrix.
#[derive(Clone, Copy, Debug)]
struct PixelRange {
    yp_bias: i64,
    cbcr_bias: i64,
    yp_min: i64,
    yp_max: i64,
    cbcr_min: i64,
    cbcr_max: i64,
}

/// Full-range table: luma bias 0 with clamp `[1, 255]`, chroma bias 128 with
/// clamp `[0, 255]`.
const FULL_RANGE: PixelRange = PixelRange {
    yp_bias: 0,
    cbcr_bias: 128,
    yp_min: 1,
    yp_max: 255,
    cbcr_min: 0,
    cbcr_max: 255,
};

/// Q16 conversion descriptor, generated once per converter.
#[derive(Clone, Copy, Debug)]
struct ConversionInfo {
    /// RGB weights for luma; row sums to exactly `ONE_Q16`.
    y: [i64; 3],
    /// RGB weights for Cb; row sums to exactly 0.
    cb: [i64; 3],
    /// RGB weights for Cr; row sums to exactly 0.
    cr: [i64; 3],
    range: PixelRange,
}

/// Quantize one coefficient row to Q16, folding the rounding residual into the
/// dominant green weight so the row sums to exactly `target`. Exact row sums
/// make every neutral input land on the bias (128 for chroma) and keep grays
/// bit-exact through luma.
fn quantize_row_q16(row: [f64; 3], target: i64) -> [i64; 3] {
    let mut q = [0i64; 3];
    for (qi, wi) in q.iter_mut().zip(row.iter()) {
        *qi = (wi * ONE_Q16 as f64).round() as i64;
    }
    let sum: i64 = q.iter().sum();
    q[1] += target - sum;
    q
}

fn generate_conversion(range: PixelRange) -> ConversionInfo {
    let kg = 1.0 - KR - KB;
    let cb_den = 2.0 * (1.0 - KB);
    let cr_den = 2.0 * (1.0 - KR);
    ConversionInfo {
        y: quantize_row_q16([KR, kg, KB], ONE_Q16),
        cb: quantize_row_q16([-KR / cb_den, -kg / cb_den, (1.0 - KB) / cb_den], 0),
        cr: quantize_row_q16([(1.0 - KR) / cr_den, -kg / cr_den, -KB / cr_den], 0),
        range,
    }
}

/// Converts a canvas's packed-ARGB buffer into a biplanar full-range BT.709
/// 4:2:0 buffer drawn from a pool.
///
/// The transform is a single pass with no tiling or row parallelism, so
/// repeated conversions of identical input pixels are byte-identical.
pub struct FormatConverter {
    info: ConversionInfo,
}

impl Default for FormatConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatConverter {
    /// Build the fixed BT.709 full-range conversion descriptor.
    pub fn new() -> Self {
        Self {
            info: generate_conversion(FULL_RANGE),
        }
    }

    /// Produce a planar 4:2:0 buffer sized to the canvas's width, height, and
    /// extent.
    ///
    /// Fails when the destination cannot be drawn from the pool or when
    /// either buffer's memory cannot be locked. The pixel math itself never
    /// fails.
    #[tracing::instrument(skip_all, fields(width = canvas.width(), height = canvas.height()))]
    pub fn convert(
        &self,
        canvas: &Canvas,
        pool: &mut BufferPool,
    ) -> ChromaplaneResult<PixelBuffer> {
        let desc = BufferDescriptor::new(
            canvas.width(),
            canvas.height(),
            canvas.extent(),
            PixelFormat::PlanarYCbCr420,
        )?;
        let dest = pool.acquire(desc)?;
        {
            let src = canvas.buffer().lock_readable()?;
            let mut dst = dest.lock_writable()?;
            self.convert_planes(&src, &mut dst, canvas.width(), canvas.height());
        }
        Ok(dest)
    }

    /// Single-pass two-plane transform over the logical region.
    ///
    /// The channel permutation is fixed to the source byte order:
    /// alpha-skip-first packed ARGB, bytes `[_, r, g, b]`.
    fn convert_planes(
        &self,
        src: &PlaneReader<'_>,
        dst: &mut PlaneWriter<'_>,
        width: u32,
        height: u32,
    ) {
        let info = &self.info;

        // Luma plane, full resolution.
        for y in 0..height {
            let s = src.row(0, y);
            let d = dst.row_mut(0, y);
            for x in 0..width as usize {
                let r = i64::from(s[x * 4 + 1]);
                let g = i64::from(s[x * 4 + 2]);
                let b = i64::from(s[x * 4 + 3]);
                let yp = ((info.y[0] * r + info.y[1] * g + info.y[2] * b + HALF_Q16) >> 16)
                    + info.range.yp_bias;
                d[x] = yp.clamp(info.range.yp_min, info.range.yp_max) as u8;
            }
        }

        // Chroma plane: one interleaved Cb/Cr pair per 2x2 block, computed
        // from the box-averaged RGB of the block. Edge blocks on odd
        // dimensions average the pixels that exist.
        for cy in 0..height.div_ceil(2) {
            let y0 = cy * 2;
            let rows = if y0 + 1 < height { 2u32 } else { 1 };
            let d = dst.row_mut(1, cy);
            for cx in 0..width.div_ceil(2) {
                let x0 = (cx * 2) as usize;
                let cols = if (x0 + 1) < width as usize { 2usize } else { 1 };

                let mut sr = 0i64;
                let mut sg = 0i64;
                let mut sb = 0i64;
                for dy in 0..rows {
                    let s = src.row(0, y0 + dy);
                    for dx in 0..cols {
                        let px = (x0 + dx) * 4;
                        sr += i64::from(s[px + 1]);
                        sg += i64::from(s[px + 2]);
                        sb += i64::from(s[px + 3]);
                    }
                }
                let n = i64::from(rows) * cols as i64;
                let ar = (sr + n / 2) / n;
                let ag = (sg + n / 2) / n;
                let ab = (sb + n / 2) / n;

                let cb = ((info.cb[0] * ar + info.cb[1] * ag + info.cb[2] * ab + HALF_Q16) >> 16)
                    + info.range.cbcr_bias;
                let cr = ((info.cr[0] * ar + info.cr[1] * ag + info.cr[2] * ab + HALF_Q16) >> 16)
                    + info.range.cbcr_bias;
                d[cx as usize * 2] = cb.clamp(info.range.cbcr_min, info.range.cbcr_max) as u8;
                d[cx as usize * 2 + 1] = cr.clamp(info.range.cbcr_min, info.range.cbcr_max) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/ycbcr.rs"]
mod tests;
