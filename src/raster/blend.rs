use crate::foundation::core::{Bitmap, Rgba8};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Replace the color of `src` with `color`, keeping the coverage of `src`.
pub fn tint(src: PremulRgba8, color: PremulRgba8) -> PremulRgba8 {
    let sa = u16::from(src[3]);
    [
        mul_div255_u8(u16::from(color[0]), sa),
        mul_div255_u8(u16::from(color[1]), sa),
        mul_div255_u8(u16::from(color[2]), sa),
        mul_div255_u8(u16::from(color[3]), sa),
    ]
}

/// Composite `src` onto `dst` with its top-left corner at `(dx, dy)`.
///
/// Pixels falling outside `dst` are clipped. With `tint_color` set every source pixel is drawn
/// in that color at the source pixel's coverage.
pub fn draw_over(dst: &mut Bitmap, src: &Bitmap, dx: i64, dy: i64, tint_color: Option<Rgba8>) {
    let tint_px = tint_color.map(Rgba8::to_premul);

    let x0 = dx.max(0);
    let y0 = dy.max(0);
    let x1 = (dx + i64::from(src.width)).min(i64::from(dst.width));
    let y1 = (dy + i64::from(src.height)).min(i64::from(dst.height));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let dst_stride = dst.width as usize * 4;
    let src_stride = src.width as usize * 4;
    for y in y0..y1 {
        let sy = (y - dy) as usize;
        for x in x0..x1 {
            let sx = (x - dx) as usize;
            let si = sy * src_stride + sx * 4;
            let s = [
                src.data[si],
                src.data[si + 1],
                src.data[si + 2],
                src.data[si + 3],
            ];
            if s[3] == 0 {
                continue;
            }
            let s = match tint_px {
                Some(c) => tint(s, c),
                None => s,
            };

            let di = y as usize * dst_stride + x as usize * 4;
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            dst.data[di..di + 4].copy_from_slice(&over(d, s));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
