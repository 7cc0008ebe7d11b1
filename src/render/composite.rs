use crate::foundation::{
    core::Rect,
    error::{SketchError, SketchResult},
    math::mul_div255_u8,
};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> SketchResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SketchError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Zero every pixel whose center lies outside `clip`.
pub fn mask_outside_in_place(buf: &mut [u8], width: u32, height: u32, clip: Rect) -> SketchResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SketchError::render("mask buffer size overflow"))?;
    if buf.len() != expected_len {
        return Err(SketchError::render(
            "mask_outside_in_place expects a buffer matching width*height*4",
        ));
    }

    for y in 0..height {
        let cy = f64::from(y) + 0.5;
        let row_inside = cy >= clip.y0 && cy < clip.y1;
        for x in 0..width {
            let cx = f64::from(x) + 0.5;
            if row_inside && cx >= clip.x0 && cx < clip.x1 {
                continue;
            }
            let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
            buf[idx..idx + 4].fill(0);
        }
    }
    Ok(())
}

/// Premultiplied to straight alpha, for encoders that expect straight RGBA.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
