use crate::foundation::{
    core::Rgb8,
    error::{SketchError, SketchResult},
};

/// Parse the subset of CSS colors the palette uses: `#rgb`, `#rrggbb`, `rgb(r, g, b)` and a
/// handful of named colors.
pub fn parse_color(s: &str) -> SketchResult<Rgb8> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SketchError::color("color string is empty"));
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(body) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_fn(body);
    }
    named(&lower).ok_or_else(|| SketchError::color(format!("unknown color \"{s}\"")))
}

fn parse_hex(hex: &str) -> SketchResult<Rgb8> {
    fn nibble(c: char) -> SketchResult<u8> {
        c.to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| SketchError::color(format!("invalid hex digit '{c}'")))
    }

    let digits: Vec<char> = hex.chars().collect();
    match digits.as_slice() {
        [r, g, b] => {
            let (r, g, b) = (nibble(*r)?, nibble(*g)?, nibble(*b)?);
            Ok(Rgb8::new(r * 17, g * 17, b * 17))
        }
        [r1, r0, g1, g0, b1, b0] => Ok(Rgb8::new(
            nibble(*r1)? << 4 | nibble(*r0)?,
            nibble(*g1)? << 4 | nibble(*g0)?,
            nibble(*b1)? << 4 | nibble(*b0)?,
        )),
        _ => Err(SketchError::color(format!(
            "hex color must be #rgb or #rrggbb, got \"#{hex}\""
        ))),
    }
}

fn parse_rgb_fn(body: &str) -> SketchResult<Rgb8> {
    let parts = body
        .split(',')
        .map(|p| {
            let p = p.trim();
            p.parse::<u8>()
                .map_err(|_| SketchError::color(format!("invalid rgb() channel \"{p}\"")))
        })
        .collect::<SketchResult<Vec<_>>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok(Rgb8::new(*r, *g, *b)),
        _ => Err(SketchError::color("rgb() takes exactly three channels")),
    }
}

fn named(name: &str) -> Option<Rgb8> {
    let c = match name {
        "black" => Rgb8::BLACK,
        "white" => Rgb8::WHITE,
        "gold" => Rgb8::new(255, 215, 0),
        "gray" | "grey" => Rgb8::new(128, 128, 128),
        "lightgray" | "lightgrey" => Rgb8::new(211, 211, 211),
        "silver" => Rgb8::new(192, 192, 192),
        "navy" => Rgb8::new(0, 0, 128),
        _ => return None,
    };
    Some(c)
}
