use crate::foundation::core::Rgb8;

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Rgb8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_endpoints_are_exact() {
        let a = Rgb8::new(0, 10, 255);
        let b = Rgb8::new(255, 20, 0);
        assert_eq!(Rgb8::lerp(&a, &b, 0.0), a);
        assert_eq!(Rgb8::lerp(&a, &b, 1.0), b);
    }

    #[test]
    fn rgb_midpoint_rounds_per_channel() {
        let mid = Rgb8::lerp(&Rgb8::BLACK, &Rgb8::WHITE, 0.5);
        assert_eq!(mid, Rgb8::new(128, 128, 128));
    }
}
