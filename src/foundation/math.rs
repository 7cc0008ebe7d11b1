#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(Self::OFFSET_BASIS ^ seed)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y).min(255) as u8
}

/// Euclidean remainder into `[0, 1)`, also for negative inputs.
pub(crate) fn fract01(x: f64) -> f64 {
    let r = x.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if r >= 1.0 { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_seeded_hash_is_stable() {
        let mut a = Fnv1a64::new(7);
        a.write_bytes(b"road");
        let mut b = Fnv1a64::new(7);
        b.write_bytes(b"ro");
        b.write_bytes(b"ad");
        assert_eq!(a.finish(), b.finish());

        let mut c = Fnv1a64::new(8);
        c.write_bytes(b"road");
        assert_ne!(a.finish(), c.finish());
    }

    #[test]
    fn f64_writes_distinguish_widths() {
        let mut a = Fnv1a64::new(0);
        a.write_f64(800.0);
        let mut b = Fnv1a64::new(0);
        b.write_f64(801.0);
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn mul_div255_variants_align() {
        for x in [0u16, 1, 127, 255] {
            for y in [0u16, 1, 127, 255] {
                assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
            }
        }
    }

    #[test]
    fn fract01_wraps_negative_values() {
        assert_eq!(fract01(1.25), 0.25);
        assert_eq!(fract01(-0.25), 0.75);
        assert_eq!(fract01(3.0), 0.0);
        assert!(fract01(-1e-20) < 1.0);
    }
}
