/// Normalized remapping curves. Every curve takes `t` in `[0, 1]` (inputs are clamped).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    InQuad,
    InCubic,
    /// Half-sine hump: 0 at both ends, 1 at `t = 0.5`.
    SineArc,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::InQuad => t * t,
            Self::InCubic => t * t * t,
            Self::SineArc => (t * std::f64::consts::PI).sin(),
        }
    }
}
