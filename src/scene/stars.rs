use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    foundation::{
        core::{Point, Viewport},
        math::Fnv1a64,
    },
    scene::config::StarConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Star {
    pub position: Point,
    pub size: f64,
    pub opacity: f64,
}

/// Fixed set of stars above the horizon. Positions and sizes are fixed at creation; only
/// opacities change per tick. The whole set is replaced when the viewport width changes.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StarField {
    width: f64,
    stars: Vec<Star>,
}

impl StarField {
    /// Deterministic for a given `(cfg.seed, viewport)`; invalid viewports produce an empty set.
    pub fn generate(viewport: &Viewport, cfg: &StarConfig) -> Self {
        if !viewport.is_valid() {
            return Self {
                width: viewport.width,
                stars: Vec::new(),
            };
        }

        let mut h = Fnv1a64::new(cfg.seed);
        h.write_f64(viewport.width);
        h.write_f64(viewport.height);
        let mut rng = StdRng::seed_from_u64(h.finish());

        let band = viewport.height * cfg.band_ratio;
        let stars = (0..cfg.count)
            .map(|_| {
                let x = rng.r#gen::<f64>() * viewport.width;
                let y = rng.r#gen::<f64>() * band;
                let size = cfg.min_size + rng.r#gen::<f64>() * (cfg.max_size - cfg.min_size);
                Star {
                    position: Point::new(x, y),
                    size,
                    opacity: 0.0,
                }
            })
            .collect();

        tracing::debug!(
            width = viewport.width,
            count = cfg.count,
            "generated star field"
        );
        Self {
            width: viewport.width,
            stars,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Width the set was generated for.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Move every opacity one `step` toward `target`, landing exactly on it when within a step.
    pub fn fade_toward(&mut self, target: f64, step: f64) {
        let target = target.clamp(0.0, 1.0);
        for star in &mut self.stars {
            star.opacity = approach(star.opacity, target, step);
        }
    }
}

fn approach(current: f64, target: f64, step: f64) -> f64 {
    let delta = target - current;
    // Slack absorbs accumulated rounding so the last step lands exactly.
    if delta.abs() <= step + 1e-12 {
        target
    } else {
        (current + step.copysign(delta)).clamp(0.0, 1.0)
    }
}

/// Stars are fully visible once the sun is `fade_band` below the horizon and invisible while
/// it is above the horizon, fading linearly in between.
pub fn target_opacity(sun_y: f64, horizon_y: f64, fade_band: f64) -> f64 {
    if fade_band <= 0.0 {
        return if sun_y > horizon_y { 1.0 } else { 0.0 };
    }
    ((sun_y - horizon_y) / fade_band).clamp(0.0, 1.0)
}
