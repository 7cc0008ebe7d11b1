use crate::{
    animation::{ease::Ease, lerp::Lerp},
    foundation::core::{Line, Point, Theme, Viewport},
    scene::config::{SunConfig, SunProfile},
};

/// Cyclic sun position. `progress` stays in `[0, 1]` and drops back to exactly 0 once it
/// would pass 1 (a hard reset, unlike the dash offset which wraps continuously).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SunState {
    pub progress: f64,
    pub speed: f64,
    pub position: Point,
}

/// What one sun update produced for the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunSample {
    pub position: Point,
    pub theme: Theme,
    /// Whether the sun group should be drawn at all.
    pub visible: bool,
}

impl SunState {
    pub fn new(speed: f64) -> Self {
        Self {
            progress: 0.0,
            speed,
            position: Point::ZERO,
        }
    }

    pub fn advance(&mut self) {
        self.progress += self.speed;
        if self.progress > 1.0 {
            self.progress = 0.0;
        }
    }

    /// Advance one tick and place the sun for `viewport`.
    pub fn update(&mut self, viewport: &Viewport, horizon_y: f64, cfg: &SunConfig) -> SunSample {
        self.advance();
        let profile = cfg.profile(viewport);
        self.position = sun_position(self.progress, viewport, horizon_y, profile);
        SunSample {
            position: self.position,
            theme: theme_for_sun(self.position.y, horizon_y, cfg.theme_change_offset),
            visible: self.position.y < viewport.height,
        }
    }
}

/// Horizontal lerp across the viewport (entering and leaving off-canvas) with a half-sine
/// vertical arc that peaks at `progress = 0.5`.
pub fn sun_position(progress: f64, viewport: &Viewport, horizon_y: f64, p: &SunProfile) -> Point {
    let x = f64::lerp(
        &(viewport.width * p.start_x_ratio),
        &(viewport.width * p.end_x_ratio),
        progress,
    );
    let max_height = horizon_y - p.arc_depth;
    let y = horizon_y - max_height * (1.0 - Ease::SineArc.apply(progress)) - p.vertical_offset;
    Point::new(x, y)
}

/// Night once the sun has sunk `offset` below the horizon.
pub fn theme_for_sun(sun_y: f64, horizon_y: f64, offset: f64) -> Theme {
    Theme::from_dark(sun_y > horizon_y + offset)
}

/// Evenly spaced rays starting `ray_gap` outside the disc.
pub fn sun_rays(center: Point, p: &SunProfile, count: u32) -> Vec<Line> {
    let inner = p.diameter / 2.0 + p.ray_gap;
    let outer = inner + p.ray_length;
    (0..count)
        .map(|i| {
            let angle = f64::from(i) * std::f64::consts::TAU / f64::from(count);
            let (sin, cos) = angle.sin_cos();
            Line::new(
                (center.x + cos * inner, center.y + sin * inner),
                (center.x + cos * outer, center.y + sin * outer),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> Viewport {
        Viewport::new(800.0, 400.0, false)
    }

    #[test]
    fn progress_accumulates_then_resets_to_zero() {
        let mut sun = SunState::new(0.25);
        sun.advance();
        sun.advance();
        sun.advance();
        sun.advance();
        assert_eq!(sun.progress, 1.0);
        sun.advance();
        assert_eq!(sun.progress, 0.0);
    }

    #[test]
    fn overshooting_step_resets_exactly() {
        let mut sun = SunState::new(0.3);
        sun.progress = 0.95;
        sun.advance();
        assert_eq!(sun.progress, 0.0);
    }

    #[test]
    fn progress_matches_closed_form() {
        let speed = 0.001;
        let mut sun = SunState::new(speed);
        for n in 1..=2500u32 {
            sun.advance();
            assert!((0.0..=1.0).contains(&sun.progress));
            if n < 1000 {
                assert!((sun.progress - f64::from(n) * speed).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn arc_peaks_at_half_progress() {
        let p = SunProfile::desktop();
        let v = desktop();
        let start = sun_position(0.0, &v, 80.0, &p);
        let mid = sun_position(0.5, &v, 80.0, &p);
        let end = sun_position(1.0, &v, 80.0, &p);
        assert_eq!(start.x, -80.0);
        assert!((end.x - 880.0).abs() < 1e-9);
        assert_eq!(mid.y, 80.0 - p.vertical_offset);
        assert!(mid.y < start.y);
        assert!((start.y - end.y).abs() < 1e-9);
        // Starts below the horizon so it rises into view.
        assert!(start.y > 80.0);
    }

    #[test]
    fn night_begins_past_the_offset() {
        assert_eq!(theme_for_sun(100.0, 80.0, 20.0), Theme::Light);
        assert_eq!(theme_for_sun(100.1, 80.0, 20.0), Theme::Dark);
        assert_eq!(theme_for_sun(10.0, 80.0, 20.0), Theme::Light);
    }

    #[test]
    fn update_reports_visibility_and_theme() {
        let cfg = SunConfig::default();
        let mut sun = SunState::new(cfg.speed);
        sun.progress = 0.5 - cfg.speed;
        let s = sun.update(&desktop(), 80.0, &cfg);
        assert!(s.visible);
        assert_eq!(s.theme, Theme::Light);

        let mut sun = SunState::new(cfg.speed);
        let s = sun.update(&Viewport::new(800.0, 100.0, false), 20.0, &cfg);
        assert!(!s.visible);
        assert_eq!(s.theme, Theme::Dark);
    }

    #[test]
    fn rays_start_outside_the_disc() {
        let p = SunProfile::desktop();
        let rays = sun_rays(Point::new(100.0, 100.0), &p, 8);
        assert_eq!(rays.len(), 8);
        for r in &rays {
            let d0 = (r.p0 - Point::new(100.0, 100.0)).hypot();
            let d1 = (r.p1 - Point::new(100.0, 100.0)).hypot();
            assert!((d0 - 40.0).abs() < 1e-9);
            assert!((d1 - 60.0).abs() < 1e-9);
        }
        assert!((rays[0].p0.y - 100.0).abs() < 1e-9);
        assert!((rays[2].p0.x - 100.0).abs() < 1e-9);
    }
}
