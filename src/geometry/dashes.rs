use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Line, Point},
        math::fract01,
    },
    scene::config::DashConfig,
};

/// One dash of an animated center line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Dash {
    pub line: Line,
    /// Distance of the dash start from the line start.
    pub distance: f64,
    /// Cyclic animation parameter the dash was placed at.
    pub t: f64,
}

/// Animated, perspective-spaced dashes along `line` at `timestamp_ms`.
///
/// Pure: identical arguments give identical output, and the pattern repeats every
/// `1 / cfg.speed` milliseconds. Dashes are ordered by placement index, not by distance.
/// The dash start always lies on the line; the far end of a long near-viewer dash may
/// run past `line.p1`.
pub fn generate_dashes(line: Line, timestamp_ms: f64, cfg: &DashConfig) -> Vec<Dash> {
    let total = (line.p1 - line.p0).hypot();
    if !(total.is_finite() && total > f64::EPSILON) || cfg.segments == 0 {
        return Vec::new();
    }
    let dir = (line.p1 - line.p0) / total;

    let n = f64::from(cfg.segments);
    let base_offset = fract01(timestamp_ms * cfg.speed);
    let base_dash = total / (n * cfg.dash_divisor);

    let mut out: Vec<Dash> = Vec::with_capacity(cfg.segments as usize + 2);
    // One extra placement on each side keeps dashes from popping at the ends of the cycle;
    // placements that land on an already used parameter are dropped.
    for i in -1..=(cfg.segments as i64) {
        let t = fract01(i as f64 / n + base_offset);
        if out.iter().any(|d| same_phase(d.t, t)) {
            continue;
        }

        let distance = Ease::InCubic.apply(t) * total;
        if distance > total {
            continue;
        }
        let dash_len = base_dash * (1.0 + Ease::InQuad.apply(t) * cfg.perspective_scale);

        let start: Point = line.p0 + dir * distance;
        let end: Point = start + dir * dash_len;
        out.push(Dash {
            line: Line::new(start, end),
            distance,
            t,
        });
    }
    out
}

fn same_phase(a: f64, b: f64) -> bool {
    let d = (a - b).abs();
    d < 1e-9 || (1.0 - d) < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Line {
        Line::new((680.0, 80.0), (400.0, 328.0))
    }

    #[test]
    fn zero_length_line_yields_nothing() {
        let cfg = DashConfig::default();
        for t in [0.0, 16.7, 1234.5, 1.0e9] {
            assert!(generate_dashes(Line::new((5.0, 5.0), (5.0, 5.0)), t, &cfg).is_empty());
        }
    }

    #[test]
    fn dash_starts_stay_on_the_line() {
        let cfg = DashConfig::default();
        let l = line();
        for step in 0..200 {
            let ts = f64::from(step) * 37.3;
            for d in generate_dashes(l, ts, &cfg) {
                assert!(d.distance >= 0.0 && d.distance <= (l.p1 - l.p0).hypot());
                let along = (d.line.p0 - l.p0).hypot();
                assert!((along - d.distance).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn output_is_deterministic() {
        let cfg = DashConfig::default();
        assert_eq!(
            generate_dashes(line(), 987.0, &cfg),
            generate_dashes(line(), 987.0, &cfg)
        );
    }

    #[test]
    fn one_dash_per_phase() {
        let cfg = DashConfig::default();
        let dashes = generate_dashes(line(), 300.0, &cfg);
        assert_eq!(dashes.len(), cfg.segments as usize);
    }

    #[test]
    fn pattern_loops_after_one_period() {
        let cfg = DashConfig::default();
        let period = 1.0 / cfg.speed;
        for ts in [0.0, 123.0, 1999.0] {
            let mut a = generate_dashes(line(), ts, &cfg);
            let mut b = generate_dashes(line(), ts + period, &cfg);
            a.sort_by(|x, y| x.distance.total_cmp(&y.distance));
            b.sort_by(|x, y| x.distance.total_cmp(&y.distance));
            assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(&b) {
                assert!((x.line.p0 - y.line.p0).hypot() < 1e-6);
                assert!((x.line.p1 - y.line.p1).hypot() < 1e-6);
            }
        }
    }

    #[test]
    fn near_dashes_are_longer() {
        let cfg = DashConfig::default();
        let mut dashes = generate_dashes(line(), 0.0, &cfg);
        dashes.sort_by(|x, y| x.t.total_cmp(&y.t));
        let len = |d: &Dash| (d.line.p1 - d.line.p0).hypot();
        let first = len(dashes.first().unwrap());
        let last = len(dashes.last().unwrap());
        assert!(last > first * 5.0);
    }
}
