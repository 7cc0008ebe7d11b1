//! Hand-drawn shape generation.
//!
//! Shapes come back as [`Drawable`]s: plain kurbo paths tagged with how they should be painted,
//! so any [`DisplaySurface`](crate::render::surface::DisplaySurface) can show them.

use kurbo::{Affine, Circle, Shape};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    foundation::core::{BezPath, Line, Point, Rect, Vec2},
    scene::model::{FillStyle, Style},
};

/// One paintable part of a drawable.
#[derive(Clone, Debug, PartialEq)]
pub enum OpSet {
    /// Outline, stroked with the style's stroke color and width.
    Stroke(BezPath),
    /// Closed area, filled with the style's fill.
    Fill(BezPath),
    /// Hachure lines, stroked with the fill color.
    FillSketch(BezPath),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub style: Style,
    pub sets: Vec<OpSet>,
}

impl Drawable {
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Sketch-style shape generator. Identical seed and parameters must give identical output.
pub trait SketchBackend {
    fn line(&self, line: Line, style: &Style) -> Drawable;
    fn rectangle(&self, rect: Rect, style: &Style) -> Drawable;
    fn polygon(&self, points: &[Point], style: &Style) -> Drawable;
    fn circle(&self, center: Point, radius: f64, style: &Style) -> Drawable;
}

/// Jittered double-stroke renderer in the spirit of pencil sketches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoughSketcher {
    /// How much a line bows away from the straight path.
    pub bowing: f64,
    /// Largest endpoint displacement at roughness 1.
    pub max_offset: f64,
    /// Points sampled around a circle.
    pub curve_steps: u32,
    /// Tolerance used when flattening exact circles.
    pub tolerance: f64,
}

impl Default for RoughSketcher {
    fn default() -> Self {
        Self {
            bowing: 1.0,
            max_offset: 2.0,
            curve_steps: 9,
            tolerance: 0.1,
        }
    }
}

struct Jitter {
    rng: StdRng,
    roughness: f64,
}

impl Jitter {
    fn new(style: &Style) -> Self {
        Self {
            rng: StdRng::seed_from_u64(style.seed),
            roughness: style.roughness.max(0.0),
        }
    }

    fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform in `[-range, range)`, scaled by roughness and `gain`.
    fn offset(&mut self, range: f64, gain: f64) -> f64 {
        self.roughness * gain * (self.unit() * 2.0 - 1.0) * range
    }

    fn point(&mut self, p: Point, range: f64) -> Point {
        Point::new(p.x + self.offset(range, 1.0), p.y + self.offset(range, 1.0))
    }

    fn is_exact(&self) -> bool {
        self.roughness == 0.0
    }
}

impl RoughSketcher {
    fn line_pass(&self, j: &mut Jitter, p0: Point, p1: Point, overlay: bool, path: &mut BezPath) {
        let d = p1 - p0;
        let len_sq = d.hypot2();
        let len = len_sq.sqrt();
        let gain = (-0.0016668 * len + 1.233334).clamp(0.4, 1.0);

        let mut offset = self.max_offset;
        if offset * offset * 100.0 > len_sq {
            offset = len / 10.0;
        }
        let range = if overlay { offset / 2.0 } else { offset };

        let diverge = 0.2 + j.unit() * 0.2;
        let bow = self.bowing * self.max_offset / 200.0;
        let mid = Vec2::new(j.offset(bow * d.y, gain), j.offset(-bow * d.x, gain));

        path.move_to((p0.x + j.offset(range, gain), p0.y + j.offset(range, gain)));
        let c1 = Point::new(
            mid.x + p0.x + d.x * diverge + j.offset(range, gain),
            mid.y + p0.y + d.y * diverge + j.offset(range, gain),
        );
        let c2 = Point::new(
            mid.x + p0.x + 2.0 * d.x * diverge + j.offset(range, gain),
            mid.y + p0.y + 2.0 * d.y * diverge + j.offset(range, gain),
        );
        let end = Point::new(p1.x + j.offset(range, gain), p1.y + j.offset(range, gain));
        path.curve_to(c1, c2, end);
    }

    fn sketch_line(&self, j: &mut Jitter, p0: Point, p1: Point, single: bool, path: &mut BezPath) {
        if j.is_exact() {
            path.move_to(p0);
            path.line_to(p1);
            return;
        }
        self.line_pass(j, p0, p1, false, path);
        if !single {
            self.line_pass(j, p0, p1, true, path);
        }
    }

    fn outline(&self, j: &mut Jitter, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        for (i, &p0) in points.iter().enumerate() {
            let p1 = points[(i + 1) % points.len()];
            self.sketch_line(j, p0, p1, false, &mut path);
        }
        path
    }

    fn polygon_fill(&self, j: &mut Jitter, points: &[Point], style: &Style) -> OpSet {
        match style.fill_style {
            FillStyle::Solid => {
                let mut path = BezPath::new();
                for (i, &p) in points.iter().enumerate() {
                    let p = j.point(p, self.max_offset);
                    if i == 0 {
                        path.move_to(p);
                    } else {
                        path.line_to(p);
                    }
                }
                path.close_path();
                OpSet::Fill(path)
            }
            FillStyle::Hachure { angle_deg, gap } => {
                let mut path = BezPath::new();
                for seg in hachure_lines(points, angle_deg, gap) {
                    self.sketch_line(j, seg.p0, seg.p1, true, &mut path);
                }
                OpSet::FillSketch(path)
            }
        }
    }

    fn closed_curve(&self, j: &mut Jitter, center: Point, radius: f64, overlay: bool) -> BezPath {
        let n = self.curve_steps.max(3);
        let step = std::f64::consts::TAU / f64::from(n);
        let range = if overlay { 0.5 } else { 1.0 } * (radius * 0.05).max(1.0);
        let start = j.offset(step * 0.5, 1.0);

        let points: Vec<Point> = (0..n)
            .map(|i| {
                let angle = start + f64::from(i) * step;
                let r = radius + j.offset(range, 1.0);
                Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
            })
            .collect();

        let mut path = BezPath::new();
        let len = points.len();
        path.move_to(points[0]);
        for i in 0..len {
            let p_prev = points[(i + len - 1) % len];
            let p0 = points[i];
            let p1 = points[(i + 1) % len];
            let p2 = points[(i + 2) % len];
            let c1 = p0 + (p1 - p_prev) / 6.0;
            let c2 = p1 - (p2 - p0) / 6.0;
            path.curve_to(c1, c2, p1);
        }
        path.close_path();
        path
    }

    fn circle_polygon(&self, center: Point, radius: f64) -> Vec<Point> {
        let n = (self.curve_steps.max(3) * 4) as usize;
        (0..n)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / n as f64;
                Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect()
    }
}

impl SketchBackend for RoughSketcher {
    fn line(&self, line: Line, style: &Style) -> Drawable {
        let mut sets = Vec::new();
        if style.stroke.is_some() {
            let mut j = Jitter::new(style);
            let mut path = BezPath::new();
            self.sketch_line(&mut j, line.p0, line.p1, false, &mut path);
            sets.push(OpSet::Stroke(path));
        }
        Drawable {
            style: style.clone(),
            sets,
        }
    }

    fn rectangle(&self, rect: Rect, style: &Style) -> Drawable {
        let points = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ];
        self.polygon(&points, style)
    }

    fn polygon(&self, points: &[Point], style: &Style) -> Drawable {
        let mut sets = Vec::new();
        if points.len() < 2 {
            return Drawable {
                style: style.clone(),
                sets,
            };
        }

        let mut j = Jitter::new(style);
        if style.fill.is_some() && points.len() >= 3 {
            sets.push(self.polygon_fill(&mut j, points, style));
        }
        if style.stroke.is_some() {
            sets.push(OpSet::Stroke(self.outline(&mut j, points)));
        }
        Drawable {
            style: style.clone(),
            sets,
        }
    }

    fn circle(&self, center: Point, radius: f64, style: &Style) -> Drawable {
        let mut sets = Vec::new();
        if !(radius.is_finite() && radius > 0.0) {
            return Drawable {
                style: style.clone(),
                sets,
            };
        }

        let mut j = Jitter::new(style);
        let exact = j.is_exact();
        let circle = || Circle::new(center, radius).to_path(self.tolerance);

        if style.fill.is_some() {
            match style.fill_style {
                FillStyle::Solid => {
                    let path = if exact {
                        circle()
                    } else {
                        self.closed_curve(&mut j, center, radius, false)
                    };
                    sets.push(OpSet::Fill(path));
                }
                FillStyle::Hachure { .. } => {
                    let points = self.circle_polygon(center, radius);
                    sets.push(self.polygon_fill(&mut j, &points, style));
                }
            }
        }
        if style.stroke.is_some() {
            if exact {
                sets.push(OpSet::Stroke(circle()));
            } else {
                let mut path = self.closed_curve(&mut j, center, radius, false);
                let overlay = self.closed_curve(&mut j, center, radius, true);
                path.extend(overlay.elements().iter().copied());
                sets.push(OpSet::Stroke(path));
            }
        }
        Drawable {
            style: style.clone(),
            sets,
        }
    }
}

/// Parallel fill lines across `points` at `angle_deg`, `gap` apart, clipped to the polygon.
pub fn hachure_lines(points: &[Point], angle_deg: f64, gap: f64) -> Vec<Line> {
    if points.len() < 3 || !gap.is_finite() || gap <= 0.0 {
        return Vec::new();
    }
    let gap = gap.max(0.1);

    let angle = angle_deg.to_radians();
    let to_scan = Affine::rotate(-angle);
    let back = Affine::rotate(angle);
    let rotated: Vec<Point> = points.iter().map(|&p| to_scan * p).collect();

    let (y_min, y_max) = rotated
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });

    let mut out = Vec::new();
    let mut xs = Vec::new();
    let mut y = y_min + gap / 2.0;
    while y < y_max {
        xs.clear();
        for (i, &a) in rotated.iter().enumerate() {
            let b = rotated[(i + 1) % rotated.len()];
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if y >= lo.y && y < hi.y {
                xs.push(lo.x + (y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y));
            }
        }
        xs.sort_by(f64::total_cmp);
        for pair in xs.chunks_exact(2) {
            out.push(Line::new(back * Point::new(pair[0], y), back * Point::new(pair[1], y)));
        }
        y += gap;
    }
    out
}
