use crate::{
    foundation::core::{Line, Point, Viewport},
    scene::config::RoadConfig,
};

/// Fixed per-frame layout of the road scene, derived from the viewport alone.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RoadLayout {
    pub horizon_y: f64,
    pub vanishing_point: Point,
    pub horizon: Line,
    pub left_edge: Line,
    pub right_edge: Line,
    /// Dashed center line, from between the edge tops to above the road bottom.
    pub center_line: Line,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub shading: [Point; 4],
}

impl RoadLayout {
    pub fn compute(viewport: &Viewport, cfg: &RoadConfig) -> Self {
        let w = viewport.width;
        let h = viewport.height;

        let horizon_y = h * cfg.horizon_ratio;
        let vanishing_point = Point::new(w * cfg.vanishing_x_ratio, horizon_y);
        let bottom_y = h - h * cfg.bottom_inset_ratio;

        let left_top = Point::new(vanishing_point.x - cfg.edge_offset, horizon_y);
        let right_top = Point::new(vanishing_point.x + cfg.edge_offset, horizon_y);
        let left_bottom = Point::new(w * cfg.left_bottom_x_ratio, bottom_y);
        let right_bottom = Point::new(w * cfg.right_bottom_x_ratio, bottom_y);

        let center_line = Line::new(
            left_top.midpoint(right_top),
            Point::new(
                (left_bottom.x + right_bottom.x) / 2.0,
                bottom_y - cfg.center_line_lift,
            ),
        );

        Self {
            horizon_y,
            vanishing_point,
            horizon: Line::new((0.0, horizon_y), (w, horizon_y)),
            left_edge: Line::new(left_top, left_bottom),
            right_edge: Line::new(right_top, right_bottom),
            center_line,
            shading: [
                Point::new(left_top.x, horizon_y + cfg.shading_left_nudge),
                Point::new(right_top.x, horizon_y + cfg.shading_right_nudge),
                right_bottom,
                left_bottom,
            ],
        }
    }

    pub fn road_bottom_y(&self) -> f64 {
        self.left_edge.p1.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> Viewport {
        Viewport::new(800.0, 400.0, false)
    }

    #[test]
    fn desktop_edges_match_reference_points() {
        let l = RoadLayout::compute(&desktop(), &RoadConfig::default());
        assert_eq!(l.horizon_y, 80.0);
        assert_eq!(l.left_edge.p0, Point::new(675.0, 80.0));
        assert_eq!(l.left_edge.p1, Point::new(240.0, 368.0));
        assert_eq!(l.right_edge.p0, Point::new(685.0, 80.0));
        assert_eq!(l.right_edge.p1, Point::new(560.0, 368.0));
        assert_eq!(l.horizon, Line::new((0.0, 80.0), (800.0, 80.0)));
    }

    #[test]
    fn center_line_runs_between_edges() {
        let l = RoadLayout::compute(&desktop(), &RoadConfig::default());
        assert_eq!(l.center_line.p0, Point::new(680.0, 80.0));
        assert_eq!(l.center_line.p1, Point::new(400.0, 328.0));
    }

    #[test]
    fn shading_quad_follows_edges() {
        let l = RoadLayout::compute(&desktop(), &RoadConfig::default());
        assert_eq!(l.shading[0], Point::new(675.0, 82.0));
        assert_eq!(l.shading[1], Point::new(685.0, 83.0));
        assert_eq!(l.shading[2], l.right_edge.p1);
        assert_eq!(l.shading[3], l.left_edge.p1);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let v = Viewport::new(373.0, 250.0, true);
        let cfg = RoadConfig::default();
        assert_eq!(RoadLayout::compute(&v, &cfg), RoadLayout::compute(&v, &cfg));
    }
}
