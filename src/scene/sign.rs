use crate::{
    foundation::core::{Point, Rect},
    geometry::perspective::RoadLayout,
    scene::config::SignConfig,
};

/// Road sign that slides from the horizon toward the viewer along the left edge.
///
/// The state advances every tick; drawing it is opt-in (`SignConfig::draw`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignState {
    pub y: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub speed: f64,
}

/// Board and post rectangles of the sign for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignPlacement {
    pub board: Rect,
    pub post: Rect,
    pub scale: f64,
}

const BOARD_W: f64 = 50.0;
const BOARD_H: f64 = 30.0;
const POST_W: f64 = 5.0;
const POST_H: f64 = 25.0;

impl SignState {
    pub fn new(cfg: &SignConfig) -> Self {
        Self {
            y: cfg.start_y,
            min_y: cfg.min_y,
            max_y: cfg.max_y,
            min_scale: cfg.min_scale,
            max_scale: cfg.max_scale,
            speed: cfg.speed,
        }
    }

    fn travel(&self) -> f64 {
        ((self.y - self.min_y) / (self.max_y - self.min_y)).clamp(0.0, 1.0)
    }

    /// Move down (faster as it approaches), wrapping back to `min_y`. Returns the path
    /// parameter the frame should be drawn at.
    pub fn advance(&mut self) -> f64 {
        let mut t = self.travel();
        self.y += self.speed * (0.2 + t * 8.0);
        if self.y > self.max_y {
            self.y = self.min_y;
            t = 0.0;
        }
        t
    }

    pub fn placement(&self, t: f64, road: &RoadLayout) -> SignPlacement {
        let scale = self.min_scale + t * (self.max_scale - self.min_scale);

        let top = road.left_edge.p0;
        let bottom = road.left_edge.p1;
        let span = bottom.y - top.y;
        let road_t = if span.abs() > f64::EPSILON {
            ((self.y - top.y) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let x = top.x + road_t * (bottom.x - top.x) * 2.5 - 2.0;

        let board = Rect::from_origin_size(
            Point::new(x, self.y),
            (BOARD_W * scale, BOARD_H * scale),
        );
        let post_w = POST_W * scale;
        let post = Rect::from_origin_size(
            Point::new(x + (board.width() - post_w) / 2.0, board.y1),
            (post_w, POST_H * scale),
        );
        SignPlacement { board, post, scale }
    }
}
