use crate::foundation::core::{Line, Point, Rect, Rgb8, Viewport};

/// One fully rebuilt frame: everything the display surface should show, back to front.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub viewport: Viewport,
    /// Jitter seed the frame was composed with.
    pub seed: u64,
    pub primitives: Vec<Primitive>,
}

impl Frame {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            seed: 0,
            primitives: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Leaf primitives, descending into groups.
    pub fn primitive_count(&self) -> usize {
        self.primitives.iter().map(Primitive::leaf_count).sum()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Gradient(LinearGradient),
    Line {
        line: Line,
        style: Style,
    },
    Polygon {
        points: Vec<Point>,
        style: Style,
    },
    Circle {
        center: Point,
        radius: f64,
        style: Style,
    },
    Rectangle {
        rect: Rect,
        style: Style,
    },
    Group {
        clip: Option<Rect>,
        items: Vec<Primitive>,
    },
}

impl Primitive {
    fn leaf_count(&self) -> usize {
        match self {
            Primitive::Group { items, .. } => items.iter().map(Primitive::leaf_count).sum(),
            _ => 1,
        }
    }

    pub fn style(&self) -> Option<&Style> {
        match self {
            Primitive::Line { style, .. }
            | Primitive::Polygon { style, .. }
            | Primitive::Circle { style, .. }
            | Primitive::Rectangle { style, .. } => Some(style),
            Primitive::Gradient(_) | Primitive::Group { .. } => None,
        }
    }
}

/// Vertical-or-otherwise linear gradient in bounding-box units (`(0,0)` top-left, `(1,1)`
/// bottom-right of the filled shape).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearGradient {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgb8,
    pub opacity: f64,
}

impl LinearGradient {
    /// Top-to-bottom fade of a single color.
    pub fn vertical_fade(id: impl Into<String>, color: Rgb8, top_opacity: f64) -> Self {
        Self {
            id: id.into(),
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, 1.0),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color,
                    opacity: top_opacity,
                },
                GradientStop {
                    offset: 1.0,
                    color,
                    opacity: 0.0,
                },
            ],
        }
    }

    /// Color and opacity at `offset`, clamped to the outer stops.
    pub fn sample(&self, offset: f64) -> (Rgb8, f64) {
        use crate::animation::lerp::Lerp;

        let Some(first) = self.stops.first() else {
            return (Rgb8::BLACK, 0.0);
        };
        if offset <= first.offset {
            return (first.color, first.opacity);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if offset <= b.offset {
                let span = b.offset - a.offset;
                let t = if span > 0.0 {
                    (offset - a.offset) / span
                } else {
                    1.0
                };
                return (
                    Rgb8::lerp(&a.color, &b.color, t),
                    f64::lerp(&a.opacity, &b.opacity, t),
                );
            }
        }
        let last = self.stops[self.stops.len() - 1];
        (last.color, last.opacity)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Fill {
    Solid(Rgb8),
    /// Reference to a `LinearGradient` defined earlier in the same frame.
    Gradient(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    #[default]
    Solid,
    Hachure {
        angle_deg: f64,
        gap: f64,
    },
}

/// Drawing parameters handed to the sketch backend with every shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub stroke: Option<Rgb8>,
    pub stroke_width: f64,
    pub fill: Option<Fill>,
    pub fill_style: FillStyle,
    /// 0 draws exact geometry; larger values wobble more.
    pub roughness: f64,
    pub seed: u64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: None,
            stroke_width: 1.0,
            fill: None,
            fill_style: FillStyle::Solid,
            roughness: 1.0,
            seed: 0,
            opacity: 1.0,
        }
    }
}

impl Style {
    pub fn stroked(color: Rgb8, width: f64, roughness: f64, seed: u64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            roughness,
            seed,
            ..Self::default()
        }
    }

    pub fn filled(fill: Fill, roughness: f64, seed: u64) -> Self {
        Self {
            fill: Some(fill),
            roughness,
            seed,
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_fill_style(mut self, fill_style: FillStyle) -> Self {
        self.fill_style = fill_style;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_count_descends_into_groups() {
        let style = Style::stroked(Rgb8::BLACK, 1.0, 0.0, 1);
        let frame = Frame {
            viewport: Viewport::new(10.0, 10.0, false),
            seed: 1,
            primitives: vec![
                Primitive::Gradient(LinearGradient::vertical_fade("g", Rgb8::WHITE, 0.8)),
                Primitive::Group {
                    clip: Some(Rect::new(0.0, 0.0, 10.0, 5.0)),
                    items: vec![
                        Primitive::Circle {
                            center: Point::new(5.0, 5.0),
                            radius: 2.0,
                            style: style.clone(),
                        },
                        Primitive::Line {
                            line: Line::new((0.0, 0.0), (1.0, 1.0)),
                            style: style.clone(),
                        },
                    ],
                },
                Primitive::Group {
                    clip: None,
                    items: Vec::new(),
                },
            ],
        };
        assert_eq!(frame.primitive_count(), 3);
        assert!(!frame.is_empty());
        assert_eq!(Frame::empty(frame.viewport).primitive_count(), 0);
    }

    #[test]
    fn gradient_samples_between_stops() {
        let g = LinearGradient::vertical_fade("g", Rgb8::WHITE, 0.8);
        assert_eq!(g.sample(-1.0), (Rgb8::WHITE, 0.8));
        let (_, mid) = g.sample(0.5);
        assert!((mid - 0.4).abs() < 1e-12);
        assert_eq!(g.sample(2.0), (Rgb8::WHITE, 0.0));
    }

    #[test]
    fn frames_serialize_with_tagged_primitives() {
        let frame = Frame {
            viewport: Viewport::new(10.0, 10.0, false),
            seed: 7,
            primitives: vec![Primitive::Rectangle {
                rect: Rect::new(0.0, 0.0, 1.0, 1.0),
                style: Style::filled(Fill::Gradient("g".to_string()), 0.5, 7),
            }],
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["primitives"][0]["kind"], "rectangle");
        assert_eq!(json["primitives"][0]["style"]["fill"]["kind"], "gradient");
        let back: Frame = serde_json::from_value(json).unwrap();
        assert_eq!(back, frame);
    }
}
