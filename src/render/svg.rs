use std::fmt::Write as _;

use crate::{
    foundation::{
        core::{Rect, Viewport},
        error::{SketchError, SketchResult},
    },
    render::{
        sketch::{Drawable, OpSet},
        surface::DisplaySurface,
    },
    scene::model::{Fill, LinearGradient, Style},
};

/// Builds a standalone SVG document, one `<path>` per op set.
#[derive(Clone, Debug, Default)]
pub struct SvgSurface {
    viewport: Option<Viewport>,
    defs: String,
    body: String,
    depth: usize,
    next_clip: u32,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished document. Fails if nothing was drawn or a clip group is still open.
    pub fn finish(&self) -> SketchResult<String> {
        let Some(vp) = self.viewport else {
            return Err(SketchError::render("svg surface was never cleared"));
        };
        if self.depth != 0 {
            return Err(SketchError::render(format!(
                "svg surface has {} unclosed clip group(s)",
                self.depth
            )));
        }

        let mut out = String::with_capacity(self.defs.len() + self.body.len() + 256);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = vp.width,
            h = vp.height,
        );
        if !self.defs.is_empty() {
            out.push_str("<defs>");
            out.push_str(&self.defs);
            out.push_str("</defs>");
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        Ok(out)
    }

    fn path(&mut self, d: &str, fill: &str, stroke: &str, stroke_width: f64, opacity: f64) {
        let _ = write!(self.body, r#"<path d="{d}" fill="{fill}" stroke="{stroke}""#);
        if stroke != "none" {
            let _ = write!(
                self.body,
                r#" stroke-width="{stroke_width}" stroke-linecap="round" stroke-linejoin="round""#
            );
        }
        if opacity < 1.0 {
            let _ = write!(self.body, r#" opacity="{opacity}""#);
        }
        self.body.push_str("/>");
    }
}

fn fill_paint(style: &Style) -> String {
    match &style.fill {
        Some(Fill::Solid(c)) => c.to_hex(),
        Some(Fill::Gradient(id)) => format!("url(#{id})"),
        None => "none".to_string(),
    }
}

impl DisplaySurface for SvgSurface {
    fn clear(&mut self, viewport: Viewport) -> SketchResult<()> {
        *self = Self {
            viewport: Some(viewport),
            ..Self::default()
        };
        Ok(())
    }

    fn define_gradient(&mut self, gradient: &LinearGradient) -> SketchResult<()> {
        let _ = write!(
            self.defs,
            r#"<linearGradient id="{}" x1="{}" y1="{}" x2="{}" y2="{}">"#,
            gradient.id, gradient.start.x, gradient.start.y, gradient.end.x, gradient.end.y
        );
        for stop in &gradient.stops {
            let _ = write!(
                self.defs,
                r#"<stop offset="{}%" stop-color="{}" stop-opacity="{}"/>"#,
                stop.offset * 100.0,
                stop.color.to_hex(),
                stop.opacity
            );
        }
        self.defs.push_str("</linearGradient>");
        Ok(())
    }

    fn push_clip(&mut self, clip: Rect) -> SketchResult<()> {
        let id = format!("clip-{}", self.next_clip);
        self.next_clip += 1;
        let _ = write!(
            self.defs,
            r#"<clipPath id="{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            clip.x0,
            clip.y0,
            clip.width(),
            clip.height()
        );
        let _ = write!(self.body, r#"<g clip-path="url(#{id})">"#);
        self.depth += 1;
        Ok(())
    }

    fn pop_clip(&mut self) -> SketchResult<()> {
        if self.depth == 0 {
            return Err(SketchError::render("pop_clip without matching push_clip"));
        }
        self.depth -= 1;
        self.body.push_str("</g>");
        Ok(())
    }

    fn attach(&mut self, drawable: Drawable) -> SketchResult<()> {
        let style = &drawable.style;
        let stroke = style.stroke.map(|c| c.to_hex());
        for set in &drawable.sets {
            let (OpSet::Stroke(path) | OpSet::Fill(path) | OpSet::FillSketch(path)) = set;
            if path.elements().is_empty() {
                continue;
            }
            match set {
                OpSet::Stroke(path) => {
                    if let Some(stroke) = &stroke {
                        self.path(&path.to_svg(), "none", stroke, style.stroke_width, style.opacity);
                    }
                }
                OpSet::Fill(path) => {
                    self.path(&path.to_svg(), &fill_paint(style), "none", 0.0, style.opacity);
                }
                OpSet::FillSketch(path) => {
                    let weight = (style.stroke_width / 2.0).max(0.5);
                    self.path(&path.to_svg(), "none", &fill_paint(style), weight, style.opacity);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::{BezPath, Rgb8},
        scene::model::Style,
    };

    fn line_path() -> BezPath {
        let mut p = BezPath::new();
        p.move_to((0.0, 0.0));
        p.line_to((10.0, 5.0));
        p
    }

    #[test]
    fn document_has_defs_clip_and_paths() {
        let mut s = SvgSurface::new();
        s.clear(Viewport::new(800.0, 400.0, false)).unwrap();
        s.define_gradient(&LinearGradient::vertical_fade("road", Rgb8::new(224, 224, 224), 0.8))
            .unwrap();
        s.push_clip(Rect::new(0.0, 0.0, 800.0, 80.0)).unwrap();
        s.attach(Drawable {
            style: Style::stroked(Rgb8::BLACK, 2.0, 0.0, 1),
            sets: vec![OpSet::Stroke(line_path())],
        })
        .unwrap();
        s.pop_clip().unwrap();
        s.attach(Drawable {
            style: Style::filled(Fill::Gradient("road".to_string()), 0.0, 1),
            sets: vec![OpSet::Fill(line_path())],
        })
        .unwrap();

        let doc = s.finish().unwrap();
        assert!(doc.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="800""#));
        assert!(doc.contains(r#"<linearGradient id="road""#));
        assert!(doc.contains(r##"stop-color="#e0e0e0" stop-opacity="0.8""##));
        assert!(doc.contains(r#"<clipPath id="clip-0"><rect x="0" y="0" width="800" height="80"/>"#));
        assert!(doc.contains(r##"stroke="#000000" stroke-width="2""##));
        assert!(doc.contains(r#"fill="url(#road)""#));
        assert_eq!(doc.matches("<path").count(), 2);
    }

    #[test]
    fn hachure_uses_fill_color_and_skips_empty_paths() {
        let mut s = SvgSurface::new();
        s.clear(Viewport::new(20.0, 20.0, false)).unwrap();
        s.attach(Drawable {
            style: Style::stroked(Rgb8::BLACK, 1.0, 0.0, 1)
                .with_fill(Fill::Solid(Rgb8::new(211, 211, 211))),
            sets: vec![OpSet::FillSketch(line_path()), OpSet::FillSketch(BezPath::new())],
        })
        .unwrap();
        let doc = s.finish().unwrap();
        assert_eq!(doc.matches("<path").count(), 1);
        assert!(doc.contains(r##"stroke="#d3d3d3" stroke-width="0.5""##));
    }

    #[test]
    fn unbalanced_clips_are_errors() {
        let mut s = SvgSurface::new();
        assert!(s.finish().is_err());
        s.clear(Viewport::new(10.0, 10.0, false)).unwrap();
        assert!(s.pop_clip().is_err());
        s.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0)).unwrap();
        assert!(s.finish().is_err());
    }
}
