use std::{collections::HashMap, sync::Arc};

use kurbo::{Cap, Join, Shape, Stroke, StrokeOpts};

use crate::{
    foundation::{
        core::{BezPath, Point, Rect, Rgb8, Viewport},
        error::{SketchError, SketchResult},
    },
    render::{
        composite::{mask_outside_in_place, over_in_place},
        sketch::{Drawable, OpSet},
        surface::DisplaySurface,
    },
    scene::model::{Fill, LinearGradient, Style},
};

/// Rasterized frame, premultiplied RGBA8 unless `premultiplied` says otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuSettings {
    /// Straight background color; `None` leaves the frame transparent.
    pub background: Option<Rgb8>,
    /// Flattening tolerance for stroke outlines, in pixels.
    pub tolerance: f64,
}

impl Default for CpuSettings {
    fn default() -> Self {
        Self {
            background: None,
            tolerance: 0.1,
        }
    }
}

/// Raster surface on `vello_cpu`. Each clip group is drawn into its own layer, masked to the
/// clip rectangle and composited source-over onto its parent.
pub struct CpuSurface {
    settings: CpuSettings,
    width: u16,
    height: u16,
    gradients: HashMap<String, LinearGradient>,
    layers: Vec<Layer>,
}

struct Layer {
    clip: Option<Rect>,
    data: Vec<u8>,
    ctx: vello_cpu::RenderContext,
    dirty: bool,
}

impl Layer {
    fn new(width: u16, height: u16, clip: Option<Rect>) -> Self {
        Self {
            clip,
            data: vec![0u8; usize::from(width) * usize::from(height) * 4],
            ctx: vello_cpu::RenderContext::new(width, height),
            dirty: false,
        }
    }

    /// Rasterize pending draws and composite them onto the layer buffer.
    fn flush(&mut self, width: u16, height: u16) -> SketchResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        over_in_place(&mut self.data, pixmap.data_as_u8_slice(), 1.0)?;
        self.ctx = vello_cpu::RenderContext::new(width, height);
        self.dirty = false;
        Ok(())
    }
}

impl CpuSurface {
    pub fn new(settings: CpuSettings) -> Self {
        Self {
            settings,
            width: 0,
            height: 0,
            gradients: HashMap::new(),
            layers: Vec::new(),
        }
    }

    /// Composited frame so far. Fails while a clip group is still open.
    pub fn readback(&mut self) -> SketchResult<FrameRGBA> {
        if self.layers.len() != 1 {
            return Err(SketchError::render(if self.layers.is_empty() {
                "cpu surface was never cleared"
            } else {
                "readback with an open clip group"
            }));
        }
        let (w, h) = (self.width, self.height);
        let base = &mut self.layers[0];
        base.flush(w, h)?;
        Ok(FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: base.data.clone(),
            premultiplied: true,
        })
    }

    fn top(&mut self) -> SketchResult<&mut Layer> {
        self.layers
            .last_mut()
            .ok_or_else(|| SketchError::render("cpu surface was never cleared"))
    }

    fn fill_solid(&mut self, path: &BezPath, color: Rgb8, opacity: f64) -> SketchResult<()> {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        if a == 0 {
            return Ok(());
        }
        let layer = self.top()?;
        layer.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        layer.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        layer
            .ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, a));
        layer.ctx.fill_path(&bezpath_to_cpu(path));
        layer.dirty = true;
        Ok(())
    }

    fn fill_gradient(&mut self, path: &BezPath, id: &str, opacity: f64) -> SketchResult<()> {
        let gradient = self
            .gradients
            .get(id)
            .ok_or_else(|| SketchError::render(format!("unknown gradient \"{id}\"")))?;
        let bbox = path.bounding_box();
        let w = bbox.width().ceil().max(1.0) as u32;
        let h = bbox.height().ceil().max(1.0) as u32;
        let image = gradient_image(gradient, w, h, opacity)?;

        let layer = self.top()?;
        layer.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        layer
            .ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::translate((bbox.x0, bbox.y0)));
        layer.ctx.set_paint(image);
        layer.ctx.fill_path(&bezpath_to_cpu(path));
        layer.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        layer.dirty = true;
        Ok(())
    }

    fn stroke(&mut self, path: &BezPath, color: Rgb8, width: f64, opacity: f64) -> SketchResult<()> {
        if !(width.is_finite() && width > 0.0) {
            return Ok(());
        }
        let style = Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round);
        let outline = kurbo::stroke(
            path.elements().iter().copied(),
            &style,
            &StrokeOpts::default(),
            self.settings.tolerance,
        );
        self.fill_solid(&outline, color, opacity)
    }

    fn fill(&mut self, path: &BezPath, style: &Style) -> SketchResult<()> {
        match &style.fill {
            Some(Fill::Solid(c)) => self.fill_solid(path, *c, style.opacity),
            Some(Fill::Gradient(id)) => self.fill_gradient(path, id, style.opacity),
            None => Ok(()),
        }
    }
}

impl DisplaySurface for CpuSurface {
    fn clear(&mut self, viewport: Viewport) -> SketchResult<()> {
        if !viewport.is_valid() {
            return Err(SketchError::render("cannot clear to an empty viewport"));
        }
        let (w, h) = viewport.pixel_size();
        let width: u16 = w
            .try_into()
            .map_err(|_| SketchError::render("surface width exceeds u16"))?;
        let height: u16 = h
            .try_into()
            .map_err(|_| SketchError::render("surface height exceeds u16"))?;

        let mut base = Layer::new(width, height, None);
        if let Some(bg) = self.settings.background {
            let px = bg.to_premul_rgba8(1.0);
            for chunk in base.data.chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
        self.width = width;
        self.height = height;
        self.gradients.clear();
        self.layers = vec![base];
        Ok(())
    }

    fn define_gradient(&mut self, gradient: &LinearGradient) -> SketchResult<()> {
        self.gradients
            .insert(gradient.id.clone(), gradient.clone());
        Ok(())
    }

    fn push_clip(&mut self, clip: Rect) -> SketchResult<()> {
        let (w, h) = (self.width, self.height);
        self.top()?.flush(w, h)?;
        self.layers.push(Layer::new(w, h, Some(clip)));
        Ok(())
    }

    fn pop_clip(&mut self) -> SketchResult<()> {
        if self.layers.len() < 2 {
            return Err(SketchError::render("pop_clip without matching push_clip"));
        }
        let (w, h) = (self.width, self.height);
        let mut layer = self
            .layers
            .pop()
            .ok_or_else(|| SketchError::render("layer stack underflow"))?;
        layer.flush(w, h)?;
        if let Some(clip) = layer.clip {
            mask_outside_in_place(&mut layer.data, u32::from(w), u32::from(h), clip)?;
        }
        let parent = self.top()?;
        parent.flush(w, h)?;
        over_in_place(&mut parent.data, &layer.data, 1.0)
    }

    fn attach(&mut self, drawable: Drawable) -> SketchResult<()> {
        let style = &drawable.style;
        for set in &drawable.sets {
            match set {
                OpSet::Stroke(path) => {
                    if let Some(color) = style.stroke {
                        self.stroke(path, color, style.stroke_width, style.opacity)?;
                    }
                }
                OpSet::Fill(path) => self.fill(path, style)?,
                OpSet::FillSketch(path) => {
                    if let Some(Fill::Solid(color)) = &style.fill {
                        let weight = (style.stroke_width / 2.0).max(0.5);
                        self.stroke(path, *color, weight, style.opacity)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Gradient rasterized over a `w`×`h` box, premultiplied.
fn gradient_image(
    gradient: &LinearGradient,
    w: u32,
    h: u32,
    opacity: f64,
) -> SketchResult<vello_cpu::Image> {
    let dir = gradient.end - gradient.start;
    let len_sq = dir.hypot2();
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let w1 = f64::from(w.max(2) - 1);
    let h1 = f64::from(h.max(2) - 1);
    for y in 0..h {
        for x in 0..w {
            let p = Point::new(f64::from(x) / w1, f64::from(y) / h1);
            let t = if len_sq > 0.0 {
                (p - gradient.start).dot(dir) / len_sq
            } else {
                0.0
            };
            let (color, stop_opacity) = gradient.sample(t);
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&color.to_premul_rgba8(stop_opacity * opacity));
        }
    }
    rgba_premul_to_image(&bytes, w, h)
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> SketchResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SketchError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SketchError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SketchError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(bytes_premul: &[u8], width: u32, height: u32) -> SketchResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
