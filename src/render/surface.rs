use crate::{
    foundation::{
        core::{Rect, Viewport},
        error::SketchResult,
    },
    render::sketch::Drawable,
    scene::model::LinearGradient,
};

/// 2D vector canvas that is cleared and repopulated every tick.
///
/// Calls arrive in paint order. Clips nest; every `push_clip` is matched by a `pop_clip`
/// before the frame ends.
pub trait DisplaySurface {
    fn clear(&mut self, viewport: Viewport) -> SketchResult<()>;
    fn define_gradient(&mut self, gradient: &LinearGradient) -> SketchResult<()>;
    fn push_clip(&mut self, clip: Rect) -> SketchResult<()>;
    fn pop_clip(&mut self) -> SketchResult<()>;
    fn attach(&mut self, drawable: Drawable) -> SketchResult<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Clear(Viewport),
    DefineGradient(String),
    PushClip(Rect),
    PopClip,
    Attach(Drawable),
}

/// Surface that only remembers what it was asked to do.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn drawables(&self) -> impl Iterator<Item = &Drawable> {
        self.calls.iter().filter_map(|c| match c {
            SurfaceCall::Attach(d) => Some(d),
            _ => None,
        })
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self, viewport: Viewport) -> SketchResult<()> {
        // A clear starts a new frame; earlier frames are not kept.
        self.calls.clear();
        self.calls.push(SurfaceCall::Clear(viewport));
        Ok(())
    }

    fn define_gradient(&mut self, gradient: &LinearGradient) -> SketchResult<()> {
        self.calls.push(SurfaceCall::DefineGradient(gradient.id.clone()));
        Ok(())
    }

    fn push_clip(&mut self, clip: Rect) -> SketchResult<()> {
        self.calls.push(SurfaceCall::PushClip(clip));
        Ok(())
    }

    fn pop_clip(&mut self) -> SketchResult<()> {
        self.calls.push(SurfaceCall::PopClip);
        Ok(())
    }

    fn attach(&mut self, drawable: Drawable) -> SketchResult<()> {
        self.calls.push(SurfaceCall::Attach(drawable));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{foundation::core::Rgb8, scene::model::Style};

    #[test]
    fn clear_starts_a_new_frame() {
        let mut s = RecordingSurface::new();
        let vp = Viewport::new(10.0, 10.0, false);
        s.clear(vp).unwrap();
        s.attach(Drawable {
            style: Style::stroked(Rgb8::BLACK, 1.0, 0.0, 0),
            sets: Vec::new(),
        })
        .unwrap();
        assert_eq!(s.call_count(), 2);
        assert_eq!(s.drawables().count(), 1);

        s.clear(vp).unwrap();
        assert_eq!(s.calls(), &[SurfaceCall::Clear(vp)]);
    }
}
