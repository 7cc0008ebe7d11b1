use crate::{
    foundation::error::SketchResult,
    render::{sketch::SketchBackend, surface::DisplaySurface},
    scene::model::{Frame, Primitive},
};

/// Replace the surface contents with `frame`, in primitive order.
///
/// Frames with an undrawable viewport or no primitives make no surface calls at all.
pub fn present(
    frame: &Frame,
    backend: &dyn SketchBackend,
    surface: &mut dyn DisplaySurface,
) -> SketchResult<()> {
    if !frame.viewport.is_valid() || frame.is_empty() {
        return Ok(());
    }
    surface.clear(frame.viewport)?;
    for primitive in &frame.primitives {
        draw(primitive, backend, surface)?;
    }
    Ok(())
}

fn draw(
    primitive: &Primitive,
    backend: &dyn SketchBackend,
    surface: &mut dyn DisplaySurface,
) -> SketchResult<()> {
    match primitive {
        Primitive::Gradient(g) => surface.define_gradient(g),
        Primitive::Line { line, style } => surface.attach(backend.line(*line, style)),
        Primitive::Polygon { points, style } => surface.attach(backend.polygon(points, style)),
        Primitive::Circle {
            center,
            radius,
            style,
        } => surface.attach(backend.circle(*center, *radius, style)),
        Primitive::Rectangle { rect, style } => surface.attach(backend.rectangle(*rect, style)),
        Primitive::Group { clip, items } => {
            if let Some(clip) = clip {
                surface.push_clip(*clip)?;
            }
            for item in items {
                draw(item, backend, surface)?;
            }
            if clip.is_some() {
                surface.pop_clip()?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::{Line, Rect, Rgb8, Viewport},
        render::{
            sketch::RoughSketcher,
            surface::{RecordingSurface, SurfaceCall},
        },
        scene::model::{LinearGradient, Style},
    };

    #[test]
    fn calls_follow_primitive_order() {
        let style = Style::stroked(Rgb8::BLACK, 1.0, 0.0, 1);
        let clip = Rect::new(0.0, 0.0, 10.0, 5.0);
        let frame = Frame {
            viewport: Viewport::new(10.0, 10.0, false),
            seed: 1,
            primitives: vec![
                Primitive::Gradient(LinearGradient::vertical_fade("g", Rgb8::WHITE, 0.8)),
                Primitive::Group {
                    clip: Some(clip),
                    items: vec![Primitive::Line {
                        line: Line::new((0.0, 0.0), (1.0, 1.0)),
                        style: style.clone(),
                    }],
                },
                Primitive::Line {
                    line: Line::new((0.0, 9.0), (9.0, 9.0)),
                    style,
                },
            ],
        };
        let mut surface = RecordingSurface::new();
        present(&frame, &RoughSketcher::default(), &mut surface).unwrap();

        let calls = surface.calls();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0], SurfaceCall::Clear(frame.viewport));
        assert_eq!(calls[1], SurfaceCall::DefineGradient("g".to_string()));
        assert_eq!(calls[2], SurfaceCall::PushClip(clip));
        assert!(matches!(calls[3], SurfaceCall::Attach(_)));
        assert_eq!(calls[4], SurfaceCall::PopClip);
        assert!(matches!(calls[5], SurfaceCall::Attach(_)));
    }

    #[test]
    fn empty_or_invalid_frames_make_no_calls() {
        let mut surface = RecordingSurface::new();
        let backend = RoughSketcher::default();
        present(&Frame::empty(Viewport::new(10.0, 10.0, false)), &backend, &mut surface).unwrap();
        assert_eq!(surface.call_count(), 0);

        let mut frame = Frame::empty(Viewport::new(0.0, 10.0, false));
        frame.primitives.push(Primitive::Gradient(LinearGradient::vertical_fade(
            "g",
            Rgb8::WHITE,
            1.0,
        )));
        present(&frame, &backend, &mut surface).unwrap();
        assert_eq!(surface.call_count(), 0);
    }
}
