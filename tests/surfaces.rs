use roadsketch::{
    CpuSettings, CpuSurface, FrameRGBA, RenderOpts, Rgb8, RoughSketcher, Scene, SceneConfig,
    SvgSurface, Theme, Viewport, present, render_frames, simulate_until,
    scene::compose::ROAD_GRADIENT_ID,
};

fn desktop() -> Viewport {
    Viewport::new(800.0, 400.0, false)
}

fn differs_from(f: &FrameRGBA, x: u32, y: u32, bg: [u8; 4]) -> bool {
    f.pixel(x, y).is_some_and(|px| px != bg)
}

#[test]
fn svg_document_carries_the_whole_frame() {
    let tick = simulate_until(&SceneConfig::default(), desktop(), 60.0, Theme::Light, 500.0)
        .unwrap();
    let mut surface = SvgSurface::new();
    present(&tick.frame, &RoughSketcher::default(), &mut surface).unwrap();
    let svg = surface.finish().unwrap();

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="800" height="400""#));
    assert!(svg.contains(&format!(r#"<linearGradient id="{ROAD_GRADIENT_ID}""#)));
    assert!(svg.contains(&format!("url(#{ROAD_GRADIENT_ID})")));
    assert!(svg.contains("<clipPath"));
    assert!(svg.matches("<path").count() >= tick.frame.primitive_count() - 1);
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn svg_output_is_reproducible() {
    let render = || {
        let tick =
            simulate_until(&SceneConfig::default(), desktop(), 60.0, Theme::Dark, 1234.0).unwrap();
        let mut surface = SvgSurface::new();
        present(&tick.frame, &RoughSketcher::default(), &mut surface).unwrap();
        surface.finish().unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn cpu_surface_draws_road_over_background() {
    let mut scene = Scene::new(SceneConfig::default(), desktop()).unwrap();
    let tick = scene.tick(0.0, Theme::Light);

    let mut surface = CpuSurface::new(CpuSettings {
        background: Some(Rgb8::WHITE),
        ..CpuSettings::default()
    });
    present(&tick.frame, &RoughSketcher::default(), &mut surface).unwrap();
    let f = surface.readback().unwrap();
    assert_eq!((f.width, f.height), (800, 400));

    let white = [255, 255, 255, 255];
    // Horizon across the whole width, give or take the sketch jitter.
    for x in [50u32, 300, 750] {
        assert!(
            (74..=86).any(|y| differs_from(&f, x, y, white)),
            "no horizon stroke near x={x}"
        );
    }
    // Bottom corners are outside the road and below the horizon.
    assert_eq!(f.pixel(5, 395), Some(white));
    assert_eq!(f.pixel(795, 395), Some(white));
}

#[test]
fn offline_frames_come_back_in_order() {
    let opts = RenderOpts {
        fps: 20.0,
        start_ms: 0.0,
        frames: 4,
        theme: Theme::Light,
    };
    let mut surface = CpuSurface::new(CpuSettings::default());
    let captured = render_frames(
        &SceneConfig::default(),
        Viewport::new(320.0, 250.0, true),
        &opts,
        &RoughSketcher::default(),
        &mut surface,
        |s, frame| Ok((frame.seed, s.readback()?)),
    )
    .unwrap();

    assert_eq!(captured.len(), 4);
    let seeds: Vec<u64> = captured.iter().map(|(seed, _)| *seed).collect();
    assert_eq!(seeds, vec![0, 0, 1, 1]);
    for (_, rgba) in &captured {
        assert_eq!((rgba.width, rgba.height), (320, 250));
        assert!(rgba.premultiplied);
        assert!(rgba.data.chunks_exact(4).any(|px| px[3] != 0));
    }
}
