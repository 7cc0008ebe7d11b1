use crate::{
    foundation::{
        core::{Theme, Viewport},
        error::{SketchError, SketchResult},
    },
    render::{present::present, sketch::SketchBackend, surface::DisplaySurface},
    scene::{
        compose::{Scene, TickOutput},
        config::SceneConfig,
        model::Frame,
    },
};

/// Offline stepping parameters. The scene always starts at t=0 and ticks at a fixed rate;
/// frames before `start_ms` are simulated but not presented.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    pub fps: f64,
    pub start_ms: f64,
    pub frames: u32,
    /// Theme the host reports on the very first tick.
    pub theme: Theme,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            fps: 60.0,
            start_ms: 0.0,
            frames: 1,
            theme: Theme::Light,
        }
    }
}

impl RenderOpts {
    pub fn validate(&self) -> SketchResult<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(SketchError::validation("fps must be finite and > 0"));
        }
        if !(self.start_ms.is_finite() && self.start_ms >= 0.0) {
            return Err(SketchError::validation("start_ms must be finite and >= 0"));
        }
        if self.frames == 0 {
            return Err(SketchError::validation("frame count must be > 0"));
        }
        Ok(())
    }

    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    fn first_presented_tick(&self) -> u64 {
        (self.start_ms / self.frame_ms()).ceil() as u64
    }
}

/// Host-side loop state: the scene plus the theme fed back from the previous tick.
struct HostLoop {
    scene: Scene,
    theme: Theme,
}

impl HostLoop {
    fn step(&mut self, timestamp_ms: f64) -> TickOutput {
        let out = self.scene.tick(timestamp_ms, self.theme);
        self.theme = out.theme;
        out
    }
}

/// Tick from 0 up to and including `time_ms`, returning the last tick's output.
#[tracing::instrument(skip(config))]
pub fn simulate_until(
    config: &SceneConfig,
    viewport: Viewport,
    fps: f64,
    theme: Theme,
    time_ms: f64,
) -> SketchResult<TickOutput> {
    let opts = RenderOpts {
        fps,
        start_ms: time_ms,
        frames: 1,
        theme,
    };
    opts.validate()?;

    let mut host = HostLoop {
        scene: Scene::new(config.clone(), viewport)?,
        theme,
    };
    let dt = opts.frame_ms();
    let regular = (time_ms / dt).ceil() as u64;
    for i in 0..regular {
        let t = i as f64 * dt;
        if t >= time_ms {
            break;
        }
        host.step(t);
    }
    Ok(host.step(time_ms))
}

/// Step the scene at a fixed rate, present each requested frame and hand the surface to
/// `capture`. Day/night from each tick is fed back as the next tick's theme.
#[tracing::instrument(skip(config, backend, surface, capture))]
pub fn render_frames<S, T>(
    config: &SceneConfig,
    viewport: Viewport,
    opts: &RenderOpts,
    backend: &dyn SketchBackend,
    surface: &mut S,
    mut capture: impl FnMut(&mut S, &Frame) -> SketchResult<T>,
) -> SketchResult<Vec<T>>
where
    S: DisplaySurface,
{
    opts.validate()?;
    if !viewport.is_valid() {
        return Err(SketchError::validation(format!(
            "viewport {}x{} is not drawable",
            viewport.width, viewport.height
        )));
    }

    let mut host = HostLoop {
        scene: Scene::new(config.clone(), viewport)?,
        theme: opts.theme,
    };
    let dt = opts.frame_ms();
    let first = opts.first_presented_tick();
    let last = first + u64::from(opts.frames);

    let mut out = Vec::with_capacity(opts.frames as usize);
    for i in 0..last {
        let tick = host.step(i as f64 * dt);
        if i < first {
            continue;
        }
        present(&tick.frame, backend, surface)?;
        out.push(capture(surface, &tick.frame)?);
    }
    tracing::debug!(frames = out.len(), "offline render finished");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{sketch::RoughSketcher, surface::RecordingSurface};

    fn desktop() -> Viewport {
        Viewport::new(800.0, 400.0, false)
    }

    #[test]
    fn opts_are_validated() {
        let bad = RenderOpts {
            fps: 0.0,
            ..RenderOpts::default()
        };
        assert!(bad.validate().is_err());
        let none = RenderOpts {
            frames: 0,
            ..RenderOpts::default()
        };
        assert!(none.validate().is_err());
    }

    #[test]
    fn frames_are_captured_from_start_time() {
        let opts = RenderOpts {
            fps: 10.0,
            start_ms: 250.0,
            frames: 3,
            theme: Theme::Light,
        };
        let mut surface = RecordingSurface::new();
        let seeds = render_frames(
            &SceneConfig::default(),
            desktop(),
            &opts,
            &RoughSketcher::default(),
            &mut surface,
            |s, frame| {
                assert!(s.call_count() > 0);
                Ok(frame.seed)
            },
        )
        .unwrap();
        // Ticks at 300, 400, 500 ms.
        assert_eq!(seeds, vec![3, 4, 5]);
    }

    #[test]
    fn sun_decides_the_theme_fed_back() {
        let out = simulate_until(&SceneConfig::default(), desktop(), 60.0, Theme::Light, 100.0)
            .unwrap();
        // Early in the cycle the sun is still below the horizon.
        assert_eq!(out.theme, Theme::Dark);
        assert_eq!(out.frame.seed, 1);
    }

    #[test]
    fn undrawable_viewport_is_rejected_offline() {
        let mut surface = RecordingSurface::new();
        let err = render_frames(
            &SceneConfig::default(),
            Viewport::new(0.0, 400.0, false),
            &RenderOpts::default(),
            &RoughSketcher::default(),
            &mut surface,
            |_, _| Ok(()),
        );
        assert!(err.is_err());
    }
}
