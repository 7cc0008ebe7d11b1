use crate::{
    foundation::core::{Theme, Viewport},
    render::{present::present, sketch::SketchBackend, surface::DisplaySurface},
    scene::compose::{Scene, TickOutput},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host capability that calls back once per display frame.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler driven by hand: records requests and cancellations, fires nothing on its own.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pub requested: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}

/// Runs the scene one tick per display frame.
///
/// At most one frame request is outstanding. The loop goes dormant (no request held) while the
/// viewport is undrawable and picks up again when `set_viewport` brings a drawable one.
pub struct Animator<S, B> {
    scene: Scene,
    scheduler: S,
    backend: B,
    pending: Option<FrameHandle>,
    running: bool,
}

impl<S: FrameScheduler, B: SketchBackend> Animator<S, B> {
    pub fn new(scene: Scene, scheduler: S, backend: B) -> Self {
        Self {
            scene,
            scheduler,
            backend,
            pending: None,
            running: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self) {
        self.running = true;
        self.schedule();
    }

    pub fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            tracing::debug!(handle = handle.0, "animation stopped");
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.scene.set_viewport(viewport);
        if viewport.is_valid() {
            self.schedule();
        } else if let Some(handle) = self.pending.take() {
            tracing::debug!(handle = handle.0, "viewport not drawable, releasing frame");
            self.scheduler.cancel_frame(handle);
        }
    }

    /// One scheduled frame fired. Runs a single tick, presents it and asks for the next frame.
    ///
    /// Returns `None` when nothing ran: the animator was stopped, the viewport is undrawable,
    /// or the surface is gone (which also ends the loop).
    pub fn on_frame(
        &mut self,
        timestamp_ms: f64,
        theme: Theme,
        surface: Option<&mut dyn DisplaySurface>,
    ) -> Option<TickOutput> {
        if self.pending.take().is_none() || !self.running {
            return None;
        }
        let Some(surface) = surface else {
            tracing::warn!("display surface missing, aborting tick");
            self.running = false;
            return None;
        };
        if !self.scene.viewport().is_valid() {
            tracing::debug!("viewport not drawable, going dormant");
            return None;
        }

        let out = self.scene.tick(timestamp_ms, theme);
        if let Err(err) = present(&out.frame, &self.backend, surface) {
            tracing::warn!(error = %err, "frame presentation failed");
        }
        self.schedule();
        Some(out)
    }

    fn schedule(&mut self) {
        if !self.running || self.pending.is_some() || !self.scene.viewport().is_valid() {
            return;
        }
        let handle = self.scheduler.request_frame();
        tracing::debug!(handle = handle.0, "frame requested");
        self.pending = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        render::{sketch::RoughSketcher, surface::RecordingSurface},
        scene::config::SceneConfig,
    };

    fn animator(width: f64) -> Animator<ManualScheduler, RoughSketcher> {
        let scene = Scene::new(SceneConfig::default(), Viewport::new(width, 400.0, false)).unwrap();
        Animator::new(scene, ManualScheduler::new(), RoughSketcher::default())
    }

    #[test]
    fn each_frame_schedules_exactly_one_more() {
        let mut a = animator(800.0);
        a.start();
        a.start();
        assert_eq!(a.scheduler().requested.len(), 1);

        let mut surface = RecordingSurface::new();
        let out = a.on_frame(0.0, Theme::Light, Some(&mut surface)).unwrap();
        assert!(out.frame.primitive_count() > 0);
        assert!(surface.call_count() > 0);
        assert_eq!(a.scheduler().requested.len(), 2);
        assert!(a.is_scheduled());
    }

    #[test]
    fn missing_surface_ends_the_loop() {
        let mut a = animator(800.0);
        a.start();
        assert!(a.on_frame(0.0, Theme::Light, None).is_none());
        assert!(!a.is_scheduled());
        assert!(!a.is_running());
        assert_eq!(a.scheduler().requested.len(), 1);
    }

    #[test]
    fn zero_width_releases_the_handle_and_resumes_later() {
        let mut a = animator(800.0);
        a.start();
        a.set_viewport(Viewport::new(0.0, 400.0, false));
        assert!(!a.is_scheduled());
        assert_eq!(a.scheduler().cancelled, vec![FrameHandle(0)]);

        let mut surface = RecordingSurface::new();
        assert!(a.on_frame(16.0, Theme::Light, Some(&mut surface)).is_none());
        assert_eq!(surface.call_count(), 0);

        a.set_viewport(Viewport::new(640.0, 400.0, false));
        assert!(a.is_scheduled());
        assert!(a.on_frame(32.0, Theme::Light, Some(&mut surface)).is_some());
        assert!(surface.call_count() > 0);
    }

    #[test]
    fn stop_cancels_and_ignores_late_frames() {
        let mut a = animator(800.0);
        a.start();
        a.stop();
        assert_eq!(a.scheduler().cancelled, vec![FrameHandle(0)]);
        let mut surface = RecordingSurface::new();
        assert!(a.on_frame(0.0, Theme::Light, Some(&mut surface)).is_none());
        assert_eq!(surface.call_count(), 0);
    }

    #[test]
    fn starting_with_an_empty_viewport_stays_dormant() {
        let mut a = animator(0.0);
        a.start();
        assert!(a.is_running());
        assert!(!a.is_scheduled());
        assert!(a.scheduler().requested.is_empty());
    }
}
