use crate::{
    animation::lerp::Lerp,
    foundation::{
        color::parse_color,
        core::{Rgb8, Theme},
        error::SketchResult,
    },
};

/// Desired colors for a theme, as CSS color strings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColorTarget {
    pub theme: Theme,
    pub stroke: String,
    pub gradient: String,
}

impl ColorTarget {
    fn same_colors(&self, other: &ColorTarget) -> bool {
        self.stroke == other.stroke && self.gradient == other.gradient
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TransitionPhase {
    Idle,
    Transitioning { start_ms: f64 },
}

/// Colors to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedColors {
    pub stroke: Rgb8,
    pub gradient: Rgb8,
    /// `Some(p)` while a transition is running (`p` in `[0, 1]`), `None` when idle.
    pub progress: Option<f64>,
    /// Theme the colors are heading to (or resting at).
    pub theme: Theme,
    /// Interpolation failed and the target colors were used directly.
    pub recovered: bool,
}

/// Two-state machine easing stroke/gradient colors between theme palettes.
///
/// A change of desired colors starts a transition only while idle; changes that arrive
/// mid-transition are not queued and get picked up on the first idle tick that still sees them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorTransition {
    duration_ms: f64,
    phase: TransitionPhase,
    start: Option<ColorTarget>,
    target: Option<ColorTarget>,
}

const FALLBACK_STROKE: Rgb8 = Rgb8::BLACK;
const FALLBACK_GRADIENT: Rgb8 = Rgb8::new(224, 224, 224);

impl ColorTransition {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            phase: TransitionPhase::Idle,
            start: None,
            target: None,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, TransitionPhase::Transitioning { .. })
    }

    pub fn target(&self) -> Option<&ColorTarget> {
        self.target.as_ref()
    }

    /// Record the desired colors for this tick. With no recorded target yet, the first
    /// observation runs a transition from the desired colors to themselves.
    pub fn observe(&mut self, desired: &ColorTarget, now_ms: f64) {
        if self.is_transitioning() {
            return;
        }
        let Some(current) = &self.target else {
            tracing::debug!(theme = ?desired.theme, "initial color transition started");
            self.start = Some(desired.clone());
            self.target = Some(desired.clone());
            self.phase = TransitionPhase::Transitioning { start_ms: now_ms };
            return;
        };
        if current.same_colors(desired) {
            return;
        }

        tracing::debug!(
            from = %current.stroke,
            to = %desired.stroke,
            theme = ?desired.theme,
            "color transition started"
        );
        self.start = self.target.replace(desired.clone());
        self.phase = TransitionPhase::Transitioning { start_ms: now_ms };
    }

    fn progress_at(&self, now_ms: f64) -> Option<f64> {
        match self.phase {
            TransitionPhase::Idle => None,
            TransitionPhase::Transitioning { start_ms } => {
                Some(((now_ms - start_ms) / self.duration_ms).clamp(0.0, 1.0))
            }
        }
    }

    /// Colors at `now_ms`. Completes the transition once progress reaches 1.
    pub fn resolve(&mut self, now_ms: f64) -> ResolvedColors {
        let progress = self.progress_at(now_ms);
        let theme = self.target.as_ref().map(|t| t.theme).unwrap_or_default();

        let resolved = match self.interpolate(progress.unwrap_or(1.0)) {
            Ok((stroke, gradient)) => ResolvedColors {
                stroke,
                gradient,
                progress,
                theme,
                recovered: false,
            },
            Err(err) => {
                tracing::warn!(error = %err, "color interpolation failed, using target colors");
                let (stroke, gradient) = self.target_colors_or_fallback();
                ResolvedColors {
                    stroke,
                    gradient,
                    progress,
                    theme,
                    recovered: true,
                }
            }
        };

        if progress.is_some_and(|p| p >= 1.0) {
            tracing::debug!(theme = ?theme, "color transition finished");
            self.phase = TransitionPhase::Idle;
        }
        resolved
    }

    /// `observe` then `resolve`.
    pub fn step(&mut self, desired: &ColorTarget, now_ms: f64) -> ResolvedColors {
        self.observe(desired, now_ms);
        self.resolve(now_ms)
    }

    fn interpolate(&self, p: f64) -> SketchResult<(Rgb8, Rgb8)> {
        let (Some(start), Some(target)) = (&self.start, &self.target) else {
            return Ok((FALLBACK_STROKE, FALLBACK_GRADIENT));
        };
        let stroke = Rgb8::lerp(
            &parse_color(&start.stroke)?,
            &parse_color(&target.stroke)?,
            p,
        );
        let gradient = Rgb8::lerp(
            &parse_color(&start.gradient)?,
            &parse_color(&target.gradient)?,
            p,
        );
        Ok((stroke, gradient))
    }

    fn target_colors_or_fallback(&self) -> (Rgb8, Rgb8) {
        let Some(target) = &self.target else {
            return (FALLBACK_STROKE, FALLBACK_GRADIENT);
        };
        let stroke = parse_color(&target.stroke).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "unusable target stroke color");
            FALLBACK_STROKE
        });
        let gradient = parse_color(&target.gradient).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "unusable target gradient color");
            FALLBACK_GRADIENT
        });
        (stroke, gradient)
    }
}

/// Road shading strength: ramps with the transition toward the target theme, hard 1 (day)
/// or 0 (night) otherwise.
pub fn shading_opacity(colors: &ResolvedColors, current: Theme) -> f64 {
    match colors.progress {
        Some(p) if colors.theme.is_dark() => 1.0 - p,
        Some(p) => p,
        None if current.is_dark() => 0.0,
        None => 1.0,
    }
}
