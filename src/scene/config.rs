use crate::foundation::{
    core::{Theme, Viewport},
    error::{SketchError, SketchResult},
};

/// Every tunable of the road scene. Missing sections/fields fall back to the defaults below,
/// so a partial JSON document is a valid config.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub viewport: ViewportConfig,
    pub road: RoadConfig,
    pub dashes: DashConfig,
    pub sun: SunConfig,
    pub stars: StarConfig,
    pub transition: TransitionConfig,
    pub palette: Palette,
    pub sign: SignConfig,
    pub sketch: SketchConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    /// Display widths at or below this are "mobile".
    pub mobile_breakpoint: f64,
    pub mobile_height: f64,
    pub desktop_height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            mobile_height: 250.0,
            desktop_height: 400.0,
        }
    }
}

impl ViewportConfig {
    /// `container_width` is the measured width of the hosting region; `display_width` is the
    /// width of the whole display and only selects the breakpoint.
    pub fn resolve(&self, container_width: f64, display_width: f64) -> Viewport {
        let is_mobile = display_width <= self.mobile_breakpoint;
        let height = if is_mobile {
            self.mobile_height
        } else {
            self.desktop_height
        };
        Viewport::new(container_width, height, is_mobile)
    }
}

impl Viewport {
    /// Viewport for a host that reports the container and display widths.
    pub fn from_host(container_width: f64, display_width: f64, cfg: &ViewportConfig) -> Self {
        cfg.resolve(container_width, display_width)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadConfig {
    pub horizon_ratio: f64,
    pub vanishing_x_ratio: f64,
    /// Lateral separation of the two edges at the horizon.
    pub edge_offset: f64,
    pub bottom_inset_ratio: f64,
    pub left_bottom_x_ratio: f64,
    pub right_bottom_x_ratio: f64,
    /// The dashed center line stops this far above the road bottom.
    pub center_line_lift: f64,
    pub shading_left_nudge: f64,
    pub shading_right_nudge: f64,
    pub shading_top_opacity: f64,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            horizon_ratio: 0.2,
            vanishing_x_ratio: 0.85,
            edge_offset: 5.0,
            bottom_inset_ratio: 0.08,
            left_bottom_x_ratio: 0.3,
            right_bottom_x_ratio: 0.7,
            center_line_lift: 40.0,
            shading_left_nudge: 2.0,
            shading_right_nudge: 3.0,
            shading_top_opacity: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashConfig {
    pub segments: u32,
    /// Offset cycles per millisecond.
    pub speed: f64,
    /// Base dash length is `line_length / (segments * dash_divisor)`.
    pub dash_divisor: f64,
    pub perspective_scale: f64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            segments: 8,
            speed: 0.0005,
            dash_divisor: 12.0,
            perspective_scale: 15.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SunProfile {
    pub diameter: f64,
    pub ray_length: f64,
    pub ray_gap: f64,
    pub start_x_ratio: f64,
    pub end_x_ratio: f64,
    /// Arc amplitude is `horizon_y - arc_depth`.
    pub arc_depth: f64,
    pub vertical_offset: f64,
}

impl SunProfile {
    pub fn desktop() -> Self {
        Self {
            diameter: 60.0,
            ray_length: 20.0,
            ray_gap: 10.0,
            start_x_ratio: -0.1,
            end_x_ratio: 1.1,
            arc_depth: 300.0,
            vertical_offset: 30.0,
        }
    }

    pub fn mobile() -> Self {
        Self {
            diameter: 40.0,
            ray_length: 12.0,
            ray_gap: 6.0,
            start_x_ratio: -0.15,
            end_x_ratio: 1.15,
            arc_depth: 200.0,
            vertical_offset: 20.0,
        }
    }
}

impl Default for SunProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SunConfig {
    /// Progress added per tick.
    pub speed: f64,
    pub rays: u32,
    /// Night starts once the sun sinks this far below the horizon.
    pub theme_change_offset: f64,
    pub desktop: SunProfile,
    pub mobile: SunProfile,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            speed: 0.0008,
            rays: 8,
            theme_change_offset: 20.0,
            desktop: SunProfile::desktop(),
            mobile: SunProfile::mobile(),
        }
    }
}

impl SunConfig {
    pub fn profile(&self, viewport: &Viewport) -> &SunProfile {
        if viewport.is_mobile {
            &self.mobile
        } else {
            &self.desktop
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarConfig {
    pub count: u32,
    /// Stars live in `[0, band_ratio * height)`.
    pub band_ratio: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub fade_band: f64,
    pub fade_step: f64,
    pub seed: u64,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 50,
            band_ratio: 0.18,
            min_size: 0.5,
            max_size: 2.0,
            fade_band: 100.0,
            fade_step: 0.005,
            seed: 0x0057_a125,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    pub duration_ms: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1500.0,
        }
    }
}

/// Colors are kept as CSS strings; they are parsed every tick so a bad value degrades a single
/// frame instead of failing config loading.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeColors {
    pub stroke: String,
    pub gradient: String,
    pub sun_fill: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub day: ThemeColors,
    pub night: ThemeColors,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Palette::default().day
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            day: ThemeColors {
                stroke: "#000000".to_string(),
                gradient: "#e0e0e0".to_string(),
                sun_fill: "#ffd700".to_string(),
            },
            night: ThemeColors {
                stroke: "#f2f2f2".to_string(),
                gradient: "#4a4e69".to_string(),
                sun_fill: "#ffd700".to_string(),
            },
        }
    }
}

impl Palette {
    pub fn for_theme(&self, theme: Theme) -> &ThemeColors {
        match theme {
            Theme::Light => &self.day,
            Theme::Dark => &self.night,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignConfig {
    /// The sign is always animated; it is only drawn when this is set.
    pub draw: bool,
    pub start_y: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub speed: f64,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            draw: false,
            start_y: 150.0,
            min_y: 150.0,
            max_y: 620.0,
            min_scale: 0.001,
            max_scale: 2.5,
            speed: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SketchConfig {
    /// The jitter seed changes once per interval.
    pub seed_interval_ms: f64,
    pub horizon_width: f64,
    pub horizon_roughness: f64,
    pub road_width: f64,
    pub road_roughness: f64,
    pub shading_roughness: f64,
    pub sun_stroke_width: f64,
    pub sun_roughness: f64,
    pub ray_width: f64,
    pub ray_roughness: f64,
    pub star_roughness: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            seed_interval_ms: 100.0,
            horizon_width: 2.0,
            horizon_roughness: 0.5,
            road_width: 1.5,
            road_roughness: 0.8,
            shading_roughness: 0.5,
            sun_stroke_width: 2.0,
            sun_roughness: 0.3,
            ray_width: 3.0,
            ray_roughness: 0.5,
            star_roughness: 0.2,
        }
    }
}

impl SceneConfig {
    pub fn from_json(s: &str) -> SketchResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| SketchError::validation(format!("invalid scene config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SketchResult<()> {
        let v = &self.viewport;
        positive("viewport.mobile_height", v.mobile_height)?;
        positive("viewport.desktop_height", v.desktop_height)?;
        finite("viewport.mobile_breakpoint", v.mobile_breakpoint)?;

        let r = &self.road;
        unit("road.horizon_ratio", r.horizon_ratio)?;
        unit("road.bottom_inset_ratio", r.bottom_inset_ratio)?;
        unit("road.shading_top_opacity", r.shading_top_opacity)?;
        for (name, value) in [
            ("road.vanishing_x_ratio", r.vanishing_x_ratio),
            ("road.edge_offset", r.edge_offset),
            ("road.left_bottom_x_ratio", r.left_bottom_x_ratio),
            ("road.right_bottom_x_ratio", r.right_bottom_x_ratio),
            ("road.center_line_lift", r.center_line_lift),
            ("road.shading_left_nudge", r.shading_left_nudge),
            ("road.shading_right_nudge", r.shading_right_nudge),
        ] {
            finite(name, value)?;
        }

        let d = &self.dashes;
        if d.segments == 0 {
            return Err(SketchError::validation("dashes.segments must be > 0"));
        }
        positive("dashes.dash_divisor", d.dash_divisor)?;
        finite("dashes.speed", d.speed)?;
        finite("dashes.perspective_scale", d.perspective_scale)?;

        let s = &self.sun;
        positive("sun.speed", s.speed)?;
        if s.speed > 1.0 {
            return Err(SketchError::validation("sun.speed must be <= 1"));
        }
        finite("sun.theme_change_offset", s.theme_change_offset)?;
        for (name, p) in [("sun.desktop", &s.desktop), ("sun.mobile", &s.mobile)] {
            positive(&format!("{name}.diameter"), p.diameter)?;
            non_negative(&format!("{name}.ray_length"), p.ray_length)?;
            non_negative(&format!("{name}.ray_gap"), p.ray_gap)?;
            if !(p.start_x_ratio < p.end_x_ratio) {
                return Err(SketchError::validation(format!(
                    "{name}.start_x_ratio must be < end_x_ratio"
                )));
            }
            finite(&format!("{name}.arc_depth"), p.arc_depth)?;
            finite(&format!("{name}.vertical_offset"), p.vertical_offset)?;
        }

        let st = &self.stars;
        unit("stars.band_ratio", st.band_ratio)?;
        positive("stars.min_size", st.min_size)?;
        if !(st.min_size <= st.max_size) || !st.max_size.is_finite() {
            return Err(SketchError::validation(
                "stars.min_size must be <= stars.max_size",
            ));
        }
        positive("stars.fade_band", st.fade_band)?;
        positive("stars.fade_step", st.fade_step)?;

        positive("transition.duration_ms", self.transition.duration_ms)?;

        let sg = &self.sign;
        if !(sg.min_y < sg.max_y) {
            return Err(SketchError::validation("sign.min_y must be < sign.max_y"));
        }
        finite("sign.start_y", sg.start_y)?;
        finite("sign.min_scale", sg.min_scale)?;
        finite("sign.max_scale", sg.max_scale)?;
        finite("sign.speed", sg.speed)?;

        let k = &self.sketch;
        positive("sketch.seed_interval_ms", k.seed_interval_ms)?;
        for (name, value) in [
            ("sketch.horizon_width", k.horizon_width),
            ("sketch.horizon_roughness", k.horizon_roughness),
            ("sketch.road_width", k.road_width),
            ("sketch.road_roughness", k.road_roughness),
            ("sketch.shading_roughness", k.shading_roughness),
            ("sketch.sun_stroke_width", k.sun_stroke_width),
            ("sketch.sun_roughness", k.sun_roughness),
            ("sketch.ray_width", k.ray_width),
            ("sketch.ray_roughness", k.ray_roughness),
            ("sketch.star_roughness", k.star_roughness),
        ] {
            non_negative(name, value)?;
        }

        Ok(())
    }
}

fn finite(name: &str, v: f64) -> SketchResult<()> {
    if !v.is_finite() {
        return Err(SketchError::validation(format!("{name} must be finite")));
    }
    Ok(())
}

fn positive(name: &str, v: f64) -> SketchResult<()> {
    if !(v.is_finite() && v > 0.0) {
        return Err(SketchError::validation(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn non_negative(name: &str, v: f64) -> SketchResult<()> {
    if !(v.is_finite() && v >= 0.0) {
        return Err(SketchError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn unit(name: &str, v: f64) -> SketchResult<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(SketchError::validation(format!("{name} must be in [0, 1]")));
    }
    Ok(())
}
