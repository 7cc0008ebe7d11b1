use crate::{
    effects::transitions::{ColorTarget, ColorTransition, ResolvedColors, shading_opacity},
    foundation::{
        color::parse_color,
        core::{Rect, Rgb8, Theme, Viewport},
        error::SketchResult,
    },
    geometry::{dashes::generate_dashes, perspective::RoadLayout},
    scene::{
        config::SceneConfig,
        model::{Fill, FillStyle, Frame, LinearGradient, Primitive, Style},
        sign::SignState,
        stars::{StarField, target_opacity},
        sun::{SunState, sun_rays},
    },
};

pub const ROAD_GRADIENT_ID: &str = "road-gradient";

const SUN_FALLBACK: Rgb8 = Rgb8::new(255, 215, 0);
const SIGN_BOARD: Rgb8 = Rgb8::new(211, 211, 211);
const SIGN_POST: Rgb8 = Rgb8::new(128, 128, 128);
/// Pencil hatching for the sign faces: -41 degrees, four stroke widths apart.
const SIGN_HACHURE: FillStyle = FillStyle::Hachure {
    angle_deg: -41.0,
    gap: 4.0,
};

/// What a tick hands back to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutput {
    pub frame: Frame,
    /// Day/night as decided by the sun this tick; the host should feed it back next tick.
    pub theme: Theme,
    /// `None` when the tick was skipped.
    pub colors: Option<ResolvedColors>,
}

/// Owned animation state of the road scene. `tick` is the only writer.
#[derive(Clone, Debug)]
pub struct Scene {
    config: SceneConfig,
    viewport: Viewport,
    stars: StarField,
    sun: SunState,
    colors: ColorTransition,
    sign: SignState,
}

impl Scene {
    pub fn new(config: SceneConfig, viewport: Viewport) -> SketchResult<Self> {
        config.validate()?;
        Ok(Self {
            stars: StarField::generate(&viewport, &config.stars),
            sun: SunState::new(config.sun.speed),
            colors: ColorTransition::new(config.transition.duration_ms),
            sign: SignState::new(&config.sign),
            viewport,
            config,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn sun(&self) -> &SunState {
        &self.sun
    }

    pub fn sun_mut(&mut self) -> &mut SunState {
        &mut self.sun
    }

    pub fn sign(&self) -> &SignState {
        &self.sign
    }

    pub fn transition(&self) -> &ColorTransition {
        &self.colors
    }

    /// Swap in a new viewport. A width change replaces the whole star set at once; all other
    /// animation state carries over.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.width != self.stars.width() {
            self.stars = StarField::generate(&viewport, &self.config.stars);
        }
        self.viewport = viewport;
    }

    /// Jitter seed for `timestamp_ms`; constant within each `seed_interval_ms` window.
    pub fn seed_for(&self, timestamp_ms: f64) -> u64 {
        (timestamp_ms / self.config.sketch.seed_interval_ms)
            .floor()
            .max(0.0) as u64
    }

    /// Advance all state by one tick and compose the frame, back to front. An invalid viewport
    /// produces an empty frame and leaves the state untouched.
    #[tracing::instrument(skip(self), fields(width = self.viewport.width, height = self.viewport.height))]
    pub fn tick(&mut self, timestamp_ms: f64, theme: Theme) -> TickOutput {
        let viewport = self.viewport;
        if !viewport.is_valid() {
            tracing::debug!("viewport not drawable, skipping tick");
            return TickOutput {
                frame: Frame::empty(viewport),
                theme,
                colors: None,
            };
        }

        let cfg = &self.config;
        let sk = &cfg.sketch;
        let layout = RoadLayout::compute(&viewport, &cfg.road);
        let seed = self.seed_for(timestamp_ms);

        let palette = cfg.palette.for_theme(theme);
        let desired = ColorTarget {
            theme,
            stroke: palette.stroke.clone(),
            gradient: palette.gradient.clone(),
        };
        let colors = self.colors.step(&desired, timestamp_ms);
        let stroke = colors.stroke;

        if !self.stars.is_empty() {
            let target = target_opacity(self.sun.position.y, layout.horizon_y, cfg.stars.fade_band);
            self.stars.fade_toward(target, cfg.stars.fade_step);
        }

        let sun = self.sun.update(&viewport, layout.horizon_y, &cfg.sun);
        let sign_t = self.sign.advance();

        let mut primitives = Vec::with_capacity(16 + self.stars.stars().len());

        let shade = shading_opacity(&colors, theme);
        primitives.push(Primitive::Gradient(LinearGradient::vertical_fade(
            ROAD_GRADIENT_ID,
            colors.gradient,
            cfg.road.shading_top_opacity * shade,
        )));

        for star in self.stars.stars().iter().filter(|s| s.opacity > 0.0) {
            primitives.push(Primitive::Circle {
                center: star.position,
                radius: star.size / 2.0,
                style: Style::filled(Fill::Solid(stroke), sk.star_roughness, seed)
                    .with_opacity(star.opacity),
            });
        }

        if sun.visible {
            let profile = cfg.sun.profile(&viewport);
            let sun_fill = parse_color(&cfg.palette.for_theme(colors.theme).sun_fill)
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "unusable sun color");
                    SUN_FALLBACK
                });
            let mut items = vec![Primitive::Circle {
                center: sun.position,
                radius: profile.diameter / 2.0,
                style: Style::stroked(stroke, sk.sun_stroke_width, sk.sun_roughness, seed)
                    .with_fill(Fill::Solid(sun_fill)),
            }];
            items.extend(
                sun_rays(sun.position, profile, cfg.sun.rays)
                    .into_iter()
                    .map(|line| Primitive::Line {
                        line,
                        style: Style::stroked(stroke, sk.ray_width, sk.ray_roughness, seed),
                    }),
            );
            primitives.push(Primitive::Group {
                clip: Some(Rect::new(0.0, 0.0, viewport.width, layout.horizon_y)),
                items,
            });
        }

        primitives.push(Primitive::Polygon {
            points: layout.shading.to_vec(),
            style: Style::filled(
                Fill::Gradient(ROAD_GRADIENT_ID.to_string()),
                sk.shading_roughness,
                seed,
            ),
        });
        primitives.push(Primitive::Line {
            line: layout.horizon,
            style: Style::stroked(stroke, sk.horizon_width, sk.horizon_roughness, seed),
        });
        primitives.push(Primitive::Line {
            line: layout.left_edge,
            style: Style::stroked(stroke, sk.road_width, sk.road_roughness, seed + 1),
        });
        primitives.push(Primitive::Line {
            line: layout.right_edge,
            style: Style::stroked(stroke, sk.road_width, sk.road_roughness, seed + 2),
        });
        for dash in generate_dashes(layout.center_line, timestamp_ms, &cfg.dashes) {
            primitives.push(Primitive::Line {
                line: dash.line,
                style: Style::stroked(stroke, sk.road_width, sk.road_roughness, seed + 3),
            });
        }

        if cfg.sign.draw {
            let placement = self.sign.placement(sign_t, &layout);
            primitives.push(Primitive::Rectangle {
                rect: placement.board,
                style: Style::stroked(stroke, 1.0, 0.5, seed + 4)
                    .with_fill(Fill::Solid(SIGN_BOARD))
                    .with_fill_style(SIGN_HACHURE),
            });
            primitives.push(Primitive::Rectangle {
                rect: placement.post,
                style: Style::stroked(stroke, 1.0, 0.5, seed + 5)
                    .with_fill(Fill::Solid(SIGN_POST))
                    .with_fill_style(SIGN_HACHURE),
            });
        }

        if sun.theme != theme {
            tracing::debug!(from = ?theme, to = ?sun.theme, "sun flipped day/night");
        }

        TickOutput {
            frame: Frame {
                viewport,
                seed,
                primitives,
            },
            theme: sun.theme,
            colors: Some(colors),
        }
    }
}
