//! Roadsketch draws a hand-sketched road running off to a vanishing point, with a sun that
//! arcs across the sky, stars that fade in at night and road colors that ease between the
//! day and night palettes.
//!
//! Every tick rebuilds the whole frame from owned state:
//!
//! - [`Scene::tick`] advances sun, stars, sign and color transition and returns a [`Frame`]
//! - [`present`] turns the frame into sketchy shapes on a [`DisplaySurface`]
//! - [`Animator`] drives ticks from a host [`FrameScheduler`]; [`render_frames`] does the same
//!   offline at a fixed frame rate
#![forbid(unsafe_code)]

pub mod animation;
pub mod effects;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod runtime;
pub mod scene;

pub use crate::foundation::core::{BezPath, Line, Point, Rect, Rgb8, Theme, Vec2, Viewport};
pub use crate::foundation::error::{SketchError, SketchResult};

pub use crate::geometry::dashes::{Dash, generate_dashes};
pub use crate::geometry::perspective::RoadLayout;
pub use crate::render::cpu::{CpuSettings, CpuSurface, FrameRGBA};
pub use crate::render::pipeline::{RenderOpts, render_frames, simulate_until};
pub use crate::render::present::present;
pub use crate::render::sketch::{Drawable, OpSet, RoughSketcher, SketchBackend};
pub use crate::render::surface::{DisplaySurface, RecordingSurface};
pub use crate::render::svg::SvgSurface;
pub use crate::runtime::animator::{Animator, FrameHandle, FrameScheduler, ManualScheduler};
pub use crate::scene::compose::{Scene, TickOutput};
pub use crate::scene::config::SceneConfig;
pub use crate::scene::model::{Fill, FillStyle, Frame, LinearGradient, Primitive, Style};
