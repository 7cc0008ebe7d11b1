use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use roadsketch::{
    CpuSettings, CpuSurface, FrameRGBA, RenderOpts, RoughSketcher, SceneConfig,
    SvgSurface, Theme, Viewport, foundation::color::parse_color, present,
    render::composite::unpremultiply_in_place, render_frames, simulate_until,
};

#[derive(Parser, Debug)]
#[command(name = "roadsketch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate up to a timestamp and write that frame as PNG or SVG.
    Frame(FrameArgs),
    /// Write a numbered PNG sequence.
    Sequence(SequenceArgs),
    /// Print the frame primitives at a timestamp as JSON.
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Width of the hosting container, in logical pixels.
    #[arg(long)]
    width: f64,

    /// Width of the whole display; selects the mobile/desktop layout. Defaults to `--width`.
    #[arg(long)]
    display_width: Option<f64>,

    /// Scene config JSON. Missing fields use the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Theme reported by the host on the first tick.
    #[arg(long, value_enum, default_value_t = ThemeChoice::Light)]
    theme: ThemeChoice,

    /// Tick rate of the simulated display.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Timestamp of the frame, in milliseconds.
    #[arg(long)]
    time_ms: f64,

    /// Output path; `.svg` writes a vector document, anything else a PNG.
    #[arg(long)]
    out: PathBuf,

    /// Background color for PNG output (transparent if omitted).
    #[arg(long)]
    background: Option<String>,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Number of frames to write.
    #[arg(long)]
    frames: u32,

    /// First frame timestamp, in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    start_ms: f64,

    /// Directory for `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Background color (transparent if omitted).
    #[arg(long)]
    background: Option<String>,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Timestamp of the frame, in milliseconds.
    #[arg(long)]
    time_ms: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

impl From<ThemeChoice> for Theme {
    fn from(t: ThemeChoice) -> Self {
        match t {
            ThemeChoice::Light => Theme::Light,
            ThemeChoice::Dark => Theme::Dark,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg: SceneConfig = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse config '{}'", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn resolve_scene(args: &SceneArgs) -> anyhow::Result<(SceneConfig, Viewport)> {
    let cfg = read_config(args.config.as_deref())?;
    let display_width = args.display_width.unwrap_or(args.width);
    let viewport = Viewport::from_host(args.width, display_width, &cfg.viewport);
    if !viewport.is_valid() {
        anyhow::bail!("viewport {}x{} is not drawable", viewport.width, viewport.height);
    }
    Ok((cfg, viewport))
}

fn cpu_settings(background: Option<&str>) -> anyhow::Result<CpuSettings> {
    let background = background
        .map(parse_color)
        .transpose()
        .context("parse background color")?;
    Ok(CpuSettings {
        background,
        ..CpuSettings::default()
    })
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_in_place(&mut data);
    }
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (cfg, viewport) = resolve_scene(&args.scene)?;
    let tick = simulate_until(
        &cfg,
        viewport,
        args.scene.fps,
        args.scene.theme.into(),
        args.time_ms,
    )?;
    ensure_parent(&args.out)?;

    let backend = RoughSketcher::default();
    let is_svg = args
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let mut surface = SvgSurface::new();
        present(&tick.frame, &backend, &mut surface)?;
        std::fs::write(&args.out, surface.finish()?)
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    } else {
        let mut surface = CpuSurface::new(cpu_settings(args.background.as_deref())?);
        present(&tick.frame, &backend, &mut surface)?;
        write_png(&args.out, &surface.readback()?)?;
    }

    eprintln!("wrote {} (theme: {:?})", args.out.display(), tick.theme);
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let (cfg, viewport) = resolve_scene(&args.scene)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let opts = RenderOpts {
        fps: args.scene.fps,
        start_ms: args.start_ms,
        frames: args.frames,
        theme: args.scene.theme.into(),
    };
    let mut surface = CpuSurface::new(cpu_settings(args.background.as_deref())?);
    let mut index = 0u32;
    render_frames(
        &cfg,
        viewport,
        &opts,
        &RoughSketcher::default(),
        &mut surface,
        |surface, _frame| {
            let path = args.out_dir.join(format!("frame_{index:05}.png"));
            index += 1;
            let rgba = surface.readback()?;
            write_png(&path, &rgba).map_err(roadsketch::SketchError::from)
        },
    )?;

    eprintln!("wrote {} frames to {}", args.frames, args.out_dir.display());
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let (cfg, viewport) = resolve_scene(&args.scene)?;
    let tick = simulate_until(
        &cfg,
        viewport,
        args.scene.fps,
        args.scene.theme.into(),
        args.time_ms,
    )?;
    let json = serde_json::to_string_pretty(&tick.frame).context("serialize frame")?;
    println!("{json}");
    Ok(())
}
