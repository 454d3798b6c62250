use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "karavid", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an extended-LRC file and print a timeline summary.
    Inspect(InspectArgs),
    /// Write the built-in sample lyrics as an extended-LRC file.
    Sample(SampleArgs),
    /// Render a single frame at a given time as a PNG.
    Frame(FrameArgs),
    /// Export the whole timeline as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input extended-LRC file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print the full timeline as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Output LRC path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input extended-LRC file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time in seconds to evaluate the frame at.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Timing offset in milliseconds (negative shows lyrics earlier).
    #[arg(long, default_value_t = -100.0)]
    offset_ms: f64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input extended-LRC file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output width in pixels (must be even).
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Output height in pixels (must be even).
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Timing offset in milliseconds (negative shows lyrics earlier).
    #[arg(long, default_value_t = -100.0)]
    offset_ms: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_timeline(path: &Path) -> anyhow::Result<karavid::Timeline> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read lyrics '{}'", path.display()))?;
    Ok(karavid::lrc::parse(&text))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let timeline = read_timeline(&args.in_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(());
    }

    println!(
        "{} lines, duration {}",
        timeline.lines.len(),
        karavid::lrc::format_timestamp(timeline.duration)
    );
    for line in &timeline.lines {
        println!(
            "  [{}] {} ({} syllables)",
            karavid::lrc::format_timestamp(line.start),
            line.text,
            line.syllables.len()
        );
    }
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let text = karavid::lrc::serialize(&karavid::lrc::sample_timeline());
    std::fs::write(&args.out, text)
        .with_context(|| format!("write sample lyrics '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let timeline = read_timeline(&args.in_path)?;
    let settings = karavid::RenderSettings {
        offset_ms: args.offset_ms,
        ..Default::default()
    };

    let mut surface = karavid::BlockSurface::new(settings.clone())?;
    let scene = karavid::Scene::with_linear_wipe(timeline, settings, &surface)?;
    let frame = {
        use karavid::RenderSurface as _;
        surface.draw(&scene.frame_at(args.time))?
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let timeline = read_timeline(&args.in_path)?;
    let settings = karavid::RenderSettings {
        width: args.width,
        height: args.height,
        fps: args.fps,
        offset_ms: args.offset_ms,
        ..Default::default()
    };

    let mut surface = karavid::BlockSurface::new(settings.clone())?;
    let scene = karavid::Scene::with_linear_wipe(timeline, settings, &surface)?;

    let cfg = karavid::default_mp4_config(&args.out, args.width, args.height, args.fps);
    let mut sink = karavid::FfmpegSink::new(cfg)?;

    let total = karavid::ExportDriver::frame_count(&scene);
    let outcome = karavid::ExportDriver::new().run(
        &scene,
        &mut surface,
        &mut sink,
        &karavid::CancelToken::new(),
        |p| {
            if p.frame == p.total || p.frame % 30 == 0 {
                eprint!("\rframe {}/{} ({:.0}%)", p.frame, total, p.fraction * 100.0);
            }
        },
    )?;
    eprintln!();

    match outcome {
        karavid::ExportOutcome::Completed => eprintln!("wrote {}", args.out.display()),
        karavid::ExportOutcome::Cancelled => eprintln!("export cancelled"),
    }
    Ok(())
}
