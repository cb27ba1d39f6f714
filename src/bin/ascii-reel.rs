use std::{
    io::Write as _,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use ascii_reel::{
    bundle, transform, FileProvider, FrameDataProvider, FrameSequence, ManualTickSource, Orientation, Player,
    PlayerConfig, TransformConfig,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ascii-reel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten a directory of frame_NNNN.txt files into a frames JSON array.
    Bundle(BundleArgs),
    /// Print one frame, optionally in the rotated narrow orientation.
    Preview(PreviewArgs),
    /// Play the animation in the terminal.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct BundleArgs {
    /// Directory holding the per-frame text files.
    dir: PathBuf,

    /// Output JSON path.
    #[arg(long, default_value = "frames.json")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct OrientationArgs {
    /// Use the rotated narrow-viewport frames.
    #[arg(long)]
    narrow: bool,

    /// Row budget for narrow frames.
    #[arg(long, default_value_t = transform::NARROW_TARGET_ROWS)]
    rows: usize,

    /// Rotate and trim narrow frames without downsampling.
    #[arg(long)]
    no_downsample: bool,
}

impl OrientationArgs {
    fn orientation(&self) -> Orientation {
        if self.narrow {
            Orientation::Narrow
        } else {
            Orientation::Wide
        }
    }

    fn transform(&self) -> TransformConfig {
        if self.no_downsample {
            TransformConfig::rotate_only()
        } else {
            TransformConfig::with_target_rows(self.rows)
        }
    }
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Frames JSON file.
    frames: PathBuf,

    /// Frame index (0-based, wraps).
    #[arg(long, default_value_t = 0)]
    frame: usize,

    #[command(flatten)]
    orientation: OrientationArgs,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Frames JSON file.
    frames: PathBuf,

    /// Logical frames per second.
    #[arg(long, default_value_t = 10.0)]
    fps: f64,

    /// Stop after this many seconds.
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Tick rate of the polling loop, standing in for display refresh.
    #[arg(long, default_value_t = 60.0)]
    refresh_hz: f64,

    #[command(flatten)]
    orientation: OrientationArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Bundle(args) => run_bundle(args),
        Command::Preview(args) => run_preview(args),
        Command::Play(args) => run_play(args),
    }
}

fn read_frames(path: &std::path::Path) -> anyhow::Result<FrameSequence> {
    let path_str = path.to_str().context("frames path is not valid UTF-8")?;
    pollster::block_on(FileProvider.fetch_frames(path_str))
        .with_context(|| format!("load frames from {}", path.display()))
}

fn run_bundle(args: BundleArgs) -> anyhow::Result<()> {
    let bundle = bundle::bundle_directory(&args.dir)
        .with_context(|| format!("bundle frames from {}", args.dir.display()))?;
    let bytes = bundle
        .write_json(&args.out)
        .with_context(|| format!("write {}", args.out.display()))?;

    println!("frames processed: {}", bundle.report.processed);
    println!("errors: {}", bundle.report.errors);
    println!("output file: {}", args.out.display());
    println!("file size: {:.2} KB", bytes as f64 / 1024.0);
    Ok(())
}

fn run_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let frames = read_frames(&args.frames)?;
    let frame = match args.orientation.orientation() {
        Orientation::Wide => frames.get_wrapped(args.frame).cloned(),
        Orientation::Narrow => frames
            .get_wrapped(args.frame)
            .map(|f| transform::transform_frame(f, &args.orientation.transform())),
    }
    .context("frame sequence is empty")?;

    println!("{}", frame.to_text());
    Ok(())
}

fn run_play(args: PlayArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps.is_finite() && args.fps > 0.0, "--fps must be positive");
    anyhow::ensure!(args.refresh_hz.is_finite() && args.refresh_hz > 0.0, "--refresh-hz must be positive");

    let frames = read_frames(&args.frames)?;
    let config = PlayerConfig {
        base_fps: args.fps,
        narrow: args.orientation.transform(),
        ..PlayerConfig::default()
    };
    config.validate()?;

    let mut player = Player::new(frames, &config, ManualTickSource::default());
    let orientation = args.orientation.orientation();
    let mut out = std::io::stdout().lock();
    if let Some(first) = player.show(orientation) {
        write!(out, "\x1b[2J\x1b[H{}", first.to_text())?;
        out.flush()?;
    }

    let refresh = Duration::from_secs_f64(1.0 / args.refresh_hz);
    let started = Instant::now();
    while started.elapsed().as_secs_f64() < args.seconds {
        thread::sleep(refresh);
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let Some(frame) = player.on_tick(now_ms) {
            write!(out, "\x1b[2J\x1b[H{}", frame.to_text())?;
            out.flush()?;
        }
    }
    player.pause_all();
    writeln!(out)?;
    Ok(())
}
