use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollfx::{
    ChannelInputs, InputEvent, MotionConfig, MotionHost, TransformComposer, TransformDescriptor,
    Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "scrollfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep scroll progress from 0 to 1 and print one transform per step.
    Sample(SampleArgs),
    /// Replay a recorded input trace through the frame scheduler.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Motion config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels; a non-positive height samples the no-geometry fallback.
    #[arg(long, default_value_t = 800.0, allow_negative_numbers = true)]
    height: f64,

    /// Number of progress steps (inclusive of both ends).
    #[arg(long, default_value_t = 11)]
    steps: u32,

    /// Print CSS strings instead of raw channels.
    #[arg(long)]
    css: bool,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Motion config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Trace JSON: an array of `{ "at": secs, "event": {...} }`.
    #[arg(long)]
    trace: PathBuf,

    /// Frame rate of the simulated host clock.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Extra time to keep ticking after the last event, in seconds.
    #[arg(long, default_value_t = 1.0)]
    tail: f64,
}

#[derive(Debug, serde::Deserialize)]
struct TraceEntry {
    at: f64,
    event: InputEvent,
}

#[derive(serde::Serialize)]
struct SampleLine<'a> {
    progress: Option<f64>,
    #[serde(flatten)]
    transform: &'a TransformDescriptor,
}

#[derive(serde::Serialize)]
struct FrameLine<'a> {
    time: f64,
    element: u64,
    #[serde(flatten)]
    transform: &'a TransformDescriptor,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Sample(args) => cmd_sample(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<MotionConfig> {
    MotionConfig::from_path(path).with_context(|| format!("load config '{}'", path.display()))
}

fn read_trace(path: &Path) -> anyhow::Result<Vec<TraceEntry>> {
    let f = File::open(path).with_context(|| format!("open trace '{}'", path.display()))?;
    let mut entries: Vec<TraceEntry> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse trace JSON")?;
    entries.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(entries)
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps >= 2, "--steps must be >= 2");
    let config = read_config(&args.config)?.normalized();
    let mut composer = TransformComposer::new(&config)?;
    let viewport = Viewport {
        width: args.width,
        height: args.height,
    };
    if !viewport.is_valid() {
        tracing::warn!(?viewport, "unusable viewport, sampling without geometry");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for i in 0..args.steps {
        let progress = viewport
            .is_valid()
            .then(|| f64::from(i) / f64::from(args.steps - 1));
        let transform = composer.compose(ChannelInputs {
            progress,
            viewport_width: progress.map(|_| viewport.width),
            tilt: None,
        });
        let line = if args.css {
            serde_json::to_string(&transform.to_css())?
        } else {
            serde_json::to_string(&SampleLine {
                progress,
                transform: &transform,
            })?
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be a positive number"
    );
    let config = read_config(&args.config)?;
    let trace = read_trace(&args.trace)?;

    let mut host = MotionHost::new();
    let handle = host.mount(&config)?;
    let frame_dt = 1.0 / args.fps;
    let end = trace.last().map_or(0.0, |e| e.at) + args.tail.max(0.0);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut lines: Vec<String> = Vec::new();
    let mut next_event = 0;
    let mut frame_idx = 0u64;
    loop {
        let now = frame_idx as f64 * frame_dt;
        if now > end + f64::EPSILON {
            break;
        }
        while let Some(entry) = trace.get(next_event).filter(|e| e.at <= now) {
            // Traces are recorded against a single element; retarget to the mounted one.
            let event = match entry.event {
                InputEvent::Intersection { rect, viewport, .. } => InputEvent::Intersection {
                    element: handle.id(),
                    rect,
                    viewport,
                },
                other => other,
            };
            host.dispatch(entry.at, event);
            next_event += 1;
        }

        let mut sink = |id: scrollfx::ElementId, t: &TransformDescriptor| {
            let line = FrameLine {
                time: now,
                element: id.0,
                transform: t,
            };
            match serde_json::to_string(&line) {
                Ok(s) => lines.push(s),
                Err(err) => tracing::warn!(%err, "failed to encode frame"),
            }
        };
        host.frame(now, &mut sink);
        for line in lines.drain(..) {
            writeln!(out, "{line}")?;
        }
        frame_idx += 1;
    }

    host.unmount(handle);
    tracing::debug!(frames = frame_idx, "replay finished");
    Ok(())
}
