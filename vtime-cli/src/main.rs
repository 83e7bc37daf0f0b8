//! vtime CLI Tool
//!
//! Command-line interface for inspecting the virtual timeline of an annotated
//! recording: durations, time mapping, lanes, cut points and a simulated
//! playback run.

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vtime_core::{
    format_clock, hidden_markers, summarize, LaneLayout, NavigationConfig, Navigator,
    PlaybackSource, PlaybackSync, Segment, SessionPayload, Tag, VirtualTimeline,
};

#[derive(Parser, Debug)]
#[command(name = "vtime")]
#[command(about = "Virtual timeline inspector - hide discardable intervals from playback")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Session JSON file (videoUrl, tags, segments)
    session: PathBuf,

    /// Real duration in seconds (defaults to the session's duration, then
    /// the furthest segment end)
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a sample interview session to a file
    Init {
        /// Output session file path
        output: PathBuf,
    },

    /// Show durations, hidden intervals and a per-tag summary
    Info {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Translate between real and virtual time
    Map {
        #[command(flatten)]
        session: SessionArgs,

        /// Real time to translate to virtual time
        #[arg(long, conflicts_with = "virtual_time", required_unless_present = "virtual_time")]
        real: Option<f64>,

        /// Virtual time to translate to real time
        #[arg(long = "virtual")]
        virtual_time: Option<f64>,
    },

    /// Lay out visible segments into non-overlapping lanes
    Lanes {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// List navigation cut points
    Cuts {
        #[command(flatten)]
        session: SessionArgs,

        /// Show the next/previous cut point from this real time
        #[arg(long)]
        from: Option<f64>,

        /// Skip tolerance in seconds
        #[arg(long, default_value = "0.5")]
        margin: f64,
    },

    /// Simulate playback and report every skipped hidden interval
    Play {
        #[command(flatten)]
        session: SessionArgs,

        /// Simulated tick length in seconds
        #[arg(long, default_value = "0.25")]
        step: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { output } => init_session(output)?,
        Commands::Info { session } => show_info(session)?,
        Commands::Map {
            session,
            real,
            virtual_time,
        } => map_time(session, real, virtual_time)?,
        Commands::Lanes { session } => show_lanes(session)?,
        Commands::Cuts {
            session,
            from,
            margin,
        } => show_cuts(session, from, margin)?,
        Commands::Play { session, step } => simulate_playback(session, step)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// A loaded session with its timeline built
struct Loaded {
    payload: SessionPayload,
    timeline: VirtualTimeline,
}

fn load(args: &SessionArgs) -> Result<Loaded> {
    let payload = SessionPayload::load(&args.session)
        .with_context(|| format!("Failed to load session {}", args.session.display()))?;
    let duration = args.duration.unwrap_or_else(|| payload.effective_duration());
    ensure!(duration.is_finite(), "Duration must be a finite number of seconds");

    tracing::debug!(
        tags = payload.tags.len(),
        segments = payload.segments.len(),
        duration,
        "loaded session"
    );
    let timeline = payload.timeline(duration);
    Ok(Loaded { payload, timeline })
}

fn sample_session() -> SessionPayload {
    let tags = vec![
        Tag::new("t1", "Leadership", "#ff4444", false),
        Tag::new("t2", "Teamwork", "#cddc39", false),
        Tag::new("t3", "Good communication", "#4caf50", false),
        Tag::new("t4", "Discardable", "#424242", true),
    ];
    let segments = vec![
        Segment::new("s1", "t1", 10.0, 30.0),
        Segment::new("s2", "t3", 50.0, 80.0),
        Segment::new("s3", "t2", 20.0, 60.0),
        Segment::new("s4", "t4", 35.0, 45.0),
        Segment::new("s5", "t4", 90.0, 105.0),
    ];
    let mut payload = SessionPayload::new("file:///media/interview.mp4", tags, segments);
    payload.duration = Some(120.0);
    payload
}

fn init_session(output: PathBuf) -> Result<()> {
    sample_session()
        .save(&output)
        .with_context(|| format!("Failed to write session {}", output.display()))?;
    println!("Wrote sample session to {}", output.display());
    Ok(())
}

fn show_info(args: SessionArgs) -> Result<()> {
    let Loaded { payload, timeline } = load(&args)?;

    println!("\n=== Virtual Timeline ===");
    println!("Media: {}", payload.video_url);
    println!(
        "Real duration: {:.2}s ({})",
        timeline.real_duration(),
        format_clock(timeline.real_duration())
    );
    println!(
        "Virtual duration: {:.2}s ({})",
        timeline.virtual_duration(),
        format_clock(timeline.virtual_duration())
    );

    let hidden = timeline.hidden_segments();
    println!("\n=== Hidden intervals ({}) ===", hidden.len());
    for iv in &hidden {
        println!(
            "  {:.2}s - {:.2}s ({:.2}s skipped)",
            iv.start,
            iv.end,
            iv.len()
        );
    }

    let markers = hidden_markers(&timeline, &payload.segments, &payload.tags);
    if !markers.is_empty() {
        println!("\n=== Markers ===");
        for marker in &markers {
            println!(
                "  [{}] {:.1}s skipped at virtual {:.2}s ({:.1}%)",
                marker.segment.id,
                marker.duration_real,
                marker.point_v,
                marker.left_fraction * 100.0
            );
        }
    }

    println!("\n=== Summary ===");
    let summary = summarize(&payload.tags, &payload.segments);
    if summary.is_empty() {
        println!("  No segments recorded yet");
    }
    for group in &summary {
        let hidden_note = if group.tag.is_hidden { " (hidden)" } else { "" };
        println!(
            "  {}{}: {} segments, {:.1}s",
            group.tag.name,
            hidden_note,
            group.segments.len(),
            group.total_real()
        );
        for segment in &group.segments {
            println!(
                "    {} - {}",
                format_clock(segment.start_real),
                format_clock(segment.end_real)
            );
        }
    }

    Ok(())
}

fn map_time(args: SessionArgs, real: Option<f64>, virtual_time: Option<f64>) -> Result<()> {
    let Loaded { timeline, .. } = load(&args)?;

    if let Some(real) = real {
        let snapped = timeline.valid_real_time(real);
        println!("real {:.3}s -> virtual {:.3}s", real, timeline.real_to_virtual(real));
        if snapped != real {
            println!("  (inside a hidden interval, playback resumes at {:.3}s)", snapped);
        }
    }
    if let Some(virtual_time) = virtual_time {
        println!(
            "virtual {:.3}s -> real {:.3}s",
            virtual_time,
            timeline.virtual_to_real(virtual_time)
        );
    }

    Ok(())
}

fn show_lanes(args: SessionArgs) -> Result<()> {
    let Loaded { payload, timeline } = load(&args)?;
    let layout = LaneLayout::build(&timeline, &payload.segments, &payload.tags);

    println!("Lanes: {}", layout.lane_count);
    for laned in &layout.segments {
        let tag_name = payload
            .tags
            .iter()
            .find(|t| t.id == laned.segment.tag_id)
            .map_or("(untagged)", |t| t.name.as_str());
        println!(
            "  lane {} | {:>8.2}s - {:>8.2}s | {} [{}]",
            laned.lane, laned.start_v, laned.end_v, tag_name, laned.segment.id
        );
    }

    Ok(())
}

fn show_cuts(args: SessionArgs, from: Option<f64>, margin: f64) -> Result<()> {
    ensure!(margin >= 0.0, "Margin must not be negative");
    let Loaded { payload, timeline } = load(&args)?;
    let navigator = Navigator::new(
        &timeline,
        &payload.segments,
        &payload.tags,
        NavigationConfig { margin },
    );

    println!("Cut points:");
    for point in navigator.cut_points() {
        println!("  {:.2}s ({})", point, format_clock(*point));
    }

    if let Some(from) = from {
        match navigator.next(from) {
            Some(next) => println!("Next from {:.2}s: {:.2}s", from, next),
            None => println!("Next from {:.2}s: none", from),
        }
        println!("Previous from {:.2}s: {:.2}s", from, navigator.previous(from));
        if let Some(active) =
            timeline.active_visible_segment(&payload.segments, &payload.tags, from)
        {
            println!("Active segment: {} (tag {})", active.id, active.tag_id);
        }
    }

    Ok(())
}

/// Upper bound on ticks for one simulated playback run
const MAX_SIMULATED_TICKS: f64 = 10_000_000.0;

/// Playback source that advances by a fixed step on every tick
struct SimulatedClock {
    now: f64,
}

impl PlaybackSource for SimulatedClock {
    fn current_time(&self) -> f64 {
        self.now
    }

    fn seek(&mut self, real: f64) {
        self.now = real;
    }
}

fn simulate_playback(args: SessionArgs, step: f64) -> Result<()> {
    ensure!(step.is_finite() && step > 0.0, "Step must be a positive number of seconds");
    let Loaded { payload, timeline } = load(&args)?;
    ensure!(
        timeline.real_duration() / step <= MAX_SIMULATED_TICKS,
        "Step {step} is too small for {:.2}s of playback",
        timeline.real_duration()
    );
    let navigator = Navigator::new(
        &timeline,
        &payload.segments,
        &payload.tags,
        NavigationConfig::default(),
    );
    let sync = PlaybackSync::new(&timeline, &navigator);

    println!(
        "Playing {:.2}s of real time ({:.2}s virtual) in {:.2}s steps",
        timeline.real_duration(),
        timeline.virtual_duration(),
        step
    );

    let mut clock = SimulatedClock { now: 0.0 };
    let mut ticks = 0u64;
    let mut skips = 0u64;
    loop {
        let before = clock.current_time();
        let tick = sync.tick(&mut clock);
        ticks += 1;
        if tick.corrected {
            skips += 1;
            println!(
                "  skipped {:.2}s -> {:.2}s (progress {:.1}%)",
                before, tick.real, tick.progress
            );
        }
        if tick.real >= timeline.real_duration() {
            break;
        }
        let next = (tick.real + step).min(timeline.real_duration());
        ensure!(next > tick.real, "Step {step} no longer advances playback at {:.2}s", tick.real);
        clock.now = next;
    }

    println!("Finished after {} ticks, {} hidden intervals skipped", ticks, skips);
    Ok(())
}
