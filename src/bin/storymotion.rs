use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use storymotion::{AudioEngine, RigLibrary, Scene, SpeechEvents, TimeMs, Timeline};

#[derive(Parser, Debug)]
#[command(name = "storymotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample a scene's pose/camera/audio state at a time and print JSON.
    Pose(PoseArgs),
    /// Render the scene's procedural audio bed to a raw f32le stereo file.
    Mix(MixArgs),
}

#[derive(Parser, Debug)]
struct PoseArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Sample time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,
}

#[derive(Parser, Debug)]
struct MixArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output raw f32le file (44.1 kHz stereo interleaved).
    #[arg(long)]
    out: PathBuf,
}

fn load_timeline(in_path: &PathBuf) -> anyhow::Result<Timeline> {
    let json = std::fs::read_to_string(in_path)
        .with_context(|| format!("failed to read scene '{}'", in_path.display()))?;
    let scene: Scene = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse scene '{}'", in_path.display()))?;
    let library = RigLibrary::builtin().context("failed to build rig library")?;
    let mut timeline = Timeline::new(library, AudioEngine::without_speech());
    timeline
        .load_scene(scene)
        .context("failed to load scene")?;
    Ok(timeline)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Pose(args) => {
            let timeline = load_timeline(&args.in_path)?;
            let sample = timeline
                .sample(TimeMs(args.at_ms))
                .context("failed to sample scene")?;
            println!("{}", serde_json::to_string_pretty(&sample)?);
        }
        Command::Mix(args) => {
            let mut timeline = load_timeline(&args.in_path)?;
            timeline.play(SpeechEvents::default()).context("failed to start playback")?;
            let duration = timeline
                .duration()
                .context("no duration for loaded scene")?;
            // Advance in render-tick steps so SFX cues fire on schedule.
            let mut remaining = duration.0;
            while remaining > 0.0 {
                let step = remaining.min(33.0);
                timeline.advance(step);
                remaining -= step;
            }
            let mix = timeline
                .audio()
                .render_range(0.0, duration.as_secs())
                .context("failed to mix scene audio")?;
            storymotion::write_mix_f32le(&mix, &args.out)
                .context("failed to write mix file")?;
            eprintln!(
                "wrote {} samples ({:.2}s) to {}",
                mix.len(),
                duration.as_secs(),
                args.out.display()
            );
        }
    }
    Ok(())
}
