use artwalk_field::{blob_position, blob_strength, SurfaceNetsTriangulator};
use artwalk_input::Key;
use artwalk_render::{DebugTextRenderer, RenderView, Renderer};
use artwalk_scene::SceneConfig;
use artwalk_session::Session;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "artwalk-cli", about = "Headless tool for the art space")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default scene summary
    Info,
    /// Run the session headless and verify the run is reproducible
    Simulate {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Frame delta time in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Hold the forward key for the whole run
        #[arg(long)]
        walk: bool,
        /// Press jump on this frame
        #[arg(long)]
        jump_at: Option<u64>,
        /// Scene configuration JSON; built-in space when omitted
        #[arg(long, conflicts_with = "preset")]
        scene: Option<String>,
        /// Built-in preset: default, multicolor-walled, or sparse-field
        #[arg(long)]
        preset: Option<String>,
    },
    /// Dump blob positions at a point in animation time
    Blobs {
        /// Animation time in seconds
        #[arg(short, long, default_value = "0.0")]
        time: f32,
        /// Number of blobs
        #[arg(short, long, default_value = "10")]
        count: usize,
    },
}

fn preset_config(name: &str) -> anyhow::Result<SceneConfig> {
    match name {
        "default" => Ok(SceneConfig::default()),
        "multicolor-walled" => Ok(SceneConfig::multicolor_walled()),
        "sparse-field" => Ok(SceneConfig::sparse_field()),
        other => anyhow::bail!("unknown preset: {other}"),
    }
}

fn simulate(config: SceneConfig, frames: u64, dt: f32, walk: bool, jump_at: Option<u64>) -> Session {
    let mut session = Session::new(config);
    let mut triangulator = SurfaceNetsTriangulator::new();
    session.pointer_lock_mut().lock();
    if walk {
        session.input_mut().apply(Key::KeyW, true);
    }
    for frame in 0..frames {
        if jump_at == Some(frame) {
            session.input_mut().apply(Key::Space, true);
        }
        session.frame(dt, &mut triangulator);
    }
    session
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("artwalk-cli v{}", env!("CARGO_PKG_VERSION"));
            let config = SceneConfig::default();
            println!(
                "scene: {} models, {} planes",
                config.models.len(),
                config.planes.len()
            );
            println!(
                "field: {} blobs @ resolution {} (strength {:.4})",
                config.field.blob_count,
                config.field.resolution,
                blob_strength(config.field.blob_count)
            );
        }
        Commands::Simulate {
            frames,
            dt,
            walk,
            jump_at,
            scene,
            preset,
        } => {
            let config = match (&scene, &preset) {
                (Some(path), _) => SceneConfig::load(path)?,
                (None, Some(name)) => preset_config(name)?,
                (None, None) => SceneConfig::default(),
            };
            println!("Simulating {frames} frames (dt={dt}, walk={walk})");

            let first = simulate(config.clone(), frames, dt, walk, jump_at);
            let second = simulate(config, frames, dt, walk, jump_at);

            let output = DebugTextRenderer::new().render(&first, &RenderView::default());
            print!("{output}");

            let (h1, h2) = (first.state_hash(), second.state_hash());
            println!("Run 1 hash: {h1:#018x}");
            println!("Run 2 hash: {h2:#018x}");
            println!("Match: {}", if h1 == h2 { "OK" } else { "MISMATCH" });
            if h1 != h2 {
                anyhow::bail!("runs diverged");
            }
        }
        Commands::Blobs { time, count } => {
            println!("Blob positions at t={time} (n={count})");
            let strength = blob_strength(count);
            for i in 0..count {
                let p = blob_position(i, time);
                println!("  [{i:2}] ({:.4}, {:.4}, {:.4}) strength={strength:.4}", p.x, p.y, p.z);
            }
        }
    }

    Ok(())
}
