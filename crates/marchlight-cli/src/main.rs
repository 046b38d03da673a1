//! Marchlight CLI - Render sphere-traced sketches to PNG

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marchlight_engine::{Engine, RenderConfig, gallery};
use marchlight_render::{CubeFace, CubeMap, FaceImage};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "marchlight")]
#[command(about = "Render signed distance field sketches on the CPU", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in sketches
    List,

    /// Render one frame of a sketch to a PNG file
    Render {
        /// Sketch name (see `marchlight list`)
        #[arg(short, long)]
        sketch: String,

        /// Output image file
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,

        /// Image width (overrides the config)
        #[arg(long)]
        width: Option<u32>,

        /// Image height (overrides the config)
        #[arg(long)]
        height: Option<u32>,

        /// Seconds into the animation loop
        #[arg(short, long, default_value = "0")]
        time: f32,

        /// JSON render config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory with posx.png, negx.png, posy.png, negy.png, posz.png, negz.png
        #[arg(long)]
        env_map: Option<PathBuf>,
    },

    /// Render a whole animation loop as numbered PNG files
    Sequence {
        /// Sketch name (see `marchlight list`)
        #[arg(short, long)]
        sketch: String,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Frames in the loop (overrides the config)
        #[arg(short, long)]
        frames: Option<u32>,

        /// Image width (overrides the config)
        #[arg(long)]
        width: Option<u32>,

        /// Image height (overrides the config)
        #[arg(long)]
        height: Option<u32>,

        /// JSON render config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory with the six cube map faces
        #[arg(long)]
        env_map: Option<PathBuf>,
    },

    /// Write a default render config to start from
    Config {
        /// Output file
        #[arg(short, long, default_value = "marchlight.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for listings
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            run_list();
        }
        Commands::Render {
            sketch,
            output,
            width,
            height,
            time,
            config,
            env_map,
        } => {
            let config = load_config(config.as_deref(), width, height, None)?;
            let engine = build_engine(&sketch, config, env_map.as_deref())?;
            let result = engine.export_png(&output, time)?;
            println!("{result}");
        }
        Commands::Sequence {
            sketch,
            out_dir,
            frames,
            width,
            height,
            config,
            env_map,
        } => {
            let config = load_config(config.as_deref(), width, height, frames)?;
            let engine = build_engine(&sketch, config, env_map.as_deref())?;
            let result = engine.export_sequence(&out_dir)?;
            println!("{result}");
        }
        Commands::Config { output } => {
            RenderConfig::default().save(&output)?;
            println!("Wrote default config to {}", output.display());
        }
    }

    Ok(())
}

fn run_list() {
    let sketches = gallery::all();
    let width = sketches.iter().map(|s| s.name().len()).max().unwrap_or(0);
    for sketch in sketches {
        println!(
            "{:width$}  {:>5.1}s  {}",
            sketch.name(),
            sketch.duration(),
            sketch.description()
        );
    }
}

/// Read the config file if given, then apply command-line overrides
fn load_config(
    path: Option<&Path>,
    width: Option<u32>,
    height: Option<u32>,
    frames: Option<u32>,
) -> Result<RenderConfig> {
    let mut config = match path {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    if let Some(width) = width {
        config.width = width;
    }
    if let Some(height) = height {
        config.height = height;
    }
    if let Some(frames) = frames {
        config.frames = frames;
    }

    config.validate()?;
    Ok(config)
}

fn build_engine(sketch: &str, config: RenderConfig, env_map: Option<&Path>) -> Result<Engine> {
    let mut engine = Engine::from_name(sketch)?.with_config(config);
    if let Some(dir) = env_map {
        let cube_map = load_cube_map(dir)?;
        info!(dir = %dir.display(), face_size = cube_map.face_size(), "loaded environment map");
        engine.set_environment(cube_map);
    }
    Ok(engine)
}

/// Decode the six faces of a cube map from `dir`
fn load_cube_map(dir: &Path) -> Result<CubeMap> {
    let faces = CubeFace::ALL
        .iter()
        .map(|face| {
            let path = dir.join(format!("{}.png", face.file_stem()));
            let image = image::open(&path)
                .with_context(|| format!("Failed to read cube map face {}", path.display()))?
                .to_rgb8();
            let (width, height) = image.dimensions();
            FaceImage::from_rgb8(width, height, image.as_raw())
                .with_context(|| format!("Bad cube map face {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    CubeMap::new(faces).with_context(|| format!("Bad cube map in {}", dir.display()))
}
