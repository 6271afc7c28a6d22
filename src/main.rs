use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, error, info};

use cosmic_sphere::cosmos::{self, CosmosError, DrawCommand, RecordingSurface, SceneConfig};

#[derive(Parser, Debug)]
#[command(name = "cosmic-sphere", version, about = "Draws glowing chord spheres")]
struct Args {
    /// TOML scene description; built-in defaults are used when omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Fix the random seed so frames repeat exactly
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Render a single frame to this image file instead of opening a window
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log every primitive of one frame at debug level
    #[arg(long)]
    trace: bool,

    /// Print the effective scene as TOML and exit
    #[arg(long)]
    print_scene: bool,
}

fn load_config(args: &Args) -> Result<SceneConfig, CosmosError> {
    let mut config = match &args.scene {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn trace_frame(config: &SceneConfig) -> Result<(), CosmosError> {
    let scene = config.build_scene()?;
    let mut surface = RecordingSurface::new();
    let mut rng = cosmos::seeded_rng(config.seed);
    scene.draw(&mut surface, &mut rng).unwrap_or_else(|never| match never {});

    for command in surface.commands() {
        match command {
            DrawCommand::Circle { .. } | DrawCommand::Line(_) => debug!("{:?}", command),
            _ => {}
        }
    }
    info!(
        "traced {} circles and {} lines",
        surface.circles().len(),
        surface.lines().len()
    );
    Ok(())
}

fn snapshot(config: &SceneConfig, output: &Path) -> Result<(), CosmosError> {
    let scene = config.build_scene()?;
    let mut rng = cosmos::seeded_rng(config.seed);
    let canvas = scene.snapshot(config.width, config.height, &mut rng);
    canvas.save(output)?;
    info!("wrote {}x{} frame to {}", canvas.width(), canvas.height(), output.display());
    Ok(())
}

fn try_main(args: Args) -> Result<(), CosmosError> {
    let config = load_config(&args)?;

    if args.print_scene {
        let text = toml::to_string_pretty(&config).map_err(|e| CosmosError::ConfigParse(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }
    if args.trace {
        trace_frame(&config)?;
    }
    match &args.output {
        Some(output) => snapshot(&config, output),
        None => pollster::block_on(cosmos::run(config)),
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = try_main(Args::parse()) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
