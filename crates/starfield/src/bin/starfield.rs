//! # STARFIELD Command Line
//!
//! ```bash
//! # Generate the classic galaxy with a fixed seed
//! starfield generate --config presets/galaxy.toml --seed 42 --out out/galaxy
//!
//! # A million-point shader galaxy, with an interleaved vertex buffer
//! starfield generate --config presets/shader_galaxy.toml --count 1000000 --interleaved
//!
//! # Print a preset to start a new config from
//! starfield preset shader > my_galaxy.toml
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use starfield::{logging, write_field, StarfieldConfig};
use starfield_procedural::{entropy_rng, FieldSeed, GalaxyVariant};

#[derive(Parser)]
#[command(name = "starfield")]
#[command(about = "Procedural galaxies as point buffers")]
struct Cli {
    /// Debug logging for the starfield crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a field and write its buffers
    Generate {
        /// Configuration file
        #[arg(short, long, default_value = "presets/galaxy.toml")]
        config: PathBuf,
        /// Override the point count
        #[arg(long)]
        count: Option<u32>,
        /// Override the seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the variant
        #[arg(long)]
        variant: Option<VariantArg>,
        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
        /// Also write an interleaved vertex buffer
        #[arg(long)]
        interleaved: bool,
    },

    /// Print a preset configuration as TOML
    Preset {
        /// Which preset
        #[arg(value_enum)]
        name: PresetArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Spin,
    Shader,
}

impl From<VariantArg> for GalaxyVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Spin => Self::Spin,
            VariantArg::Shader => Self::Shader,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Classic,
    Shader,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Commands::Generate {
            config,
            count,
            seed,
            variant,
            out,
            interleaved,
        } => generate(&config, count, seed, variant, &out, interleaved),
        Commands::Preset { name } => preset(name),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn generate(
    config_path: &Path,
    count: Option<u32>,
    seed: Option<u64>,
    variant: Option<VariantArg>,
    out: &Path,
    interleaved: bool,
) -> Result<(), Box<dyn Error>> {
    let mut config = StarfieldConfig::from_path(config_path)?;
    if let Some(count) = count {
        config.galaxy.count = count;
    }
    if let Some(seed) = seed {
        config.generator.seed = Some(FieldSeed::new(seed));
    }
    if let Some(variant) = variant {
        config.generator.variant = variant.into();
    }

    let generator = config.generator()?;
    let started = Instant::now();
    let mut rng = config.generator.seed.map_or_else(entropy_rng, FieldSeed::rng);
    let field = generator.generate(&mut rng);
    let elapsed = started.elapsed();

    let written = write_field(&field, out, interleaved)?;

    let bounds = field.bounds();
    tracing::info!(
        variant = generator.variant().name(),
        points = field.len(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        min = ?bounds.map(|b| b.min),
        max = ?bounds.map(|b| b.max),
        point_size = config.style.effective_size(),
        "field generated"
    );
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn preset(name: PresetArg) -> Result<(), Box<dyn Error>> {
    let config = match name {
        PresetArg::Classic => StarfieldConfig::classic(),
        PresetArg::Shader => StarfieldConfig::shader(),
    };
    print!("{}", config.to_toml_string()?);
    Ok(())
}
