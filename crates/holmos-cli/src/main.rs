//! holmos CLI - writes the cage part catalogue as `.scad` files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use holmos_parts::generate::CATALOGUE;
use holmos_parts::{generate_all, GeneratorConfig, MountKind};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "holmos")]
#[command(about = "Parametric 3D-printable parts for the HolMOS cage", long_about = None)]
struct Cli {
    /// TOML settings file (missing keys use defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory, overrides `output_dir` from the config
    #[arg(short, long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every part (default)
    Generate {
        /// Write parts in their mounted orientation
        #[arg(long)]
        assemble: bool,
        /// Also write each part's IR document as JSON
        #[arg(long)]
        ir: bool,
        /// Build for the threaded-rod cage
        #[arg(long)]
        threads: bool,
    },
    /// List the parts and where they would be written
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.out_dir {
        config.output_dir = dir;
    }

    match cli.command {
        Some(Commands::Generate {
            assemble,
            ir,
            threads,
        }) => {
            config.assemble |= assemble;
            config.write_ir |= ir;
            if threads {
                config.cage.mount = MountKind::Threads20;
            }
            generate(&config)?;
        }
        Some(Commands::List) => {
            for (kind, name) in CATALOGUE {
                let path = config.output_dir.join(name);
                println!("{:<20} {}", format!("{kind:?}"), path.display());
            }
        }
        None => generate(&config)?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn generate(config: &GeneratorConfig) -> Result<()> {
    let written = generate_all(config).with_context(|| {
        format!("failed to write parts to {}", config.output_dir.display())
    })?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
