use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use techno_loop::config::json_diagnostic;
use techno_loop::dsp::renderer::write_wav;
use techno_loop::{DEFAULT_OUTPUT_PATH, LoopConfig, LoopError, render_loop};

/// Generate a seamless procedural techno loop as a 16-bit mono WAV.
#[derive(Parser, Debug)]
#[command(name = "techno-loop", version, about)]
struct Args {
    /// Output WAV path.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// JSON file overriding the default loop settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the hi-hat noise, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => LoopConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("invalid loop configuration")?;

    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    println!("[bgm] Generating procedural techno loop at {} BPM...", config.bpm);
    let rendered = render_loop(&config)?;
    println!(
        "[bgm] Generated {:.1}s loop ({} beats, {} samples)",
        rendered.duration_seconds(),
        rendered.total_beats,
        rendered.samples.len()
    );

    println!("[bgm] Writing WAV to: {}", args.output.display());
    write_wav(&args.output, &rendered.samples, rendered.sample_rate)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("[bgm] Done. The loop should be seamless and safe to play in-game.");

    Ok(())
}

fn load_config(path: &Path) -> Result<LoopConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    match LoopConfig::from_json_str(&source) {
        Ok(config) => Ok(config),
        Err(LoopError::Json(err)) => {
            eprintln!("{}", json_diagnostic(&path.display().to_string(), &source, &err));
            bail!("could not parse config {}", path.display())
        }
        Err(err) => Err(err).with_context(|| format!("loading config {}", path.display())),
    }
}
