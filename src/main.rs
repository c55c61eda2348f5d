use anyhow::{Context, Result};
use bca_wire::{write_damage_files, BcaError, Model, Settings, SimConfig};
use log::info;
use std::process::ExitCode;

/// Environment variable naming a JSON physics configuration file.
const CONFIG_ENV: &str = "BCA_WIRE_CONFIG";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let settings = match Settings::from_args(&args) {
        Ok(settings) => settings,
        Err(err @ BcaError::Usage { .. }) => {
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(1);
        }
    };

    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn load_config() -> Result<SimConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => SimConfig::from_file(&path).with_context(|| {
            format!("loading {} from {}", CONFIG_ENV, path.to_string_lossy())
        }),
        None => Ok(SimConfig::default()),
    }
}

fn run(settings: Settings) -> Result<()> {
    let config = load_config()?;
    let (mut rng, seed) = settings
        .rng()
        .context("seeding the random number generator")?;
    info!("seed {}", seed);

    let basename = settings.basename.clone();
    let extents = settings.extents();
    let labels = settings.species_labels();
    let model = Model::new(settings, config).context("setting up the wire sample")?;
    let summary = model.run(&mut rng)?;

    let paths = write_damage_files(&basename, &summary.maps, extents, &labels)
        .with_context(|| format!("writing damage maps to {}.*", basename))?;
    info!("wrote {} damage maps", paths.len());
    Ok(())
}
