use anyhow::Context;
use skyline_buildings::{TypeRegistry, display_all, place};
use skyline_kernel::config::load_config;
use skyline_kernel::domain::config::AppConfig;
use skyline_logger::Logger;
use std::io;
use tracing::info;

/// Environment variable pointing at an explicit config file.
const CONFIG_PATH_ENV: &str = "SKYLINE_CONFIG";

fn main() -> anyhow::Result<()> {
    let cfg: AppConfig = load_config(std::env::var_os(CONFIG_PATH_ENV))
        .context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)
        .and_then(|builder| builder.init())
        .context("Failed to initialize logging")?;

    let mut registry = TypeRegistry::new();
    let buildings = place(&mut registry, &cfg.town.buildings);

    display_all(&buildings, &mut io::stdout().lock()).context("Failed to write buildings")?;

    let stats = registry.stats();
    info!(
        buildings = buildings.len(),
        types = stats.types,
        hits = stats.hits,
        misses = stats.misses,
        "Town rendered"
    );

    Ok(())
}
