use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use lexis_config::Config;

/// Picked up from the working directory when no file is given
const DEFAULT_CONFIG_FILE: &str = "lexis.json";

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Explicit file, else `lexis.json` if present, else defaults.
/// `LEXIS_*` variables are applied on top in every case.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            load_config_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Config::default(),
    };

    config.apply_env();
    Ok(config)
}
