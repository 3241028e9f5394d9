use anyhow::Context;
use lens_config::LensConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, the layered config, and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<LensConfig> {
    let mut config = LensConfig::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, flags)?;
    Ok(config)
}

fn apply_overrides(config: &mut LensConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(engine) = flags.engine {
        config.engine.mode = engine.into();
        config
            .engine
            .validate()
            .context("invalid engine override")?;
    }
    if let Some(limit) = flags.limit {
        anyhow::ensure!(limit >= 1, "--limit must be at least 1");
        config.history.limit = limit;
    }
    Ok(())
}
