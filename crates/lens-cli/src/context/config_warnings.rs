use lens_config::LensConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &LensConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &LensConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.turso.is_configured() && has_env_prefix(&env_keys, "TRUTHLENS_TURSO") {
        warnings.push(
            "Turso config appears default while TRUTHLENS_TURSO* env vars exist. Use double underscores (example: TRUTHLENS_TURSO__URL)."
                .to_string(),
        );
    }

    if has_env_prefix(&env_keys, "TRUTHLENS_ENGINE_")
        && !has_env_prefix(&env_keys, "TRUTHLENS_ENGINE__")
    {
        warnings.push(
            "TRUTHLENS_ENGINE_* env vars are ignored. Use double underscores (example: TRUTHLENS_ENGINE__MODE)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
