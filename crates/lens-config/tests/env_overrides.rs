use figment::Jail;
use lens_config::{ConfigError, EngineMode, LensConfig};
use pretty_assertions::assert_eq;

#[test]
fn env_vars_override_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("TRUTHLENS_TURSO__URL", "libsql://from-env.turso.io");
        jail.set_env("TRUTHLENS_TURSO__AUTH_TOKEN", "env-token");
        jail.set_env("TRUTHLENS_ENGINE__MODE", "heuristic");
        jail.set_env("TRUTHLENS_HISTORY__LIMIT", "7");

        let config = LensConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.turso.url, "libsql://from-env.turso.io");
        assert!(config.turso.is_configured());
        assert_eq!(config.engine.mode, EngineMode::Heuristic);
        assert_eq!(config.history.limit, 7);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".truthlens"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".truthlens/config.toml",
            r#"
[engine]
stub_delay_ms = 100
"#,
        )?;
        jail.set_env("TRUTHLENS_ENGINE__STUB_DELAY_MS", "50");

        let config = LensConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.engine.stub_delay_ms, 50);
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_reported() {
    Jail::expect_with(|jail| {
        jail.set_env("TRUTHLENS_ENGINE__THRESHOLD", "1.5");

        let result = LensConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}

#[test]
fn remote_mode_without_url_is_not_configured() {
    Jail::expect_with(|jail| {
        jail.set_env("TRUTHLENS_ENGINE__MODE", "remote");

        let result = LensConfig::load();
        assert!(matches!(result, Err(ConfigError::NotConfigured { .. })));
        Ok(())
    });
}
