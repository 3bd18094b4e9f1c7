use bl_config::BlConfig;
use bl_core::enums::{ClauseMode, OverflowPolicy};
use figment::Jail;

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".batchline")?;
        jail.create_file(
            ".batchline/config.toml",
            r#"
[engine]
clause_mode = "first_only"
operation_timeout_ms = 1000
"#,
        )?;
        jail.set_env("BATCHLINE_ENGINE__CLAUSE_MODE", "all");

        let config = BlConfig::load().expect("config loads");
        // Env wins over TOML
        assert_eq!(config.engine.clause_mode, ClauseMode::All);
        // TOML value not overridden by env remains
        assert_eq!(config.engine.operation_timeout_ms, 1000);
        Ok(())
    });
}

#[test]
fn env_var_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("BATCHLINE_LIFECYCLE__METADATA_OVERFLOW", "block");
        jail.set_env("BATCHLINE_GENERAL__TRAIL_DIR", "trail");
        jail.set_env("BATCHLINE_INGEST__UPLOADED_BY", "env-user");

        let config = BlConfig::load().expect("config loads");
        assert_eq!(config.lifecycle.metadata_overflow, OverflowPolicy::Block);
        assert_eq!(config.general.trail_dir, "trail");
        assert_eq!(config.ingest.uploaded_by, "env-user");
        Ok(())
    });
}

#[test]
fn zero_timeout_from_env_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("BATCHLINE_ENGINE__OPERATION_TIMEOUT_MS", "0");
        assert!(BlConfig::load().is_err());
        Ok(())
    });
}

/// Typo'd env keys are silently ignored by figment.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("BATCHLINE_GENERAL__DEFAULT_PROJECTT", "P999");
        let config = BlConfig::load().expect("config loads");
        assert_eq!(config.general.default_project, "P001");
        Ok(())
    });
}
