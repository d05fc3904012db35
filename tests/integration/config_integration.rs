//! Integration tests for the Configuration System

use crate::integration::test_utils::with_env;
use dynscope::{ConfigLoader, ContextStack, EngineConfig, ScopeError};
use tempfile::TempDir;

#[test]
fn test_load_without_sources_uses_defaults() {
    with_env(&[], || {
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(
            config.limits.max_scope_depth,
            dynscope::config::DEFAULT_MAX_SCOPE_DEPTH
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.output, "stderr");
    });
}

#[test]
fn test_missing_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    with_env(&[], || {
        let config = ConfigLoader::load(Some(missing.as_path())).unwrap();
        assert!(config.validate().is_ok());
    });
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("dynscope.toml");
    std::fs::write(
        &config_file,
        r#"
[limits]
max_scope_depth = 16

[logging]
level = "warn"
"#,
    )
    .unwrap();

    with_env(
        &[
            ("DYNSCOPE_LIMITS__MAX_SCOPE_DEPTH", "3"),
            ("DYNSCOPE_LOGGING__FORMAT", "json"),
        ],
        || {
            let config = ConfigLoader::load(Some(config_file.as_path())).unwrap();
            assert_eq!(config.limits.max_scope_depth, 3);
            assert_eq!(config.logging.level, "warn");
            assert_eq!(config.logging.format, "json");
        },
    );
}

#[test]
fn test_applied_limits_bound_scope_depth() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("shallow.toml");
    std::fs::write(&config_file, "[limits]\nmax_scope_depth = 1\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    config.apply().unwrap();

    let stack: ContextStack<u32> = ContextStack::new("configured");
    let _guard = stack.enter().unwrap();
    assert!(matches!(
        stack.enter(),
        Err(ScopeError::DepthExceeded { limit: 1, .. })
    ));
}

#[test]
fn test_invalid_config_is_not_applied() {
    let mut config = EngineConfig::default();
    config.logging.level = "chatty".to_string();

    let err = config.apply().unwrap_err();
    assert!(err.to_string().contains("Invalid log level"));
    assert_eq!(
        dynscope::context::limits().max_scope_depth,
        dynscope::config::DEFAULT_MAX_SCOPE_DEPTH
    );
}
