//! Configuration loading from files and environment overrides.

use std::io::Write;
use tempfile::NamedTempFile;

use sitepilot::domain::models::ProviderId;
use sitepilot::infrastructure::config::ConfigLoader;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file_merges_over_defaults() {
    let file = config_file(
        "providers:\n  deepseek:\n    model: deepseek-chat\nsite:\n  field: veterinary clinics\n  preferred_provider: deepseek\n",
    );

    let config = ConfigLoader::load_from_file(file.path()).unwrap();

    assert_eq!(config.providers.deepseek.model, "deepseek-chat");
    assert_eq!(config.providers.deepseek.api_key_env, "DEEPSEEK_API_KEY");
    assert_eq!(config.site.field, "veterinary clinics");
    assert_eq!(config.site.preferred(), Some(ProviderId::DeepSeek));
    assert_eq!(config.router.invoke_timeout_secs, 90);
}

#[test]
fn test_env_overrides_file() {
    let file = config_file("logging:\n  level: info\nautopilot:\n  batch_size: 2\n");

    temp_env::with_vars(
        [
            ("SITEPILOT_LOGGING__LEVEL", Some("debug")),
            ("SITEPILOT_AUTOPILOT__BATCH_SIZE", Some("5")),
            ("SITEPILOT_SITE__TONE", Some("playful")),
        ],
        || {
            let config = ConfigLoader::load_from_file(file.path()).unwrap();
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.autopilot.batch_size, 5);
            assert_eq!(config.site.tone, "playful");
        },
    );
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let file = config_file("autopilot:\n  batch_size: 0\n");

    temp_env::with_var_unset("SITEPILOT_AUTOPILOT__BATCH_SIZE", || {
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    });
}
