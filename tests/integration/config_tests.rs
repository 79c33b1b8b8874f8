//! Configuration loading through the same paths the CLI uses.

use explain_bridge::cli::commands::utils::load_config;
use explain_bridge::config::{config_file, key_file_for};
use explain_bridge::core::config::ExplainConfig;
use explain_bridge::core::constants::paths::CONFIG_DIR_ENV;
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::TempDir;

#[tokio::test]
#[serial]
async fn test_config_dir_override_is_used() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    std::env::set_var(CONFIG_DIR_ENV, dir.path());

    let path = config_file()?;
    assert_eq!(path, dir.path().join("config.toml"));

    let mut config = ExplainConfig::new();
    config.inference.model = "local-model".to_string();
    config.save(&path).await?;

    let (loaded, loaded_from) = load_config(None).await?;
    assert_eq!(loaded_from, path);
    assert_eq!(loaded.inference.model, "local-model");

    std::env::remove_var(CONFIG_DIR_ENV);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_missing_config_falls_back_to_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let explicit = dir.path().join("absent.toml");

    let (loaded, _) = load_config(Some(&explicit)).await?;
    assert_eq!(loaded, ExplainConfig::default());
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_invalid_config_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.toml");
    tokio::fs::write(&path, "[inference]\ntemperature = 9.0\n").await?;

    assert!(load_config(Some(&path)).await.is_err());
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_key_file_next_to_config() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.toml");
    tokio::fs::write(dir.path().join("config.json"), r#"{"api_key": "sk-from-json"}"#).await?;

    let mut config = ExplainConfig::new();
    config.inference.api_key_env = "EXPLAIN_BRIDGE_TEST_UNSET_KEY".to_string();
    std::env::remove_var("EXPLAIN_BRIDGE_TEST_UNSET_KEY");

    let key = config.resolve_api_key(&key_file_for(&path)).await;
    assert_eq!(key.as_deref(), Some("sk-from-json"));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_no_key_anywhere() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut config = ExplainConfig::new();
    config.inference.api_key_env = "EXPLAIN_BRIDGE_TEST_UNSET_KEY".to_string();
    std::env::remove_var("EXPLAIN_BRIDGE_TEST_UNSET_KEY");

    let key = config.resolve_api_key(&dir.path().join("config.json")).await;
    assert_eq!(key, None);
    Ok(())
}
