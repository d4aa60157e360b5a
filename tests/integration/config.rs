//! Configuration loading through `COMPILEJSX_CONFIG`.
//!
//! These tests mutate the process environment, so they run serially.

use anyhow::Result;
use serial_test::serial;
use std::path::Path;
use tera_jsx::config::{CONFIG_ENV_VAR, JsxConfig};
use tera_jsx::test_utils::{TemplateTree, init_test_logging};

fn set_config_env(path: &Path) {
    // SAFETY: every test touching the variable is #[serial].
    unsafe { std::env::set_var(CONFIG_ENV_VAR, path) };
}

fn clear_config_env() {
    // SAFETY: every test touching the variable is #[serial].
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
}

#[tokio::test]
#[serial]
async fn test_load_from_env_var() -> Result<()> {
    init_test_logging(None);

    let tree = TemplateTree::new()?;
    let path = tree.write(
        "conf/jsx.toml",
        "template_dirs = [\"templates\", \"/abs/templates\"]\nstring_if_invalid = \"INVALID %s\"\n",
    )?;

    set_config_env(&path);
    let loaded = JsxConfig::load().await;
    clear_config_env();

    let config = loaded?;
    assert_eq!(
        config.template_dirs,
        vec![tree.path().join("conf/templates"), Path::new("/abs/templates").to_path_buf()]
    );
    assert_eq!(config.projection().string_if_invalid(), "INVALID %s");
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_env_var_naming_missing_file_is_error() -> Result<()> {
    let tree = TemplateTree::new()?;

    set_config_env(&tree.path().join("absent.toml"));
    let loaded = JsxConfig::load().await;
    clear_config_env();

    let err = loaded.unwrap_err();
    assert!(err.to_string().contains(CONFIG_ENV_VAR));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_unknown_keys_are_rejected() -> Result<()> {
    let tree = TemplateTree::new()?;
    let path = tree.write("jsx.toml", "template_directories = [\"x\"]\n")?;

    set_config_env(&path);
    let loaded = JsxConfig::load().await;
    clear_config_env();

    assert!(loaded.is_err());
    Ok(())
}
