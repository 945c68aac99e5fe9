//! Command implementations.

pub mod config;
pub mod nodes;
pub mod run;
pub mod save;

use imgexport_core::Config;
use std::path::{Path, PathBuf};

/// Config file in use: `--config` / `IMGEXPORT_CONFIG`, else the default path.
pub fn config_file(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path)
}

/// Load configuration.
///
/// An explicitly named file must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let config = match explicit {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imgexport.toml");
        std::fs::write(&path, "[output]\npretty = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(config.output.pretty);
        assert_eq!(config_file(Some(&path)), path);
    }
}
