// Loading packing configurations from JSON files

use crate::domain::packing::PackingConfig;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read `{ binWidth, binHeight, items, reward, penalty }` from `path`.
///
/// Only the JSON shape is checked here; value checks happen in
/// [`PackingConfig::validate`].
pub fn load_config(path: impl AsRef<Path>) -> Result<PackingConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("binpack-{}-{}.json", name, std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_reference_instance() {
        let json = serde_json::to_string(&PackingConfig::default()).unwrap();
        let path = write_temp("reference", &json);
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config, PackingConfig::default());
    }

    #[test]
    fn reports_missing_file_and_bad_json() {
        let missing = std::env::temp_dir().join("binpack-does-not-exist.json");
        assert!(matches!(load_config(&missing), Err(ConfigError::Io { .. })));

        let path = write_temp("broken", "{ \"binWidth\": 4 ");
        let result = load_config(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
