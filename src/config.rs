use anyhow::{Result, anyhow, ensure};
use dotenvy::dotenv;
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::plan::DEFAULT_CHUNK_SIZE_BYTES;

pub const ENV_PREFIX: &str = "RESUMABLE_UPLOAD_";

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    chunk_size: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigEnv {
    chunk_size: Option<u64>,
}

#[derive(Debug)]
pub struct Config {
    pub chunk_size: u64,
}

fn merge_config(base: ConfigFile, override_config: ConfigEnv) -> Result<Config> {
    let chunk_size = override_config
        .chunk_size
        .or(base.chunk_size)
        .unwrap_or(DEFAULT_CHUNK_SIZE_BYTES);

    ensure!(chunk_size > 0, "chunk_size must be greater than zero");

    Ok(Config { chunk_size })
}

pub fn config_file_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("com", "resumable-upload", "resumable-upload")
        .ok_or(anyhow!("Unable to determine home directory"))?;
    Ok(project_dirs.config_dir().join("config.toml"))
}

pub fn read_config() -> Result<Config> {
    let _ = dotenv();
    let env_config = envy::prefixed(ENV_PREFIX)
        .from_env::<ConfigEnv>()
        .unwrap_or_default();

    let file_config = match config_file_path() {
        Ok(path) => match fs::read_to_string(path) {
            Ok(config) => toml::from_str(&config)?,
            Err(_) => ConfigFile::default(),
        },
        Err(_) => ConfigFile::default(),
    };

    merge_config(file_config, env_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_five_mebibytes() {
        let config = merge_config(ConfigFile::default(), ConfigEnv::default()).unwrap();
        assert_eq!(config.chunk_size, 5 * 1024 * 1024);
    }

    #[test]
    fn env_overrides_file() {
        let file: ConfigFile = toml::from_str("chunk_size = 1024").unwrap();
        let config = merge_config(file, ConfigEnv::default()).unwrap();
        assert_eq!(config.chunk_size, 1024);

        let file: ConfigFile = toml::from_str("chunk_size = 1024").unwrap();
        let env = ConfigEnv {
            chunk_size: Some(2048),
        };
        let config = merge_config(file, env).unwrap();
        assert_eq!(config.chunk_size, 2048);
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let env = ConfigEnv {
            chunk_size: Some(0),
        };
        assert!(merge_config(ConfigFile::default(), env).is_err());
    }
}
