use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use targeting::TargetingConfig;
use tracing::info;

use super::SandboxError;

pub(crate) fn load_config(path: &Path) -> Result<TargetingConfig, SandboxError> {
    let raw = fs::read_to_string(path).map_err(|source| SandboxError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = TargetingConfig::from_json_str(&raw).map_err(|source| SandboxError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

pub(crate) fn save_config(path: &Path, config: &TargetingConfig) -> Result<(), SandboxError> {
    let text = config
        .to_json_pretty()
        .map_err(|source| SandboxError::Config {
            path: path.to_path_buf(),
            source,
        })?;
    write_text_atomic(path, &format!("{text}\n")).map_err(|source| SandboxError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_default_config(path: &Path) -> Result<(), SandboxError> {
    save_config(path, &TargetingConfig::default())?;
    info!(path = %path.display(), "default_config_written");
    Ok(())
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("targeting.json");
    let tmp_name = format!("{file_name}.tmp");
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}
