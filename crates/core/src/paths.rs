use std::path::{Path, PathBuf};

pub fn get_root_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("vidbrief")
}

/// Get the path of the preference file inside a config directory
pub fn get_store_path(config_dir: &Path) -> PathBuf {
    config_dir.join("preferences.json")
}

pub fn get_default_store_path() -> PathBuf {
    get_store_path(&get_root_config_dir())
}
