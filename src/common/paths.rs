use directories::ProjectDirs;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "facereg.toml";

/// Per-user config location, e.g. `~/.config/facereg/facereg.toml` on Linux.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "facereg", "facereg")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_FILE))
}
