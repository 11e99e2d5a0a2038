//! Path utilities for kubetools.
//!
//! Settings live under `~/.kubetools/`:
//! - `~/.kubetools/kubetools.toml` - settings file

use std::path::PathBuf;

/// Returns the kubetools home directory (`~/.kubetools/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kubetools")
}

/// Returns the default settings file path (`~/.kubetools/kubetools.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("kubetools.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_live_under_kubetools_home() {
        let config = default_config();
        assert!(config.starts_with(home_dir()));
        assert!(config.to_string_lossy().ends_with("kubetools.toml"));
    }
}
