use std::path::{Path, PathBuf};

/// Returns the default data directory: `<platform data dir>/mnist-collect/`
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mnist-collect")
}

/// Returns the store directory: `<data_dir>/store/`
pub fn store_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("store")
}

/// Returns the exports directory: `<data_dir>/exports/`
pub fn exports_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("exports")
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories(data_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(store_dir(data_dir))?;
    std::fs::create_dir_all(exports_dir(data_dir))?;
    Ok(())
}
