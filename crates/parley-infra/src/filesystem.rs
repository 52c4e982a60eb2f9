//! Data directory resolution.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

/// Resolve the data directory.
///
/// Priority: `PARLEY_DATA_DIR`, then `~/.parley`, then `./.parley`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    PathBuf::from(".parley")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is the only one touching this variable and restores it immediately.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-parley");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-parley"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
