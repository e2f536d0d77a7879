//! Accounts-file location resolution.
//!
//! The path to the accounts file is an explicit value handed to the loader
//! by the caller; there is no hidden environment-variable convention. When
//! the caller supplies nothing, the platform configuration directory is used
//! (`~/.config/gitacct/accounts` on Linux).

use std::path::PathBuf;

use tracing::debug;

use crate::errors::ConfigError;

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "gitacct";

/// File name of the accounts file inside [`APP_DIR_NAME`].
pub const ACCOUNTS_FILE_NAME: &str = "accounts";

/// Resolve the accounts-file path.
///
/// An explicit path always wins. Otherwise the platform configuration
/// directory is consulted; if it cannot be determined, this fails with
/// [`ConfigError::NoConfigDir`] rather than guessing.
pub fn accounts_file_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "using explicit accounts file path");
        return Ok(path);
    }

    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = base.join(APP_DIR_NAME).join(ACCOUNTS_FILE_NAME);
    debug!(path = %path.display(), "using default accounts file path");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/my-accounts");
        let resolved = accounts_file_path(Some(explicit.clone())).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        // Skip on platforms where no config dir exists (e.g. some CI
        // containers without $HOME).
        if dirs::config_dir().is_none() {
            return;
        }
        let resolved = accounts_file_path(None).unwrap();
        assert!(resolved.ends_with("gitacct/accounts"));
    }
}
