//! Local repository operations via `git2`.
//!
//! Thin wrapper for the two things the tool needs from a repository: the
//! URL of a remote (to extract the owner from) and write access to the
//! repository-local `user.name` / `user.email` configuration.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{debug, info};

use crate::errors::GitError;

/// High-level handle on a local Git repository.
pub struct LocalRepo {
    repo: Repository,
    repo_path: PathBuf,
}

impl LocalRepo {
    /// Open the repository containing `path`, searching parent directories
    /// the way `git` itself does.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GitError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening git repository");
        let repo = Repository::discover(path)
            .map_err(|_| GitError::RepositoryNotFound(path.display().to_string()))?;
        let repo_path = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Ok(Self { repo, repo_path })
    }

    /// The repository's working directory (or `.git` directory when bare).
    pub fn path(&self) -> &Path {
        &self.repo_path
    }

    /// The configured URL of a named remote.
    pub fn remote_url(&self, name: &str) -> Result<String, GitError> {
        let remote = self
            .repo
            .find_remote(name)
            .map_err(|_| GitError::RemoteNotFound(name.to_string()))?;
        remote
            .url()
            .map(str::to_string)
            .ok_or_else(|| GitError::RemoteNotFound(name.to_string()))
    }

    /// Write `user.name` / `user.email` into the repository-local config.
    /// `None` fields are skipped, leaving whatever was configured before.
    pub fn apply_identity(
        &self,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), GitError> {
        let mut config = self.repo.config()?;
        if let Some(name) = name {
            config.set_str("user.name", name)?;
            info!(name, "set repository user.name");
        }
        if let Some(email) = email {
            config.set_str("user.email", email)?;
            info!(email, "set repository user.email");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo_with_remote(url: &str) -> (tempfile::TempDir, LocalRepo) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", url).unwrap();
        let local = LocalRepo::open(dir.path()).unwrap();
        (dir, local)
    }

    #[test]
    fn test_open_non_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalRepo::open(dir.path());
        assert!(matches!(result, Err(GitError::RepositoryNotFound(_))));
    }

    #[test]
    fn test_remote_url() {
        let (_dir, local) = init_repo_with_remote("https://github.com/acme/widgets.git");
        assert_eq!(
            local.remote_url("origin").unwrap(),
            "https://github.com/acme/widgets.git"
        );
        assert!(matches!(
            local.remote_url("upstream"),
            Err(GitError::RemoteNotFound(_))
        ));
    }

    #[test]
    fn test_apply_identity_writes_local_config() {
        let (_dir, local) = init_repo_with_remote("git@github.com-work:acme/widgets.git");
        local
            .apply_identity(Some("Jane Doe"), Some("jane@corp.example.com"))
            .unwrap();

        let config = local.repo.config().unwrap().snapshot().unwrap();
        assert_eq!(config.get_str("user.name").unwrap(), "Jane Doe");
        assert_eq!(
            config.get_str("user.email").unwrap(),
            "jane@corp.example.com"
        );
    }

    #[test]
    fn test_apply_identity_skips_none_fields() {
        let (_dir, local) = init_repo_with_remote("https://github.com/acme/widgets.git");
        local.apply_identity(Some("Only Name"), None).unwrap();

        let config = local.repo.config().unwrap().snapshot().unwrap();
        assert_eq!(config.get_str("user.name").unwrap(), "Only Name");
    }
}
