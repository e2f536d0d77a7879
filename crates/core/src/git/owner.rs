//! GitHub remote URL owner extraction.
//!
//! Recognizes exactly the two remote shapes the tool is documented to
//! support, parsed with explicit string handling rather than patterns:
//!
//! - `https://<host>/<owner>/<repo>[.git]`
//! - `git@<host>:<owner>/<repo>[.git]` (scp-like)
//!
//! The host must contain the literal substring `github.com`
//! (case-sensitive). SSH host aliases in the `github.com-<account>` form,
//! the standard multi-account `~/.ssh/config` pattern, satisfy that check
//! and are therefore tolerated. Anything else yields `None`.
//!
//! Known limitation: the substring match is deliberately narrow, not a
//! general URL parser. It also accepts hosts like `github.company.com`
//! whose name merely starts with `github.com`.

/// The host marker a remote must carry to be considered a GitHub remote.
const GITHUB_HOST_MARKER: &str = "github.com";

/// Extract the owner (account or organization) segment from a remote URL.
///
/// Returns `None` when the URL matches neither recognized shape or does not
/// point at a GitHub host. A trailing `.git` suffix is stripped from the
/// extracted segment.
pub fn extract_owner(remote_url: &str) -> Option<String> {
    let url = remote_url.trim();
    extract_owner_https(url).or_else(|| extract_owner_scp(url))
}

/// `https://<host>/<owner>/...` form.
fn extract_owner_https(url: &str) -> Option<String> {
    let rest = url.strip_prefix("https://")?;
    let (host, path) = rest.split_once('/')?;
    if !host.contains(GITHUB_HOST_MARKER) {
        return None;
    }
    owner_from_path(path)
}

/// `git@<host>:<owner>/...` scp-like form.
fn extract_owner_scp(url: &str) -> Option<String> {
    let rest = url.strip_prefix("git@")?;
    let (host, path) = rest.split_once(':')?;
    if !host.contains(GITHUB_HOST_MARKER) {
        return None;
    }
    owner_from_path(path)
}

/// First path segment, with a trailing `.git` stripped.
fn owner_from_path(path: &str) -> Option<String> {
    let owner = path.split('/').next().unwrap_or("");
    let owner = owner.strip_suffix(".git").unwrap_or(owner);
    if owner.is_empty() {
        None
    } else {
        Some(owner.to_string())
    }
}
