//! Cache location resolution.
//!
//! The store and the logs live in a per-user cache directory:
//! `$XDG_CACHE_HOME/histrank`, else `$HOME/.cache/histrank`. Resolution is a
//! pure function of the looked-up variables so it can be tested without
//! touching the process environment.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

const APP_DIR: &str = "histrank";
const STORE_FILE: &str = "commands.txt";

/// Resolve the cache directory from the values of `XDG_CACHE_HOME` and `HOME`.
pub fn resolve_cache_dir(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(xdg) = non_empty(xdg_cache_home) {
        return xdg.join(APP_DIR);
    }
    match non_empty(home) {
        Some(home) => home.join(".cache").join(APP_DIR),
        None => PathBuf::from(format!(".{APP_DIR}")),
    }
}

/// Cache directory for the current user.
pub fn cache_dir() -> PathBuf {
    resolve_cache_dir(std::env::var_os("XDG_CACHE_HOME"), std::env::var_os("HOME"))
}

/// Default location of the command store.
pub fn default_store_path() -> PathBuf {
    cache_dir().join(STORE_FILE)
}

/// Directory for log files.
pub fn log_dir() -> PathBuf {
    cache_dir().join("logs")
}

/// Create `dir` (and its parents) if missing, readable by the owner only.
pub fn ensure_private_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .with_context(|| format!("Failed to create cache directory: {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_xdg_cache_home() {
        let dir = resolve_cache_dir(Some("/tmp/xdg".into()), Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/tmp/xdg/histrank"));
    }

    #[test]
    fn test_falls_back_to_home() {
        let dir = resolve_cache_dir(None, Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/home/me/.cache/histrank"));

        // An empty XDG value counts as unset
        let dir = resolve_cache_dir(Some(OsString::new()), Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/home/me/.cache/histrank"));
    }

    #[test]
    fn test_without_any_variable() {
        assert_eq!(resolve_cache_dir(None, None), PathBuf::from(".histrank"));
    }

    #[test]
    fn test_ensure_private_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        ensure_private_dir(&dir).unwrap();
        assert!(dir.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&dir).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }

        // Existing directories are fine
        ensure_private_dir(&dir).unwrap();
    }
}
