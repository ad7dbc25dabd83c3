//! Path expansion for string properties that name files.

use std::env;
use std::path::PathBuf;

/// Turns a path as written in a catalog into a filesystem path.
pub trait PathExpander {
    fn expand(&self, path: &str) -> PathBuf;
}

/// Expands a leading `~` to the user's home directory.
///
/// The home directory comes from `HOME`, falling back to `USERPROFILE`. When
/// neither is set, or the path does not start with `~`, it is returned as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeDirExpander;

impl PathExpander for HomeDirExpander {
    fn expand(&self, path: &str) -> PathBuf {
        expand_home(path, home_dir())
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

fn expand_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home;
    }
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}
