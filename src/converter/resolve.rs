//! Pandoc executable resolution.
//!
//! Precedence: explicit constructor argument, then the `PANDOC_PATH`
//! environment variable, then platform-specific fallback candidates
//! (a `pandoc` directory packaged next to the current executable, followed
//! by common install locations). The resolution itself is a pure function
//! over those inputs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const PANDOC_PATH_ENV: &str = "PANDOC_PATH";

/// Resolve the pandoc executable from the three configuration inputs.
///
/// Explicit and environment values are trusted as-is; fallback candidates
/// are only accepted when they exist on disk.
pub fn resolve_executable_path(
    explicit: Option<&Path>,
    env_value: Option<&OsString>,
    fallback_candidates: &[PathBuf],
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(value) = env_value {
        if !value.is_empty() {
            return Some(PathBuf::from(value));
        }
    }

    fallback_candidates
        .iter()
        .find(|candidate| candidate.exists())
        .cloned()
}

/// Platform-specific places a pandoc binary may live when none was
/// configured.
pub fn fallback_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    let exe_name = if cfg!(target_os = "windows") {
        "pandoc.exe"
    } else {
        "pandoc"
    };

    // Packaged-resource directory next to the running executable.
    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(dir) = current_exe.parent() {
            candidates.push(dir.join("pandoc").join(exe_name));
        }
    }

    if cfg!(target_os = "macos") {
        candidates.push(PathBuf::from("/usr/local/bin/pandoc"));
        candidates.push(PathBuf::from("/opt/homebrew/bin/pandoc"));
    } else if cfg!(target_os = "windows") {
        candidates.push(PathBuf::from(r"C:\Program Files\Pandoc\pandoc.exe"));
    } else {
        candidates.push(PathBuf::from("/usr/bin/pandoc"));
        candidates.push(PathBuf::from("/usr/local/bin/pandoc"));
    }

    candidates
}
