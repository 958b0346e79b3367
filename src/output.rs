//! Default output locations for the paste-HTML workflow.

use chrono::Local;
use std::path::PathBuf;

/// `<desktop-or-home>/<label>_<YYYYMMDD_HHMMSS>.docx`. The desktop is
/// preferred; a home directory without one falls back to home itself, then
/// to the current directory.
pub fn default_output_path(label: &str) -> PathBuf {
    let dir = dirs::desktop_dir()
        .filter(|path| path.exists())
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{label}_{timestamp}.docx"))
}
