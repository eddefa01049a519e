//! Failure screenshot persistence

use std::path::{Path, PathBuf};

use crate::error::StepResult;

/// File name used for a failed scenario's screenshot
pub fn failure_filename(scenario: &str) -> String {
    let name = scenario.trim();
    if name.is_empty() {
        return "FAILED STEP.png".to_string();
    }
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("FAILED STEP -- {}.png", name)
}

/// Write `png` into `dir`, creating the directory tree first if needed
pub fn save_failure_screenshot(dir: &Path, scenario: &str, png: &[u8]) -> StepResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(failure_filename(scenario));
    std::fs::write(&path, png)?;
    Ok(path)
}
