use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::lesson::Lesson;

pub fn load(path: &Path) -> Result<Lesson> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid lesson JSON in {}", path.display()))
}

/// Write pretty-printed JSON, creating the parent directory if needed.
pub fn save(path: &Path, lesson: &Lesson) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let mut json = serde_json::to_string_pretty(lesson)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
