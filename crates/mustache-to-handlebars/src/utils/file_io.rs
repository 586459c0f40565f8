use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read a file to a string
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Write content to a file, creating parent directories if needed
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Read a template with trailing whitespace stripped from every line
pub fn read_template(path: &Path) -> Result<String> {
    Ok(normalize_lines(&read_file(path)?))
}

/// Strip trailing whitespace from every line and join lines with `\n`
pub fn normalize_lines(text: &str) -> String {
    text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}
