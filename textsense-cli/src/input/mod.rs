//! Input handling module

pub mod glob_resolver;

pub use glob_resolver::resolve_patterns;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Pattern that reads standard input
pub const STDIN_MARKER: &str = "-";

/// Where a document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file on disk
    File(PathBuf),
    /// Standard input
    Stdin,
}

impl InputSource {
    /// Name used in reports
    pub fn display_name(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "<stdin>".to_string(),
        }
    }

    /// Read the whole source as UTF-8 text
    pub fn read_text(&self) -> Result<String> {
        match self {
            InputSource::File(path) => read_file(path),
            InputSource::Stdin => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .context("Failed to read standard input")?;
                Ok(content)
            }
        }
    }
}

/// Read a file as UTF-8 text
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Resolve `-i` arguments to sources; `-` means standard input
pub fn resolve_sources(patterns: &[String]) -> Result<Vec<InputSource>> {
    let (stdin, globs): (Vec<&String>, Vec<&String>) =
        patterns.iter().partition(|p| p.as_str() == STDIN_MARKER);

    let mut sources = Vec::new();
    if !stdin.is_empty() {
        sources.push(InputSource::Stdin);
    }
    if !globs.is_empty() {
        let globs: Vec<String> = globs.into_iter().cloned().collect();
        sources.extend(resolve_patterns(&globs)?.into_iter().map(InputSource::File));
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("utf8.txt");
        let content = "Hello 世界! Emoji 🌍 and UTF-8";
        fs::write(&file_path, content).unwrap();

        assert_eq!(read_file(&file_path).unwrap(), content);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_stdin_marker() {
        let sources = resolve_sources(&["-".to_string()]).unwrap();
        assert_eq!(sources, vec![InputSource::Stdin]);
        assert_eq!(sources[0].display_name(), "<stdin>");
    }

    #[test]
    fn test_mixed_sources() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("a.txt");
        fs::write(&file_path, "text").unwrap();

        let sources =
            resolve_sources(&[file_path.display().to_string(), "-".to_string()]).unwrap();
        assert_eq!(sources, vec![InputSource::Stdin, InputSource::File(file_path)]);
    }
}
