//! File pattern resolution using glob

use crate::error::CliError;
use anyhow::Result;
use glob::glob;
use std::path::PathBuf;

/// Resolve file patterns to existing files, sorted and deduplicated
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob(pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))?;
        for path in paths {
            match path {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(err) => log::warn!("Skipping unreadable path: {err}"),
            }
        }
    }

    if files.is_empty() {
        return Err(CliError::NoInputFiles(patterns.to_vec()).into());
    }

    files.sort();
    files.dedup();
    log::debug!("Resolved {} input files", files.len());
    Ok(files)
}
