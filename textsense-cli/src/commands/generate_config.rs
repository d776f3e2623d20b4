//! Generate config command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists; pass --force to overwrite",
                self.output.display()
            );
        }

        let template = CliConfig::template()?;
        std::fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Edit requirements, output and selector settings");
        println!("2. Validate your configuration:");
        println!("   textsense validate -c {}", self.output.display());
        println!("3. Use it for analysis:");
        println!("   textsense analyze -i input.txt -c {}", self.output.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_execute_writes_loadable_template() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("textsense.toml");

        let args = GenerateConfigArgs {
            output: output.clone(),
            force: false,
        };
        args.execute().unwrap();

        let config = CliConfig::from_file(&output).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("existing.toml");
        std::fs::write(&output, "keep me").unwrap();

        let args = GenerateConfigArgs {
            output: output.clone(),
            force: false,
        };
        assert!(args.execute().is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");

        let forced = GenerateConfigArgs {
            output: output.clone(),
            force: true,
        };
        forced.execute().unwrap();
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .starts_with("# textsense configuration"));
    }
}
