//! Command-line argument parsing
//!
//! Supports:
//! - Highlighting a SevenMark file (or stdin) through an external parser
//! - Highlighting an already serialized parse tree (`--tree`)
//! - Decorations, editor inline decorations or folding ranges as output

use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::HighlightConfig;

/// Highlight SevenMark markup
#[derive(Parser, Debug)]
#[command(
    name = "sevenmark-highlight",
    version,
    about = "Map SevenMark documents to editor decorations"
)]
pub struct CliArgs {
    /// Input file, `-` for stdin
    #[arg(value_name = "FILE", required_unless_present = "write_config")]
    pub file: Option<PathBuf>,

    /// FILE already contains a serialized parse tree
    #[arg(long)]
    pub tree: bool,

    /// Parser program (overrides `parser` in config.yaml)
    #[arg(long, value_name = "PROGRAM")]
    pub parser: Option<String>,

    /// What to print
    #[arg(long, value_enum, default_value_t = OutputFormat::Decorations)]
    pub format: OutputFormat,

    /// How long to wait for the parser to initialize
    #[arg(long, value_name = "N")]
    pub timeout_ms: Option<u64>,

    /// Save the effective configuration to config.yaml
    #[arg(long)]
    pub write_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{range, className, hoverMessage}` list
    #[default]
    Decorations,
    /// `{range, options: {inlineClassName, hoverMessage}}` list
    Inline,
    /// Folding ranges
    Folds,
}

impl CliArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply_to(&self, config: &mut HighlightConfig) {
        if let Some(parser) = &self.parser {
            config.parser = Some(parser.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.init_timeout_ms = timeout_ms;
        }
    }

    /// Read the input document; `None` when no FILE was given
    pub fn read_input(&self) -> std::io::Result<Option<String>> {
        match self.file.as_deref() {
            None => Ok(None),
            Some(path) if path == Path::new("-") => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(Some(text))
            }
            Some(path) => std::fs::read_to_string(path).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["sevenmark-highlight", "doc.sm"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("doc.sm")));
        assert_eq!(args.format, OutputFormat::Decorations);
        assert!(!args.tree);
    }

    #[test]
    fn test_file_required_unless_writing_config() {
        assert!(CliArgs::try_parse_from(["sevenmark-highlight"]).is_err());
        let args = CliArgs::try_parse_from(["sevenmark-highlight", "--write-config"]).unwrap();
        assert!(args.file.is_none());
    }

    #[test]
    fn test_format_values() {
        let args =
            CliArgs::try_parse_from(["sevenmark-highlight", "--format", "folds", "-"]).unwrap();
        assert_eq!(args.format, OutputFormat::Folds);
        assert!(
            CliArgs::try_parse_from(["sevenmark-highlight", "--format", "html", "-"]).is_err()
        );
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = CliArgs::try_parse_from([
            "sevenmark-highlight",
            "--parser",
            "/opt/sevenmark/parse",
            "--timeout-ms",
            "250",
            "doc.sm",
        ])
        .unwrap();
        let mut config = HighlightConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.parser.as_deref(), Some("/opt/sevenmark/parse"));
        assert_eq!(config.init_timeout_ms, 250);
    }
}
