use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tilesmith operations
#[derive(Error, Diagnostic, Debug)]
pub enum TileError {
    #[error("IO error: {0}")]
    #[diagnostic(code(tilesmith::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(tilesmith::io))]
    Io { path: PathBuf, message: String },

    #[error("Parse error: {message}")]
    #[diagnostic(code(tilesmith::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(tilesmith::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Missing required source input: {}", format_paths(.paths))]
    #[diagnostic(
        code(tilesmith::missing_source),
        help("Download the source tileset and place it at the listed path(s), or point the manifest at its location")
    )]
    MissingSource { paths: Vec<PathBuf> },

    #[error("Build error: {message}")]
    #[diagnostic(code(tilesmith::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, TileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_lists_every_path() {
        let err = TileError::MissingSource {
            paths: vec![PathBuf::from("art/Wall.png"), PathBuf::from("art/Floor.png")],
        };
        assert_eq!(
            err.to_string(),
            "Missing required source input: art/Wall.png, art/Floor.png"
        );
    }

    #[test]
    fn test_config_error_carries_help() {
        let err = TileError::Config {
            message: "cell size must be non-zero".to_string(),
            help: Some("Set cell_size in tilesmith.yaml".to_string()),
        };
        let help = Diagnostic::help(&err).map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("Set cell_size in tilesmith.yaml"));
    }
}
