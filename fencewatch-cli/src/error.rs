//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the terminal with exit code 1.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fence description was not valid JSON.
    #[error("invalid fence file: {0}")]
    FenceFormat(#[from] serde_json::Error),

    /// The fence ring was rejected by the engine.
    #[error("invalid fence geometry: {0}")]
    Geometry(#[from] fencewatch::GeometryError),

    /// A fix line in the replay input could not be parsed.
    #[error("invalid fix on line {line}: {message}")]
    FixFormat { line: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_format_message() {
        let err = CliError::FixFormat {
            line: 7,
            message: "missing latitude".into(),
        };
        assert_eq!(
            format!("{}", err),
            "invalid fix on line 7: missing latitude"
        );
    }
}
