use std::path::PathBuf;

/// Errors that can occur across the driftguard workspace.
///
/// Each variant wraps a specific failure domain. Library crates return this
/// type directly; the binary crate surfaces it as a `miette` diagnostic.
///
/// # Examples
///
/// ```
/// use driftguard_core::DriftError;
///
/// let err = DriftError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DriftError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A single completion attempt failed (network, API, or response shape).
    #[error("LLM error: {0}")]
    Llm(String),

    /// Every candidate model in the fallback list failed.
    ///
    /// Fatal: the run cannot produce a verdict. Carries the number of
    /// candidates that were attempted (each exactly once).
    #[error("all {0} candidate models failed")]
    ModelsExhausted(usize),

    /// The completion response was not valid JSON of the expected shape.
    ///
    /// Fatal: no default verdict is ever substituted for a malformed one.
    #[error("verdict parse error: {0}")]
    Parse(String),

    /// GitHub reporting failure. Recoverable at the call site.
    #[error("report error: {0}")]
    Report(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required input file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DriftError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = DriftError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn exhausted_reports_attempt_count() {
        let err = DriftError::ModelsExhausted(3);
        assert_eq!(err.to_string(), "all 3 candidate models failed");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = DriftError::FileNotFound(PathBuf::from("/tmp/missing.rs"));
        assert!(err.to_string().contains("/tmp/missing.rs"));
    }
}
