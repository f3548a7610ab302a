use thiserror::Error;

/// Top-level error type for the Parley system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for ParleyError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParleyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ParleyError {
    fn from(err: toml::de::Error) -> Self {
        ParleyError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ParleyError {
    fn from(err: toml::ser::Error) -> Self {
        ParleyError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        ParleyError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Parley operations.
pub type Result<T> = std::result::Result<T, ParleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParleyError::Config("missing page title".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing page title");

        let err = ParleyError::Transcription("no speech detected".to_string());
        assert_eq!(err.to_string(), "Transcription error: no speech detected");

        let err = ParleyError::Stream("connection reset".to_string());
        assert_eq!(err.to_string(), "Stream error: connection reset");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ParleyError = io_err.into();
        assert!(matches!(err, ParleyError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: ParleyError = json_err.into();
        assert!(matches!(err, ParleyError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= nonsense").unwrap_err();
        let err: ParleyError = toml_err.into();
        assert!(matches!(err, ParleyError::Config(_)));
    }

    #[test]
    fn test_error_variants_constructible() {
        let errors: Vec<ParleyError> = vec![
            ParleyError::Config("test".into()),
            ParleyError::Transcription("test".into()),
            ParleyError::Synthesis("test".into()),
            ParleyError::Stream("test".into()),
            ParleyError::Surface("test".into()),
            ParleyError::Serialization("test".into()),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
