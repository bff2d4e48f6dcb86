use thiserror::Error;

/// Top-level error type for the Veritas core.
///
/// The matcher is total and never produces one of these; errors only come
/// from configuration handling and record construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VeritasError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid analysis record: {0}")]
    InvalidRecord(String),
}

impl From<toml::de::Error> for VeritasError {
    fn from(err: toml::de::Error) -> Self {
        VeritasError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VeritasError {
    fn from(err: toml::ser::Error) -> Self {
        VeritasError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VeritasError {
    fn from(err: serde_json::Error) -> Self {
        VeritasError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Veritas core operations.
pub type Result<T> = std::result::Result<T, VeritasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VeritasError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_invalid_record_display() {
        let err = VeritasError::InvalidRecord("score 120 out of range".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid analysis record: score 120 out of range"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VeritasError = io_err.into();
        assert!(matches!(err, VeritasError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: VeritasError = err.unwrap_err().into();
        assert!(matches!(err, VeritasError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: VeritasError = err.unwrap_err().into();
        assert!(matches!(err, VeritasError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
