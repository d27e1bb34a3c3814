use std::fmt;

/// Everything that can abort a report render.
///
/// Layout arithmetic itself never fails; every variant comes from decoding,
/// re-encoding or serialising data at the edges of the engine.
#[derive(Debug)]
pub enum ReportError {
    /// An image could not be decoded to obtain its pixel dimensions.
    Measurement(String),
    /// A photo could not be re-encoded for embedding.
    Encoding(String),
    /// Final document assembly failed (image embedding, layout JSON).
    Serialization(String),
    /// Malformed report input (JSON shape, data URI).
    InvalidInput(String),
    Io(std::io::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Measurement(message) => write!(f, "measurement failed: {}", message),
            ReportError::Encoding(message) => write!(f, "image encoding failed: {}", message),
            ReportError::Serialization(message) => {
                write!(f, "document serialization failed: {}", message)
            }
            ReportError::InvalidInput(message) => write!(f, "invalid report input: {}", message),
            ReportError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(value: std::io::Error) -> Self {
        ReportError::Io(value)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(value: serde_json::Error) -> Self {
        ReportError::InvalidInput(value.to_string())
    }
}

impl ReportError {
    /// Stable numeric code used by the C API.
    pub fn code(&self) -> i32 {
        match self {
            ReportError::InvalidInput(_) => 2,
            ReportError::Measurement(_) => 3,
            ReportError::Encoding(_) => 4,
            ReportError::Serialization(_) => 5,
            ReportError::Io(_) => 6,
        }
    }
}
