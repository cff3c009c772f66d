use thiserror::Error;

/// Failures while talking to an imagery service or decoding what it returned.
#[derive(Error, Debug)]
pub enum ImageryError {
    #[error("imagery service unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("imagery service returned status {0}")]
    Status(u16),
    #[error("no imagery available for {0}")]
    EmptyResult(String),
    #[error("image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
    #[error("malformed imagery record: {0}")]
    MalformedRecord(String),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for ImageryError {
    fn from(err: serde_json::Error) -> Self {
        ImageryError::MalformedRecord(err.to_string())
    }
}

/// Copyable classification of an [`ImageryError`], kept on results that
/// degraded to placeholder data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    EmptyResult,
    Decode,
}

impl ImageryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ImageryError::Network(_) | ImageryError::Status(_) | ImageryError::InvalidUrl(_) => {
                FailureKind::Network
            }
            ImageryError::EmptyResult(_) => FailureKind::EmptyResult,
            ImageryError::Decode(_) | ImageryError::MalformedRecord(_) => FailureKind::Decode,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::EmptyResult => write!(f, "empty result"),
            FailureKind::Decode => write!(f, "decode"),
        }
    }
}

/// Convenience type for `Result<T, ImageryError>`.
pub type ImageryResult<T> = Result<T, ImageryError>;
