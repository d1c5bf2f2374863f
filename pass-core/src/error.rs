//! Pass pipeline errors.

/// A pass pipeline error.
#[derive(Debug)]
pub enum Error {
    /// The request is malformed or misses a mandatory field.
    Validation(String),
    /// A required brand asset was not found in the asset store.
    NotFound {
        /// The brand key the asset was looked up under.
        brand: String,
        /// The asset filename.
        file: String,
    },
    /// The credentials or the signing primitive failed.
    Signing(String),
    /// The zip writer failed.
    Archive(zip::result::ZipError),
    /// IO error while reading assets or credentials.
    Io(std::io::Error),
    /// Serde JSON error.
    Json(serde_json::Error),
    /// A file could not be placed in the working set.
    Layout(String),
    /// The pass configuration is inconsistent.
    Config(String),
}

impl Error {
    /// Whether the error is the caller's fault rather than the service's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(s) => write!(f, "invalid request: {s}"),
            Self::NotFound { brand, file } => {
                write!(f, "required asset {file} not found for brand {brand}")
            }
            Self::Signing(s) => write!(f, "signing error: {s}"),
            Self::Archive(e) => write!(f, "archive error: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Layout(s) => write!(f, "working set layout violation: {s}"),
            Self::Config(s) => write!(f, "invalid configuration: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Archive(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive(e)
    }
}

impl From<openssl::error::ErrorStack> for Error {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::Signing(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
