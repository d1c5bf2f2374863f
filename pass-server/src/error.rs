use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use pass_core::pipeline::PipelineError;
use serde_json::json;
use std::fmt::{Display, Formatter};

use crate::util::REQUEST_ID_HEADER;

/// Errors that the pass API can reply with.
///
/// These can be turned into an [`HttpResponse`].
#[derive(Debug)]
pub enum Error {
    Pipeline {
        request_id: String,
        source: PipelineError,
    },
    Prometheus(prometheus::Error),
    BadRequest(String),
    Unexpected,
}

impl Error {
    /// Whether the caller should fix the request, or the service is at fault.
    fn kind(&self) -> &'static str {
        match self {
            Error::Pipeline { source, .. } if source.source.is_client_error() => "request",
            Error::BadRequest(_) => "request",
            _ => "service",
        }
    }
}

/// Errors that can occur during setup/running of the service.
pub enum PassServerError {
    /// Error during setup, e.g., loading credentials.
    Setup(String),

    /// IO error.
    StdIO(std::io::Error),

    /// Malformed configuration file.
    Config(toml::de::Error),

    /// Generating a pass from the command line failed.
    Generate(PipelineError),
}

impl From<std::io::Error> for PassServerError {
    fn from(e: std::io::Error) -> Self {
        PassServerError::StdIO(e)
    }
}

impl From<toml::de::Error> for PassServerError {
    fn from(e: toml::de::Error) -> Self {
        PassServerError::Config(e)
    }
}

impl std::fmt::Debug for PassServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PassServerError::Setup(s) => write!(f, "error during setup: {s}"),
            PassServerError::StdIO(e) => write!(f, "IO error: {e}"),
            PassServerError::Config(e) => write!(f, "invalid configuration: {e}"),
            PassServerError::Generate(e) => write!(f, "could not generate pass: {e}"),
        }
    }
}

/// Show the error as an HTTP response for Actix-web.
impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        let (request_id, stage) = match self {
            Error::Pipeline { request_id, source } => {
                (Some(request_id.as_str()), Some(source.stage.as_str()))
            }
            _ => (None, None),
        };

        let body = json!({
            "error": true,
            "kind": self.kind(),
            "stage": stage,
            "request_id": request_id,
            "message": format!("{}", self),
        });

        let mut resp = HttpResponse::build(self.status_code());
        if let Some(id) = request_id {
            resp.insert_header((REQUEST_ID_HEADER, id));
        }

        resp.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Pipeline { source, .. } if source.source.is_client_error() => {
                StatusCode::BAD_REQUEST
            }
            Error::Pipeline { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Prometheus(_) | Error::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Error::Pipeline { source, .. } => write!(f, "{source}"),
            Error::Prometheus(e) => write!(f, "prometheus error: {e}"),
            Error::BadRequest(s) => write!(f, "malformed request: {s}"),
            Error::Unexpected => write!(f, "unexpected"),
        }
    }
}
