use isozone_core::model::GeometryError;
use thiserror::Error;

use crate::http::HttpError;

#[derive(Error, Debug)]
pub enum IsochroneError {
    #[error("failure reading run configuration: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("request for {request} failed: {source}")]
    Request {
        request: String,
        #[source]
        source: HttpError,
    },
    #[error("{provider} rejected the API key for {request}, check that the key is valid")]
    InvalidApiKey { provider: String, request: String },
    #[error("malformed response for {request}: {message}")]
    MalformedResponse { request: String, message: String },
    #[error("geometry processing failed: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },
    #[error("failure accessing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failure encoding or decoding JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl IsochroneError {
    pub fn io(path: &str, source: std::io::Error) -> IsochroneError {
        IsochroneError::Io {
            path: path.to_string(),
            source,
        }
    }

    pub fn malformed(request: &str, message: impl ToString) -> IsochroneError {
        IsochroneError::MalformedResponse {
            request: request.to_string(),
            message: message.to_string(),
        }
    }
}
