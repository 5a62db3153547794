use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("provider rejected the request with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failure building http client: {0}")]
    ClientBuild(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
