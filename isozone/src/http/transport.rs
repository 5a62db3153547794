use std::time::Duration;

use super::{HttpError, RequestSpec};

/// status and text body of a completed exchange, regardless of status.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// sends a single request with no retry. connection and timeout failures must be
/// reported as [`HttpError::Connection`] and [`HttpError::Timeout`] so they can be
/// retried; any completed exchange is a response, whatever its status.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, HttpError>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<ReqwestTransport, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;
        Ok(ReqwestTransport { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .query(&request.query);
        for (key, value) in request.headers.iter() {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout(e.to_string())
    } else if e.is_connect() {
        HttpError::Connection(e.to_string())
    } else {
        HttpError::Transport(e.to_string())
    }
}

/// replays canned results in order and keeps every request it was sent.
#[cfg(test)]
#[derive(Default)]
pub struct StubTransport {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<HttpResponse, HttpError>>>,
    pub requests: std::sync::Arc<std::sync::Mutex<Vec<RequestSpec>>>,
}

#[cfg(test)]
impl StubTransport {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> StubTransport {
        StubTransport {
            responses: std::sync::Mutex::new(responses.into_iter().collect()),
            requests: Default::default(),
        }
    }

    pub fn sent(requests: &std::sync::Arc<std::sync::Mutex<Vec<RequestSpec>>>) -> Vec<RequestSpec> {
        requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl HttpTransport for StubTransport {
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, HttpError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or_else(|| Err(HttpError::Transport(String::from("no canned response left"))))
    }
}
