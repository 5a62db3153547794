use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    retry, HttpError, HttpTransport, ReqwestTransport, RequestSpec, RetryPolicy, Sleeper,
    ThreadSleeper,
};

/// outbound http settings shared by every provider.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HttpConfig {
    #[serde(default = "HttpConfig::default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "HttpConfig::default_user_agent")]
    pub user_agent: String,
    /// statuses treated as "no isochrone here" instead of an error
    #[serde(default = "HttpConfig::default_empty_result_statuses")]
    pub empty_result_statuses: Vec<u16>,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: Self::default_timeout_seconds(),
            user_agent: Self::default_user_agent(),
            empty_result_statuses: Self::default_empty_result_statuses(),
            retry: RetryPolicy::default(),
        }
    }
}

impl HttpConfig {
    fn default_timeout_seconds() -> u64 {
        60
    }

    fn default_user_agent() -> String {
        format!("isozone/{}", env!("CARGO_PKG_VERSION"))
    }

    fn default_empty_result_statuses() -> Vec<u16> {
        vec![404]
    }
}

/// outcome of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderResponse {
    Body(String),
    /// the provider answered with one of the configured empty-result statuses
    Empty { status: u16 },
}

/// wraps a transport with the retry policy. non-2xx statuses that are not empty
/// results become [`HttpError::Status`], which is only retried when the policy lists it.
pub struct RetryingHttpClient {
    transport: Box<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    empty_result_statuses: Vec<u16>,
}

impl RetryingHttpClient {
    pub fn new(
        transport: Box<dyn HttpTransport>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
        empty_result_statuses: Vec<u16>,
    ) -> RetryingHttpClient {
        RetryingHttpClient {
            transport,
            sleeper,
            policy,
            empty_result_statuses,
        }
    }

    /// builds a client over reqwest that sleeps on the calling thread.
    pub fn from_config(config: &HttpConfig) -> Result<RetryingHttpClient, HttpError> {
        let transport = ReqwestTransport::new(config.timeout_seconds, &config.user_agent)?;
        Ok(RetryingHttpClient::new(
            Box::new(transport),
            Arc::new(ThreadSleeper),
            config.retry.clone(),
            config.empty_result_statuses.clone(),
        ))
    }

    pub fn execute(&self, request: &RequestSpec) -> Result<ProviderResponse, HttpError> {
        retry(
            &self.policy,
            self.sleeper.as_ref(),
            &request.label,
            |attempt| {
                log::debug!(
                    "{} {} ({}), attempt {}",
                    request.method,
                    request.url,
                    request.label,
                    attempt + 1
                );
                let response = self.transport.send(request)?;
                if response.is_success() {
                    Ok(ProviderResponse::Body(response.body))
                } else if self.empty_result_statuses.contains(&response.status) {
                    log::warn!(
                        "{}: provider returned status {}, treating as an empty result",
                        request.label,
                        response.status
                    );
                    Ok(ProviderResponse::Empty {
                        status: response.status,
                    })
                } else {
                    Err(HttpError::Status {
                        status: response.status,
                        body: response.body,
                    })
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, RecordingSleeper, RetryCondition, StubTransport};

    fn client(
        responses: Vec<Result<HttpResponse, HttpError>>,
        sleeper: Arc<RecordingSleeper>,
    ) -> RetryingHttpClient {
        RetryingHttpClient::new(
            Box::new(StubTransport::new(responses)),
            sleeper,
            RetryPolicy {
                min_wait_seconds: 1.0,
                wait_multiplier: 2.0,
                max_retries: 2,
                retry_on: vec![RetryCondition::Connection, RetryCondition::Timeout],
            },
            vec![404],
        )
    }

    fn request() -> RequestSpec {
        RequestSpec::get("http://localhost/isochrone", String::from("point 0 at cost 5"))
    }

    #[test]
    fn test_retries_connection_errors_then_returns_body() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client(
            vec![
                Err(HttpError::Connection(String::from("refused"))),
                Ok(HttpResponse::new(200, "{}")),
            ],
            sleeper.clone(),
        );
        let response = client.execute(&request()).expect("second attempt succeeds");
        assert_eq!(response, ProviderResponse::Body(String::from("{}")));
        assert_eq!(sleeper.durations().len(), 1);
    }

    #[test]
    fn test_empty_result_status() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client(vec![Ok(HttpResponse::new(404, "not found"))], sleeper);
        let response = client.execute(&request()).expect("404 is an empty result");
        assert_eq!(response, ProviderResponse::Empty { status: 404 });
    }

    #[test]
    fn test_rejected_status_is_not_retried() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client(
            vec![
                Ok(HttpResponse::new(400, "bad point")),
                Ok(HttpResponse::new(200, "{}")),
            ],
            sleeper.clone(),
        );
        let result = client.execute(&request());
        assert!(matches!(result, Err(HttpError::Status { status: 400, .. })));
        assert!(sleeper.durations().is_empty());
    }

    #[test]
    fn test_transient_errors_surface_after_budget() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client(
            vec![
                Err(HttpError::Timeout(String::from("1"))),
                Err(HttpError::Timeout(String::from("2"))),
                Err(HttpError::Timeout(String::from("3"))),
            ],
            sleeper.clone(),
        );
        let result = client.execute(&request());
        assert!(matches!(result, Err(HttpError::Timeout(ref m)) if m == "3"));
        assert_eq!(
            sleeper.durations(),
            vec![
                std::time::Duration::from_secs(1),
                std::time::Duration::from_secs(2)
            ]
        );
    }
}
