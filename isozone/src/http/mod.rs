mod http_error;
mod rate_limiter;
mod request_spec;
mod retry_policy;
mod retrying_http_client;
mod sleeper;
mod transport;

pub use http_error::HttpError;
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use request_spec::RequestSpec;
pub use retry_policy::{retry, RetryCondition, RetryPolicy};
pub use retrying_http_client::{HttpConfig, ProviderResponse, RetryingHttpClient};
pub use sleeper::{Sleeper, ThreadSleeper};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

#[cfg(test)]
pub use sleeper::RecordingSleeper;
#[cfg(test)]
pub use transport::StubTransport;
