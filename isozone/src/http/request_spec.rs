use reqwest::Method;
use serde_json::Value;

/// everything needed to issue one provider call. the label names the point(s) and cost
/// value(s) of the request and is carried into log lines and errors.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub label: String,
}

impl RequestSpec {
    pub fn get(url: &str, label: String) -> RequestSpec {
        RequestSpec {
            method: Method::GET,
            url: url.to_string(),
            query: vec![],
            headers: vec![],
            body: None,
            label,
        }
    }

    pub fn post(url: &str, label: String, body: Value) -> RequestSpec {
        RequestSpec {
            method: Method::POST,
            url: url.to_string(),
            query: vec![],
            headers: vec![],
            body: Some(body),
            label,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> RequestSpec {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> RequestSpec {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// first query value for a key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
