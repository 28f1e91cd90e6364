use crate::clock::{Clock, DateTime, Utc};
use crate::config::Config;
use crate::http::{ApiRequest, HTTPError, HTTPResult, Transport};
use crate::reddit::Reddit;
use serde_json::Value;
use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> Value {
    let data = fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data");
    serde_json::from_str(&data).expect("test data is not valid JSON")
}

pub fn test_config() -> Config {
    Config::builder()
        .client_id("test-client-id")
        .client_secret("test-client-secret")
        .user_agent("test-client-please-ignore")
        .build()
        .expect("test config is valid")
}

pub fn test_reddit(transport: TestTransport) -> Reddit<TestTransport> {
    Reddit::with_transport(test_config(), transport).expect("test client is valid")
}

/// Replays canned responses in order and records every request it is sent.
#[derive(Debug, Default)]
pub struct TestTransport {
    responses: Mutex<VecDeque<HTTPResult<Value>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl TestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, err: HTTPError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for TestTransport {
    async fn request(&self, request: &ApiRequest) -> HTTPResult<Value> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no test response left for {} {}", request.method, request.path))
    }
}

pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
