//! In-process transport double for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CrmError, Result};
use crate::transport::{ApiRequest, Transport};

/// Records every request and answers from a queue of canned responses.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn fail(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Err(CrmError::Api {
            status,
            body: body.to_string(),
        }));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CrmError::InvalidResponse("no canned response".to_string())))
    }
}
