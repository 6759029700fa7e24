//! A scripted [`Transport`] for tests: it hands out canned responses in order and records every call it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::error::TransportError;
use super::transport::{RawResponse, Transport};
use super::value::{Struct, Value};

pub struct StubTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    calls: CallLog,
}

/// Shared record of the calls a [`StubTransport`] has seen.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(String, Struct)>>>);

impl CallLog {
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn methods(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Arguments of the `i`-th call.
    pub fn args(&self, i: usize) -> Struct {
        self.0.lock().unwrap()[i].1.clone()
    }
}

impl StubTransport {
    pub fn new(responses: Vec<RawResponse>) -> (Self, CallLog) {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<RawResponse, TransportError>>) -> (Self, CallLog) {
        let calls = CallLog::default();
        let stub = Self {
            responses: Mutex::new(results.into()),
            calls: calls.clone(),
        };
        (stub, calls)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn call(&self, method: &str, args: Struct) -> Result<RawResponse, TransportError> {
        self.calls.0.lock().unwrap().push((method.to_string(), args));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected call to {method}"))
    }
}

pub fn strukt(pairs: Vec<(&str, Value)>) -> Struct {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

pub fn success(data: Struct) -> RawResponse {
    RawResponse {
        code: 1000,
        message: "Command completed successfully".into(),
        reason: String::new(),
        reason_code: String::new(),
        data,
    }
}

pub fn failure(code: i64, message: &str) -> RawResponse {
    RawResponse {
        code,
        message: message.into(),
        reason: String::new(),
        reason_code: String::new(),
        data: Struct::new(),
    }
}
