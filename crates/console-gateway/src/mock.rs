//! Scripted gateway test double.
//!
//! Consumers of [`ApiGateway`](crate::ApiGateway) script responses per
//! `(method, path)` and assert on the recorded calls afterwards. Responses
//! queue FIFO per route, so a route can answer differently on repeat calls.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{ApiGateway, GatewayError, HttpMethod};

/// One scripted outcome.
enum Scripted {
    Ok(Value),
    Api {
        status: u16,
        code: String,
        message: Option<String>,
    },
    Connection(String),
}

/// A recorded gateway invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Gateway fake with per-route scripted responses.
#[derive(Default)]
pub struct ScriptedGateway {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn route_key(method: HttpMethod, path: &str) -> String {
    format!("{method} {path}")
}

impl ScriptedGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: HttpMethod, path: &str, outcome: Scripted) {
        self.responses
            .lock()
            .entry(route_key(method, path))
            .or_default()
            .push_back(outcome);
    }

    /// Script a success payload for a route.
    pub fn ok(&self, method: HttpMethod, path: &str, payload: Value) {
        self.push(method, path, Scripted::Ok(payload));
    }

    /// Script a structured API failure for a route.
    pub fn fail_api(&self, method: HttpMethod, path: &str, status: u16, code: &str) {
        self.push(
            method,
            path,
            Scripted::Api {
                status,
                code: code.to_string(),
                message: None,
            },
        );
    }

    /// Script a transport-level failure for a route.
    pub fn fail_connection(&self, method: HttpMethod, path: &str) {
        self.push(
            method,
            path,
            Scripted::Connection("scripted connection failure".into()),
        );
    }

    /// Every call made through this gateway, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Paths called, in order (convenient for sequence assertions).
    #[must_use]
    pub fn called_paths(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.path.clone()).collect()
    }
}

#[async_trait]
impl ApiGateway for ScriptedGateway {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        self.calls.lock().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });

        let outcome = self
            .responses
            .lock()
            .get_mut(&route_key(method, path))
            .and_then(VecDeque::pop_front);

        match outcome {
            Some(Scripted::Ok(payload)) => Ok(payload),
            Some(Scripted::Api {
                status,
                code,
                message,
            }) => Err(GatewayError::Api {
                status,
                code,
                message,
            }),
            Some(Scripted::Connection(detail)) => Err(GatewayError::Connection(detail)),
            None => Err(GatewayError::Connection(format!(
                "no scripted response for {} {path}",
                method
            ))),
        }
    }
}
