//! Scripted transport for driving sources without a network.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::utils::http::{Params, Transport, endpoint};

type Handler = dyn Fn(&str, &Params) -> Result<String> + Send + Sync;

/// Answers every request through a closure and records what was sent.
pub(crate) struct ScriptedTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<(String, Params)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(
        handler: impl Fn(&str, &Params) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A transport on which every request fails.
    pub(crate) fn offline() -> Self {
        Self::new(|url, _| Err(refused(url)))
    }

    /// Parameters of every request whose URL contains `fragment`.
    pub(crate) fn calls_to(&self, fragment: &str) -> Vec<Params> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url.contains(fragment))
            .map(|(_, params)| params.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, base_url: &str, method: &str, params: &Params) -> Result<String> {
        let url = endpoint(base_url, method);
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), params.clone()));
        (self.handler)(&url, params)
    }
}

/// Value of a form parameter.
pub(crate) fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

pub(crate) fn refused(url: &str) -> AppError {
    AppError::transport(url, "connection refused")
}
