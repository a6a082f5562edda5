pub mod call;
pub mod calls;
pub mod render;
pub mod transcript;
pub mod users;
pub mod validate;

use anyhow::Result;
use serde::Serialize;

use crate::api::Transport;
use crate::output::format::OutputMode;
use crate::output::json::to_json;

/// Between sections when several calls or transcripts are rendered together.
pub(crate) const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Pick the projection for the current output mode.
pub(crate) fn emit<T: Serialize>(mode: OutputMode, value: &T, markdown: impl FnOnce(&T) -> String) -> String {
    match mode {
        OutputMode::Json => to_json(value),
        OutputMode::Markdown => markdown(value),
    }
}

/// POST a typed request body.
pub(crate) fn post_json<B: Serialize>(
    transport: &dyn Transport,
    path: &str,
    body: &B,
) -> Result<serde_json::Value> {
    let body = serde_json::to_value(body)?;
    Ok(transport.post(path, &body)?)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned transport for command tests.

    use std::cell::RefCell;
    use std::collections::HashMap;

    use serde_json::Value;

    use crate::api::client::ApiError;
    use crate::api::Transport;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Request {
        Get(String, Vec<(String, String)>),
        Post(String, Value),
    }

    /// Answers each path with a fixed payload and records every request.
    #[derive(Default)]
    pub struct FakeTransport {
        responses: HashMap<String, Value>,
        pub requests: RefCell<Vec<Request>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, path: &str, payload: Value) -> Self {
            self.responses.insert(path.to_string(), payload);
            self
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }

        fn answer(&self, path: &str) -> Result<Value, ApiError> {
            self.responses.get(path).cloned().ok_or(ApiError::NotFound)
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
            let params = params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            self.requests
                .borrow_mut()
                .push(Request::Get(path.to_string(), params));
            self.answer(path)
        }

        fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
            self.requests
                .borrow_mut()
                .push(Request::Post(path.to_string(), body.clone()));
            self.answer(path)
        }
    }
}
