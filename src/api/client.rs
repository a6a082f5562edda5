use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.gong.io/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Safely slice a string at UTF-8 character boundaries.
/// Returns a substring from `start` to `end` byte positions, widened to valid char boundaries.
fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let mut start = start.min(s.len());
    while !s.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = end.min(s.len()).max(start);
    while !s.is_char_boundary(end) {
        end += 1;
    }
    &s[start..end]
}

/// Truncate a string for log output, appending "..." if truncated.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", safe_slice(s, 0, max_len))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "Authentication failed (401). Check GONG_ACCESS_KEY and GONG_ACCESS_KEY_SECRET."
    )]
    Unauthorized,

    #[error("Resource not found (404). The requested resource may not exist.")]
    NotFound,

    #[error("Rate limited (429). Please wait before making more requests.")]
    RateLimited,

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Commands reach Gong only through this trait.
pub trait Transport {
    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError>;
    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

pub struct GongClient {
    base_url: String,
    auth_header: String,
    client: reqwest::blocking::Client,
}

impl GongClient {
    pub fn new(access_key: &str, access_key_secret: &str, base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: basic_auth_header(access_key, access_key_secret),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        start: Instant,
    ) -> Result<Value, ApiError> {
        let response = request
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| {
                debug!("  network error after {:?}: {}", start.elapsed(), e);
                ApiError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        debug!("  response: {} in {:?}", status, start.elapsed());

        match status.as_u16() {
            200..=299 => {
                // Read body as text first so we can include it in error messages
                let body = response
                    .text()
                    .map_err(|e| ApiError::InvalidResponse(format!("failed to read body: {}", e)))?;
                debug!("  response body: {} bytes", body.len());
                debug!("  response preview: {}", truncate_for_log(&body, 200));
                parse_body(&body)
            }
            401 => {
                debug!("  unauthorized (401)");
                Err(ApiError::Unauthorized)
            }
            404 => {
                debug!("  not found (404)");
                Err(ApiError::NotFound)
            }
            429 => {
                debug!("  rate limited (429)");
                Err(ApiError::RateLimited)
            }
            _ => {
                let body = response.text().unwrap_or_default();
                debug!("  server error ({}): {}", status.as_u16(), truncate_for_log(&body, 500));
                Err(ApiError::ServerError(status.as_u16(), body))
            }
        }
    }
}

impl Transport for GongClient {
    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("GET {} ({} params)", url, params.len());
        let start = Instant::now();
        self.send(self.client.get(&url).query(params), start)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.url(path);
        let body_json = body.to_string();
        debug!("POST {} (body: {} bytes)", url, body_json.len());
        debug!("  request body: {}", truncate_for_log(&body_json, 200));
        let start = Instant::now();
        self.send(self.client.post(&url).json(body), start)
    }
}

fn basic_auth_header(access_key: &str, access_key_secret: &str) -> String {
    let credentials = STANDARD.encode(format!("{}:{}", access_key, access_key_secret));
    format!("Basic {}", credentials)
}

/// Parse a success body, pointing at the offending spot when it is not JSON.
fn parse_body(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("  deserialization error: {}", e);
        let col = e.column().saturating_sub(1);
        let context = if col < body.len() {
            let start = col.saturating_sub(100);
            format!(
                "Context around column {}:\n...{}...",
                e.column(),
                safe_slice(body, start, col + 100)
            )
        } else {
            format!("Response body:\n{}", truncate_for_log(body, 500))
        };
        ApiError::InvalidResponse(format!("{}\n\n{}", e, context))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Unauthorized;
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("GONG_ACCESS_KEY"));

        let err = ApiError::NotFound;
        assert!(err.to_string().contains("404"));

        let err = ApiError::RateLimited;
        assert!(err.to_string().contains("429"));

        let err = ApiError::ServerError(503, "unavailable".into());
        assert_eq!(err.to_string(), "Server error (503): unavailable");
    }

    #[test]
    fn basic_auth_is_base64_of_key_and_secret() {
        // "key:secret"
        assert_eq!(basic_auth_header("key", "secret"), "Basic a2V5OnNlY3JldA==");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GongClient::new("k", "s", "https://example.test/v2/").unwrap();
        assert_eq!(client.url("/calls"), "https://example.test/v2/calls");
    }

    #[test]
    fn parse_body_accepts_json() {
        let value = parse_body(r#"{"records": {"totalRecords": 0}}"#).unwrap();
        assert_eq!(value["records"]["totalRecords"], 0);
    }

    #[test]
    fn parse_body_rejects_html() {
        let err = parse_body("<html>Bad gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(err.to_string().contains("<html>"));
    }

    #[test]
    fn test_safe_slice_ascii() {
        let s = "hello world";
        assert_eq!(safe_slice(s, 0, 5), "hello");
        assert_eq!(safe_slice(s, 6, 11), "world");
        assert_eq!(safe_slice(s, 0, 100), "hello world"); // end beyond length
    }

    #[test]
    fn test_safe_slice_utf8_multibyte() {
        // Each emoji is 4 bytes
        let s = "a😀b😀c";

        // end at byte 2 is mid-emoji, widened to the end of it
        assert_eq!(safe_slice(s, 0, 2), "a😀");

        // start at byte 2 is mid-emoji, moved back to its start
        assert_eq!(safe_slice(s, 2, 6), "😀b");

        assert_eq!(safe_slice(s, 0, 100), s);
    }

    #[test]
    fn test_safe_slice_empty_and_edge_cases() {
        let s = "test";
        assert_eq!(safe_slice(s, 0, 0), "");
        assert_eq!(safe_slice(s, 10, 20), ""); // start beyond length

        let empty = "";
        assert_eq!(safe_slice(empty, 0, 10), "");
    }

    #[test]
    fn truncate_for_log_appends_ellipsis() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdefghij", 4), "abcd...");
    }
}
