// Response body types shared by the hosted functions and the dev server

use serde::Serialize;

/// Upstream model handed to the front-end
pub const MODEL: &str = "deepseek-chat";

/// Path of the chat proxy the front-end should call
pub const PROXY_ENDPOINT: &str = "/api/chat";

/// Where the configuration was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentEnvironment {
    CloudflarePages,
    Development,
}

/// Request tuning for chat calls; `timeout` is advisory, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 1000,
            timeout: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub has_api_key: bool,
    pub environment: DeploymentEnvironment,
    pub use_proxy: bool,
    pub proxy_endpoint: &'static str,
    pub model: &'static str,
    pub request_config: RequestConfig,
}

/// `{error, message}` body used by every failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}

pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
