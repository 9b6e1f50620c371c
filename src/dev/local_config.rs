// Local-only /api/config and /api/health
//
// Unlike the hosted config endpoint this one hands out the literal key: the
// dev server is meant to run on the developer's own machine.

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::env::{EnvError, EnvSource};
use crate::http::json_response;
use crate::logger;
use crate::model::{
    ConfigResponse, DeploymentEnvironment, ErrorBody, RequestConfig, INTERNAL_ERROR, MODEL,
    PROXY_ENDPOINT,
};

/// The dev server reads exactly one variable
pub const DEV_API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// Upstream the browser talks to directly during development
pub const UPSTREAM_BASE_URL: &str = "https://api.deepseek.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalConfigResponse {
    #[serde(flatten)]
    pub config: ConfigResponse,
    pub api_key: String,
    pub base_url: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: DeploymentEnvironment,
    pub timestamp: String,
    pub has_api_key: bool,
}

/// Whether the dev key is present, whatever its value
pub fn has_api_key(env: &dyn EnvSource) -> Result<bool, EnvError> {
    Ok(env.non_empty(DEV_API_KEY_VAR)?.is_some())
}

pub fn config(env: &dyn EnvSource) -> Response<Full<Bytes>> {
    let api_key = match env.non_empty(DEV_API_KEY_VAR) {
        Ok(Some(key)) => key,
        Ok(None) => {
            logger::log_error("/api/config: DEEPSEEK_API_KEY is not set for the dev server");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorBody::new(
                    "API key not configured",
                    "Set DEEPSEEK_API_KEY in .env (or export it) and restart the dev server",
                ),
            );
        }
        Err(e) => return internal_error(&e),
    };

    let body = LocalConfigResponse {
        config: ConfigResponse {
            has_api_key: true,
            environment: DeploymentEnvironment::Development,
            use_proxy: false,
            proxy_endpoint: PROXY_ENDPOINT,
            model: MODEL,
            request_config: RequestConfig::default(),
        },
        api_key,
        base_url: UPSTREAM_BASE_URL,
    };
    json_response(StatusCode::OK, &body)
}

pub fn health(env: &dyn EnvSource) -> Response<Full<Bytes>> {
    let has_api_key = match has_api_key(env) {
        Ok(present) => present,
        Err(e) => return internal_error(&e),
    };
    let body = HealthResponse {
        status: "ok",
        environment: DeploymentEnvironment::Development,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        has_api_key,
    };
    json_response(StatusCode::OK, &body)
}

fn internal_error(e: &EnvError) -> Response<Full<Bytes>> {
    logger::log_error(&format!("dev server env lookup failed: {e}"));
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorBody::new(INTERNAL_ERROR, e.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use crate::test_support::read_json;

    #[tokio::test]
    async fn test_config_includes_literal_key() {
        let env = MapEnv::new().with(DEV_API_KEY_VAR, "sk-local");
        let response = config(&env);
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["apiKey"], "sk-local");
        assert_eq!(json["baseUrl"], "https://api.deepseek.com");
        assert_eq!(json["hasApiKey"], true);
        assert_eq!(json["environment"], "development");
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["requestConfig"]["maxTokens"], 1000);
    }

    #[tokio::test]
    async fn test_config_without_key_is_500() {
        let response = config(&MapEnv::new());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert_eq!(json["error"], "API key not configured");
        assert!(json["message"].as_str().unwrap().contains("DEEPSEEK_API_KEY"));
    }

    #[tokio::test]
    async fn test_config_ignores_hosted_fallback_names() {
        let env = MapEnv::new().with("API_KEY", "sk-other");
        assert_eq!(config(&env).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_reports_key_presence() {
        let json = read_json(health(&MapEnv::new())).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["environment"], "development");
        assert_eq!(json["hasApiKey"], false);

        let placeholder = MapEnv::new().with(DEV_API_KEY_VAR, "YOUR_API_KEY_HERE");
        let json = read_json(health(&placeholder)).await;
        assert_eq!(json["hasApiKey"], true);
    }

    #[tokio::test]
    async fn test_health_timestamp_is_iso8601() {
        let json = read_json(health(&MapEnv::new())).await;
        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
