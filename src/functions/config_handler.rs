//! `/api/config` for the hosted deployment
//!
//! Tells the front-end whether a key is configured and where to send chat
//! requests. The key itself never leaves the server.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::env::{EnvError, EnvSource};
use crate::error::HandlerError;
use crate::http::{json_response, try_json_response, CorsHeaders, CorsPolicy};
use crate::logger;
use crate::model::{
    ConfigResponse, DeploymentEnvironment, ErrorBody, RequestConfig, INTERNAL_ERROR, MODEL,
    PROXY_ENDPOINT,
};

/// Variables checked for the key, in priority order
pub const API_KEY_VARS: [&str; 3] = ["DEEPSEEK_API_KEY", "API_KEY", "AI_API_KEY"];

/// Value shipped in templates; treated the same as no key
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

pub const API_KEY_NOT_CONFIGURED: &str = "API_KEY_NOT_CONFIGURED";

const NOT_CONFIGURED_MESSAGE: &str =
    "API密钥未配置。请在 Cloudflare Pages 项目的 Settings → Environment variables 中设置 DEEPSEEK_API_KEY，然后重新部署。";

/// First non-empty candidate, unless it is the template placeholder
pub fn resolve_api_key(env: &dyn EnvSource) -> Result<Option<String>, EnvError> {
    for name in API_KEY_VARS {
        if let Some(value) = env.non_empty(name)? {
            return Ok((value != API_KEY_PLACEHOLDER).then_some(value));
        }
    }
    Ok(None)
}

pub struct ConfigHandler {
    env: Arc<dyn EnvSource>,
    cors: CorsPolicy,
}

impl ConfigHandler {
    pub fn new(env: Arc<dyn EnvSource>, cors: CorsPolicy) -> Self {
        Self { env, cors }
    }

    pub fn get(&self) -> Response<Full<Bytes>> {
        self.try_get().unwrap_or_else(|e| {
            logger::log_error(&format!("/api/config failed: {e}"));
            let mut response = json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorBody::new(INTERNAL_ERROR, e.to_string()),
            );
            self.cors.apply(&mut response, CorsHeaders::OriginOnly);
            response
        })
    }

    pub fn options(&self) -> Response<Full<Bytes>> {
        self.cors.preflight()
    }

    fn try_get(&self) -> Result<Response<Full<Bytes>>, HandlerError> {
        if resolve_api_key(self.env.as_ref())?.is_none() {
            logger::log_warning("/api/config requested but no API key is configured");
            let mut response = try_json_response(
                StatusCode::BAD_REQUEST,
                &ErrorBody::new(API_KEY_NOT_CONFIGURED, NOT_CONFIGURED_MESSAGE),
            )?;
            self.cors.apply(&mut response, CorsHeaders::Full);
            return Ok(response);
        }

        let body = ConfigResponse {
            has_api_key: true,
            environment: DeploymentEnvironment::CloudflarePages,
            use_proxy: true,
            proxy_endpoint: PROXY_ENDPOINT,
            model: MODEL,
            request_config: RequestConfig::default(),
        };
        let mut response = try_json_response(StatusCode::OK, &body)?;
        self.cors.apply(&mut response, CorsHeaders::Full);
        response.headers_mut().insert(
            hyper::header::CACHE_CONTROL,
            hyper::header::HeaderValue::from_static("no-cache"),
        );
        Ok(response)
    }
}
