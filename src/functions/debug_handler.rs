//! `/api/debug`
//!
//! Feature switches for the front-end's debug tooling. Global debug mode turns
//! every feature on; otherwise each feature follows its own variable.

use std::collections::BTreeMap;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::env::{EnvError, EnvSource};
use crate::error::HandlerError;
use crate::http::{json_response, try_json_response, CorsHeaders, CorsPolicy};
use crate::logger;
use crate::model::INTERNAL_ERROR;

/// Any of these set to `"true"` enables debug mode.
/// `ENABLE_DEBUG` duplicates `DEBUG_MODE` and stays for older deployments.
pub const DEBUG_SWITCHES: [&str; 3] = ["DEBUG", "DEBUG_MODE", "ENABLE_DEBUG"];

pub const SHOW_SKIP_VAR: &str = "DEBUG_SHOW_SKIP";
pub const SHOW_END_VAR: &str = "DEBUG_SHOW_END";
pub const CONSOLE_VAR: &str = "DEBUG_CONSOLE";
pub const AUTO_SAVE_VAR: &str = "DEBUG_AUTO_SAVE";

const FEATURE_VARS: [&str; 4] = [SHOW_SKIP_VAR, SHOW_END_VAR, CONSOLE_VAR, AUTO_SAVE_VAR];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugSource {
    Environment,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugFeatures {
    pub show_skip_button: bool,
    pub show_end_game_button: bool,
    pub show_console_logs: bool,
    pub auto_save_logs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugConfig {
    pub enabled: bool,
    pub source: DebugSource,
    pub features: DebugFeatures,
    /// Raw values of the contributing variables, only in debug mode.
    /// Unset variables are left out of the map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<BTreeMap<&'static str, String>>,
}

impl DebugConfig {
    pub fn from_env(env: &dyn EnvSource) -> Result<Self, EnvError> {
        let mut enabled = false;
        for name in DEBUG_SWITCHES {
            enabled |= env.flag(name)?;
        }

        let feature = |name: &str| -> Result<bool, EnvError> { Ok(enabled || env.flag(name)?) };
        let features = DebugFeatures {
            show_skip_button: feature(SHOW_SKIP_VAR)?,
            show_end_game_button: feature(SHOW_END_VAR)?,
            show_console_logs: feature(CONSOLE_VAR)?,
            auto_save_logs: feature(AUTO_SAVE_VAR)?,
        };

        let environment_variables = if enabled {
            let mut raw = BTreeMap::new();
            for name in DEBUG_SWITCHES.into_iter().chain(FEATURE_VARS) {
                if let Some(value) = env.var(name)? {
                    raw.insert(name, value);
                }
            }
            Some(raw)
        } else {
            None
        };

        Ok(Self {
            enabled,
            source: DebugSource::Environment,
            features,
            environment_variables,
        })
    }
}

#[derive(Debug, Serialize)]
struct DebugFallback {
    enabled: bool,
    source: DebugSource,
}

/// 500 body that still carries a usable (disabled) debug config
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugErrorBody {
    error: &'static str,
    message: String,
    debug_config: DebugFallback,
}

pub struct DebugHandler {
    env: Arc<dyn EnvSource>,
    cors: CorsPolicy,
}

impl DebugHandler {
    pub fn new(env: Arc<dyn EnvSource>, cors: CorsPolicy) -> Self {
        Self { env, cors }
    }

    pub fn get(&self) -> Response<Full<Bytes>> {
        self.try_get().unwrap_or_else(|e| {
            logger::log_error(&format!("/api/debug failed, reporting debug disabled: {e}"));
            let body = DebugErrorBody {
                error: INTERNAL_ERROR,
                message: e.to_string(),
                debug_config: DebugFallback {
                    enabled: false,
                    source: DebugSource::Error,
                },
            };
            let mut response = json_response(StatusCode::INTERNAL_SERVER_ERROR, &body);
            self.cors.apply(&mut response, CorsHeaders::OriginOnly);
            response
        })
    }

    pub fn options(&self) -> Response<Full<Bytes>> {
        self.cors.preflight()
    }

    fn try_get(&self) -> Result<Response<Full<Bytes>>, HandlerError> {
        let config = DebugConfig::from_env(self.env.as_ref())?;
        if config.enabled {
            logger::log_info("Debug mode is enabled; /api/debug is echoing raw flag values");
        }
        let mut response = try_json_response(StatusCode::OK, &config)?;
        self.cors.apply(&mut response, CorsHeaders::Full);
        response.headers_mut().insert(
            hyper::header::CACHE_CONTROL,
            hyper::header::HeaderValue::from_static("no-cache"),
        );
        Ok(response)
    }
}
