//! Hosted functions
//!
//! The `/api/config` and `/api/debug` endpoints as deployed publicly. This
//! router never serves the literal API key; that path only exists in
//! [`crate::dev`].

mod config_handler;
mod debug_handler;

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use crate::env::EnvSource;
use crate::http::{
    build_405_response, build_api_404_response, CorsHeaders, CorsPolicy, RequestContext,
};

use config_handler::ConfigHandler;
use debug_handler::DebugHandler;

pub use config_handler::resolve_api_key;

pub struct Functions {
    config: ConfigHandler,
    debug: DebugHandler,
    cors: CorsPolicy,
}

impl Functions {
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        let cors = CorsPolicy::functions();
        Self {
            config: ConfigHandler::new(Arc::clone(&env), cors.clone()),
            debug: DebugHandler::new(env, cors.clone()),
            cors,
        }
    }

    pub fn handle(&self, ctx: &RequestContext) -> Response<Full<Bytes>> {
        match (ctx.path.as_str(), &ctx.method) {
            ("/api/config", &Method::GET) => self.config.get(),
            ("/api/config", &Method::OPTIONS) => self.config.options(),
            ("/api/debug", &Method::GET) => self.debug.get(),
            ("/api/debug", &Method::OPTIONS) => self.debug.options(),
            ("/api/config" | "/api/debug", _) => {
                let mut response = build_405_response(self.cors.preflight_methods);
                self.cors.apply(&mut response, CorsHeaders::OriginOnly);
                response
            }
            (path, _) => {
                let mut response = build_api_404_response(path);
                self.cors.apply(&mut response, CorsHeaders::OriginOnly);
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use crate::test_support::read_json;
    use hyper::StatusCode;

    fn functions(env: MapEnv) -> Functions {
        Functions::new(Arc::new(env))
    }

    #[tokio::test]
    async fn test_empty_environment_config_is_400() {
        let response =
            functions(MapEnv::new()).handle(&RequestContext::new(Method::GET, "/api/config"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "API_KEY_NOT_CONFIGURED");
    }

    #[test]
    fn test_options_on_both_endpoints() {
        let app = functions(MapEnv::new().with_unreadable("DEBUG"));
        for path in ["/api/config", "/api/debug"] {
            let response = app.handle(&RequestContext::new(Method::OPTIONS, path));
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        }
    }

    #[test]
    fn test_debug_route() {
        let response =
            functions(MapEnv::new()).handle(&RequestContext::new(Method::GET, "/api/debug"));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_post_is_not_allowed() {
        let response =
            functions(MapEnv::new()).handle(&RequestContext::new(Method::POST, "/api/config"));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["Allow"], "GET, OPTIONS");
    }

    #[tokio::test]
    async fn test_health_is_not_a_hosted_route() {
        let response = functions(MapEnv::new().with("DEEPSEEK_API_KEY", "k"))
            .handle(&RequestContext::new(Method::GET, "/api/health"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = read_json(response).await;
        assert_eq!(json["error"], "NOT_FOUND");
    }
}
