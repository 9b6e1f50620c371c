//! Local development server
//!
//! Static front-end files plus local stand-ins for the hosted endpoints.
//! `/api/config` here returns the literal API key, so only the `dev-server`
//! binary mounts this router and it binds to loopback by default.

mod local_config;
mod static_files;

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use crate::env::EnvSource;
use crate::http::{build_405_response, CorsHeaders, CorsPolicy, RequestContext};

pub use local_config::{has_api_key, DEV_API_KEY_VAR};
pub use static_files::StaticFiles;

pub struct DevServer {
    env: Arc<dyn EnvSource>,
    static_files: StaticFiles,
    cors: CorsPolicy,
}

impl DevServer {
    pub fn new(env: Arc<dyn EnvSource>, static_files: StaticFiles) -> Self {
        Self {
            env,
            static_files,
            cors: CorsPolicy::permissive(),
        }
    }

    pub async fn handle(&self, ctx: &RequestContext) -> Response<Full<Bytes>> {
        if ctx.method == Method::OPTIONS {
            return self.cors.preflight();
        }

        let mut response = match (&ctx.method, ctx.path.as_str()) {
            (&Method::GET | &Method::HEAD, "/api/config") => {
                without_body(local_config::config(self.env.as_ref()), ctx)
            }
            (&Method::GET | &Method::HEAD, "/api/health") => {
                without_body(local_config::health(self.env.as_ref()), ctx)
            }
            (&Method::GET | &Method::HEAD, _) => self.static_files.serve(ctx).await,
            _ => build_405_response(self.cors.allow_methods),
        };
        self.cors.apply(&mut response, CorsHeaders::Full);
        response
    }
}

/// HEAD gets the GET headers with an empty body
fn without_body(
    response: Response<Full<Bytes>>,
    ctx: &RequestContext,
) -> Response<Full<Bytes>> {
    if !ctx.is_head() {
        return response;
    }
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}
