//! CORS policy
//!
//! One value describes the whole CORS contract of an endpoint: which headers
//! go on substantive responses and what a preflight looks like. Both the
//! hosted functions and the dev server build their headers from here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Response, StatusCode};

use super::response::empty_response;

/// How much of the policy to put on a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsHeaders {
    /// `Access-Control-Allow-Origin` only (server errors)
    OriginOnly,
    /// Origin plus allowed methods and headers
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allow_origin: &'static str,
    /// Methods advertised on substantive responses
    pub allow_methods: &'static str,
    /// Methods advertised on the preflight
    pub preflight_methods: &'static str,
    pub allow_headers: &'static str,
    /// `Access-Control-Max-Age` in seconds
    pub max_age: u32,
    pub preflight_status: StatusCode,
}

impl CorsPolicy {
    /// Contract of the hosted `/api/*` functions
    pub const fn functions() -> Self {
        Self {
            allow_origin: "*",
            allow_methods: "GET",
            preflight_methods: "GET, OPTIONS",
            allow_headers: "Content-Type",
            max_age: 86_400,
            preflight_status: StatusCode::OK,
        }
    }

    /// Anything-goes policy of the local dev server
    pub const fn permissive() -> Self {
        Self {
            allow_origin: "*",
            allow_methods: "GET, HEAD, OPTIONS",
            preflight_methods: "GET, HEAD, OPTIONS",
            allow_headers: "Content-Type, Authorization",
            max_age: 86_400,
            preflight_status: StatusCode::NO_CONTENT,
        }
    }

    /// Answer an OPTIONS request: no body, full preflight headers
    pub fn preflight(&self) -> Response<Full<Bytes>> {
        let mut response = empty_response(self.preflight_status);
        let headers = response.headers_mut();
        headers.insert(
            hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(self.allow_origin),
        );
        headers.insert(
            hyper::header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(self.preflight_methods),
        );
        headers.insert(
            hyper::header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(self.allow_headers),
        );
        headers.insert(
            hyper::header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from(self.max_age),
        );
        response
    }

    /// Add CORS headers to an already built response
    pub fn apply<B>(&self, response: &mut Response<B>, scope: CorsHeaders) {
        let headers = response.headers_mut();
        headers.insert(
            hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(self.allow_origin),
        );
        if scope == CorsHeaders::Full {
            let pairs: [(HeaderName, &'static str); 2] = [
                (hyper::header::ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods),
                (hyper::header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers),
            ];
            for (name, value) in pairs {
                headers.insert(name, HeaderValue::from_static(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::json_response;
    use crate::model::ErrorBody;

    #[test]
    fn test_functions_preflight() {
        let response = CorsPolicy::functions().preflight();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET, OPTIONS");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
        assert_eq!(headers["Access-Control-Max-Age"], "86400");
    }

    #[test]
    fn test_permissive_preflight_is_no_content() {
        let response = CorsPolicy::permissive().preflight();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_origin_only_scope() {
        let mut response =
            json_response(StatusCode::INTERNAL_SERVER_ERROR, &ErrorBody::new("E", "m"));
        CorsPolicy::functions().apply(&mut response, CorsHeaders::OriginOnly);
        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert!(!headers.contains_key("Access-Control-Allow-Methods"));
        assert!(!headers.contains_key("Access-Control-Allow-Headers"));
    }

    #[test]
    fn test_full_scope_uses_substantive_methods() {
        let mut response = empty_response(StatusCode::OK);
        CorsPolicy::functions().apply(&mut response, CorsHeaders::Full);
        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
        assert!(!headers.contains_key("Access-Control-Max-Age"));
    }
}
