//! Request context
//!
//! The parts of a request the handlers look at, copied out of the hyper
//! request so handlers can be called without a live connection.

use hyper::{Method, Request};

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub if_none_match: Option<String>,
}

impl RequestContext {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            if_none_match: None,
        }
    }

    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            if_none_match: req
                .headers()
                .get("if-none-match")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}
