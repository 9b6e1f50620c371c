//! HTTP response building module
//!
//! Builders for the responses every endpoint shares. None of them panic: if
//! `http::response::Builder` rejects a header the error is logged and a bare
//! response is returned instead.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::model::{ErrorBody, NOT_FOUND};

/// Serialize `body` as a JSON response
pub fn try_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Full<Bytes>>, serde_json::Error> {
    let json = serde_json::to_vec(body)?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        }))
}

/// JSON response for bodies that cannot fail to serialize (error bodies)
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    try_json_response(status, body).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to serialize response: {e}"));
        fallback(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Response with no body
pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    fallback(status)
}

/// 404 with a JSON body, for unknown API routes
pub fn build_api_404_response(path: &str) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorBody::new(NOT_FOUND, format!("No endpoint at {path}")),
    )
}

/// Plain-text 404 for missing static files
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            fallback(StatusCode::NOT_FOUND)
        })
}

/// 405 listing the methods the resource does accept
pub fn build_405_response(allow: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            fallback(StatusCode::METHOD_NOT_ALLOWED)
        })
}

/// 304 Not Modified
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            fallback(StatusCode::NOT_MODIFIED)
        })
}

/// 200 with file contents; the body is dropped for HEAD
///
/// Files are revalidated on every request so edits show up on reload.
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "no-cache")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

fn fallback(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::read_json;

    #[tokio::test]
    async fn test_json_response_sets_content_type() {
        let response = json_response(StatusCode::BAD_REQUEST, &ErrorBody::new("X", "y"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["Content-Type"],
            "application/json; charset=utf-8"
        );
        let json = read_json(response).await;
        assert_eq!(json["error"], "X");
        assert_eq!(json["message"], "y");
    }

    #[tokio::test]
    async fn test_api_404_names_path() {
        let json = read_json(build_api_404_response("/api/nope")).await;
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "No endpoint at /api/nope");
    }

    #[test]
    fn test_405_allow_header() {
        let response = build_405_response("GET, OPTIONS");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["Allow"], "GET, OPTIONS");
    }

    #[test]
    fn test_head_file_response_keeps_length() {
        let response = build_file_response(b"hello".to_vec(), "text/plain", "\"1\"", true);
        assert_eq!(response.headers()["Content-Length"], "5");
    }
}
