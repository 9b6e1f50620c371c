//! Static file serving module
//!
//! Serves the front-end straight from the project directory. `/` and
//! directory paths resolve to the entry document.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::http::{
    build_304_response, build_404_response, build_file_response, mime, RequestContext,
};
use crate::logger;

pub struct StaticFiles {
    root: PathBuf,
    entry_document: String,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, entry_document: &str) -> Self {
        Self {
            root: root.into(),
            entry_document: entry_document.to_string(),
        }
    }

    pub async fn serve(&self, ctx: &RequestContext) -> Response<Full<Bytes>> {
        let Some((content, content_type)) = self.load(&ctx.path).await else {
            return build_404_response();
        };

        let etag = generate_etag(&content);
        if etag_matches(ctx.if_none_match.as_deref(), &etag) {
            return build_304_response(&etag);
        }
        build_file_response(content, content_type, &etag, ctx.is_head())
    }

    /// Read the file behind `request_path`, refusing anything outside the root
    pub async fn load(&self, request_path: &str) -> Option<(Vec<u8>, &'static str)> {
        let decoded = match urlencoding::decode(request_path) {
            Ok(p) => p.into_owned(),
            Err(e) => {
                logger::log_warning(&format!("Undecodable path '{request_path}': {e}"));
                return None;
            }
        };
        let relative = decoded.trim_start_matches('/');

        let root = match self.root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Static root '{}' is not accessible: {e}",
                    self.root.display()
                ));
                return None;
            }
        };

        let mut file_path = root.join(relative);
        if relative.is_empty() || relative.ends_with('/') || file_path.is_dir() {
            file_path = file_path.join(&self.entry_document);
        }

        // Missing files are the usual 404, not worth a log line
        let canonical = file_path.canonicalize().ok()?;
        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {request_path} -> {}",
                canonical.display()
            ));
            return None;
        }
        if !canonical.is_file() {
            return None;
        }

        let content = match fs::read(&canonical).await {
            Ok(c) => c,
            Err(e) => {
                logger::log_error(&format!("Failed to read '{}': {e}", canonical.display()));
                return None;
            }
        };
        Some((content, content_type_of(&canonical)))
    }
}

fn content_type_of(path: &Path) -> &'static str {
    mime::content_type_for(path.extension().and_then(|e| e.to_str()))
}

fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == etag || candidate == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::read_body;
    use hyper::{Method, StatusCode};

    fn site() -> (tempfile::TempDir, StaticFiles) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>game</h1>").unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js/app.js"), "console.log(1)").unwrap();
        std::fs::write(dir.path().join("my notes.txt"), "spaced").unwrap();
        let files = StaticFiles::new(dir.path(), "index.html");
        (dir, files)
    }

    #[tokio::test]
    async fn test_root_serves_entry_document() {
        let (_dir, files) = site();
        let response = files.serve(&RequestContext::new(Method::GET, "/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(read_body(response).await, "<h1>game</h1>");
    }

    #[tokio::test]
    async fn test_nested_asset() {
        let (_dir, files) = site();
        let response = files.serve(&RequestContext::new(Method::GET, "/js/app.js")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let (_dir, files) = site();
        let response = files.serve(&RequestContext::new(Method::GET, "/my%20notes.txt")).await;
        assert_eq!(read_body(response).await, "spaced");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let (_dir, files) = site();
        let response = files.serve(&RequestContext::new(Method::GET, "/nope.css")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_entry_document_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let files = StaticFiles::new(dir.path(), "index.html");
        let response = files.serve(&RequestContext::new(Method::GET, "/")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.env"), "DEEPSEEK_API_KEY=x").unwrap();
        std::fs::create_dir(outer.path().join("site")).unwrap();
        let files = StaticFiles::new(outer.path().join("site"), "index.html");
        assert!(files.load("/../secret.env").await.is_none());
        assert!(files.load("/%2e%2e/secret.env").await.is_none());
    }

    #[tokio::test]
    async fn test_matching_etag_is_304() {
        let (_dir, files) = site();
        let first = files.serve(&RequestContext::new(Method::GET, "/js/app.js")).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let mut ctx = RequestContext::new(Method::GET, "/js/app.js");
        ctx.if_none_match = Some(etag);
        let second = files.serve(&ctx).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let (_dir, files) = site();
        let response = files.serve(&RequestContext::new(Method::HEAD, "/index.html")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(read_body(response).await.is_empty());
    }

    #[test]
    fn test_etag_match_list_and_wildcard() {
        assert!(etag_matches(Some("\"a\", \"b\""), "\"b\""));
        assert!(etag_matches(Some("*"), "\"b\""));
        assert!(!etag_matches(Some("\"a\""), "\"b\""));
        assert!(!etag_matches(None, "\"b\""));
    }
}
