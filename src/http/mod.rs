//! HTTP protocol layer module
//!
//! Response builders, the shared CORS policy and MIME detection. Nothing in
//! here knows about API keys or debug flags.

pub mod cors;
pub mod mime;
pub mod request;
pub mod response;

pub use cors::{CorsHeaders, CorsPolicy};
pub use request::RequestContext;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_api_404_response,
    build_file_response, empty_response, json_response, try_json_response,
};
