//! Runtime configuration endpoints for the front-end.
//!
//! - [`functions`]: the hosted `/api/config` and `/api/debug` endpoints
//! - [`dev`]: the local development server (static files, local config, health)
//!
//! Both read the environment through [`env::EnvSource`] and share the CORS
//! and response plumbing in [`http`].

pub mod dev;
pub mod env;
pub mod error;
pub mod functions;
pub mod http;
pub mod logger;
pub mod model;
pub mod server;
pub mod settings;

#[cfg(test)]
mod test_support;
