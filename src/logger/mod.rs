//! Logger module
//!
//! Provides logging utilities for both servers:
//! - Startup banners
//! - Access logging in several formats
//! - Error, warning and panic reporting
//! - Optional file-based output

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::settings::LoggingSettings;

/// Initialize the logger with configuration
///
/// Should be called once at startup. Until then everything goes to
/// stdout/stderr.
pub fn init(settings: &LoggingSettings) -> std::io::Result<()> {
    writer::init(
        settings.access_log_file.as_deref(),
        settings.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_fatal(message: &str) {
    write_error(&format!("[FATAL] {message}"));
}

pub fn log_server_start(name: &str, addr: &SocketAddr, settings: &LoggingSettings) {
    write_info("======================================");
    write_info(&format!("{name} started"));
    write_info(&format!("Listening on: http://{addr}"));
    if settings.access_log {
        write_info(&format!("Access log format: {}", settings.access_log_format));
    }
    if let Some(ref path) = settings.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = settings.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_access(entry: &AccessLogEntry, format: &str) {
    match writer::get() {
        Some(w) => w.write_access(&entry.format(format)),
        None => println!("{}", entry.format(format)),
    }
}

/// Report panics through the error log instead of bare stderr
///
/// Connections run in their own tasks, so a panic while serving one request
/// is logged here and the server keeps accepting.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map_or_else(
            || "unknown location".to_string(),
            |l| format!("{}:{}", l.file(), l.line()),
        );
        log_fatal(&format!(
            "Uncaught panic at {location}: {}",
            panic_message(info.payload())
        ));
    }));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
