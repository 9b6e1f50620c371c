// Server settings
// Loaded from an optional TOML file, APP_* environment variables and the
// defaults below, in increasing order of precedence: defaults < file < env.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceSettings {
    pub keep_alive: bool,
    /// Seconds
    pub read_timeout: u64,
    /// Seconds
    pub write_timeout: u64,
}

impl PerformanceSettings {
    /// Upper bound on the lifetime of one connection
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout.max(self.write_timeout))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub access_log: bool,
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StaticFilesSettings {
    pub root: String,
    pub entry_document: String,
}

/// Settings of the `pages-functions` binary
#[derive(Debug, Deserialize, Clone)]
pub struct FunctionsSettings {
    pub server: ServerSettings,
    pub performance: PerformanceSettings,
    pub logging: LoggingSettings,
}

/// Settings of the `dev-server` binary
#[derive(Debug, Deserialize, Clone)]
pub struct DevSettings {
    pub server: ServerSettings,
    pub performance: PerformanceSettings,
    pub logging: LoggingSettings,
    pub static_files: StaticFilesSettings,
}

pub const FUNCTIONS_CONFIG_FILE: &str = "pages-functions";
pub const DEV_CONFIG_FILE: &str = "dev-server";
pub const DEV_DEFAULT_PORT: u16 = 3001;

impl FunctionsSettings {
    /// `config_path` is a file name without extension, as with `config::File::with_name`
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        common_builder(config_path)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8788)?
            .build()?
            .try_deserialize()
    }
}

impl DevSettings {
    /// `port_override` is the plain `PORT` variable and beats every other source.
    /// An empty value counts as unset.
    pub fn load_from(
        config_path: &str,
        port_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let port_override = port_override.filter(|p| !p.is_empty());
        common_builder(config_path)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", DEV_DEFAULT_PORT)?
            .set_default("static_files.root", ".")?
            .set_default("static_files.entry_document", "index.html")?
            .set_override_option("server.port", port_override)?
            .build()?
            .try_deserialize()
    }

    /// The literal key is served on this address, so anything but loopback
    /// deserves a warning
    pub fn is_loopback_only(&self) -> Result<bool, String> {
        socket_addr(&self.server).map(|addr| addr.ip().is_loopback())
    }
}

pub fn socket_addr(server: &ServerSettings) -> Result<SocketAddr, String> {
    server
        .host
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, server.port))
        .map_err(|e| format!("Invalid listen host '{}': {e}", server.host))
}

fn common_builder(config_path: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_default("performance.keep_alive", true)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FILE: &str = "/nonexistent/pages-config-test-settings";

    #[test]
    fn test_functions_defaults() {
        let settings = FunctionsSettings::load_from(NO_FILE).unwrap();
        assert_eq!(settings.server.port, 8788);
        assert_eq!(settings.logging.access_log_format, "combined");
        assert!(settings.logging.access_log_file.is_none());
        assert_eq!(
            settings.performance.connection_timeout(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_dev_defaults() {
        let settings = DevSettings::load_from(NO_FILE, None).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, DEV_DEFAULT_PORT);
        assert_eq!(settings.static_files.root, ".");
        assert_eq!(settings.static_files.entry_document, "index.html");
        assert_eq!(settings.is_loopback_only(), Ok(true));
    }

    #[test]
    fn test_port_override() {
        let settings = DevSettings::load_from(NO_FILE, Some("4000".to_string())).unwrap();
        assert_eq!(settings.server.port, 4000);
    }

    #[test]
    fn test_empty_port_uses_default() {
        let settings = DevSettings::load_from(NO_FILE, Some(String::new())).unwrap();
        assert_eq!(settings.server.port, DEV_DEFAULT_PORT);
    }

    #[test]
    fn test_bad_port_override_is_an_error() {
        assert!(DevSettings::load_from(NO_FILE, Some("not-a-port".to_string())).is_err());
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev-server.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"0.0.0.0\"\n\n[static_files]\nroot = \"public\"\n",
        )
        .unwrap();
        let name = dir.path().join("dev-server");
        let settings = DevSettings::load_from(name.to_str().unwrap(), None).unwrap();
        assert_eq!(settings.static_files.root, "public");
        assert_eq!(settings.is_loopback_only(), Ok(false));
    }

    #[test]
    fn test_socket_addr_rejects_hostnames() {
        let server = ServerSettings {
            host: "localhost".to_string(),
            port: 80,
        };
        assert!(socket_addr(&server).is_err());
    }
}
