use std::sync::Arc;

use pages_config::dev::{self, DevServer, StaticFiles};
use pages_config::env::ProcessEnv;
use pages_config::logger;
use pages_config::server::{self, ConnectionSettings};
use pages_config::settings::{self, DevSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is normal; the shell environment may already carry the key
    let dotenv = dotenvy::dotenv();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings::DEV_CONFIG_FILE.to_string());
    let cfg = DevSettings::load_from(&config_path, std::env::var("PORT").ok())?;
    logger::init(&cfg.logging)?;
    logger::install_panic_hook();

    match dotenv {
        Ok(path) => logger::log_info(&format!("Loaded environment from {}", path.display())),
        Err(e) if e.not_found() => {}
        Err(e) => logger::log_warning(&format!("Ignoring unreadable .env file: {e}")),
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: DevSettings) -> Result<(), Box<dyn std::error::Error>> {
    let addr = settings::socket_addr(&cfg.server)?;
    if !cfg.is_loopback_only()? {
        logger::log_warning(&format!(
            "Dev server bound to non-loopback address {addr}; \
             /api/config exposes {} to anyone who can reach it",
            dev::DEV_API_KEY_VAR
        ));
    }
    let listener = server::create_listener(addr)?;

    let env = Arc::new(ProcessEnv);
    match dev::has_api_key(env.as_ref()) {
        Ok(true) => logger::log_info(&format!("{} detected", dev::DEV_API_KEY_VAR)),
        Ok(false) => logger::log_warning(&format!(
            "{} not set; /api/config will answer 500 until it is",
            dev::DEV_API_KEY_VAR
        )),
        Err(e) => logger::log_error(&format!("Cannot read {}: {e}", dev::DEV_API_KEY_VAR)),
    }

    let static_files = StaticFiles::new(&cfg.static_files.root, &cfg.static_files.entry_document);
    let app = Arc::new(DevServer::new(env, static_files));

    logger::log_server_start("dev-server", &addr, &cfg.logging);
    logger::log_info(&format!(
        "Serving {} (entry: {})",
        cfg.static_files.root, cfg.static_files.entry_document
    ));
    logger::log_info(&format!("  - http://{addr}/api/config"));
    logger::log_info(&format!("  - http://{addr}/api/health"));

    let connection_settings = ConnectionSettings::new(&cfg.performance, &cfg.logging);
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run(listener, connection_settings, move |ctx| {
            let app = Arc::clone(&app);
            async move { app.handle(&ctx).await }
        }))
        .await
}
