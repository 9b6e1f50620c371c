use std::sync::Arc;

use pages_config::env::ProcessEnv;
use pages_config::functions::{self, Functions};
use pages_config::logger;
use pages_config::server::{self, ConnectionSettings};
use pages_config::settings::{self, FunctionsSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings::FUNCTIONS_CONFIG_FILE.to_string());
    let cfg = FunctionsSettings::load_from(&config_path)?;
    logger::init(&cfg.logging)?;
    logger::install_panic_hook();

    // Requests are answered from the environment alone; one thread is plenty
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: FunctionsSettings) -> Result<(), Box<dyn std::error::Error>> {
    let addr = settings::socket_addr(&cfg.server)?;
    let listener = server::create_listener(addr)?;

    let env = Arc::new(ProcessEnv);
    match functions::resolve_api_key(env.as_ref()) {
        Ok(Some(_)) => logger::log_info("API key configured"),
        Ok(None) => logger::log_warning(
            "No API key configured; /api/config will answer 400 API_KEY_NOT_CONFIGURED",
        ),
        Err(e) => logger::log_error(&format!("Cannot read API key variables: {e}")),
    }

    let app = Arc::new(Functions::new(env));
    logger::log_server_start("pages-functions", &addr, &cfg.logging);
    logger::log_info("  - GET|OPTIONS /api/config");
    logger::log_info("  - GET|OPTIONS /api/debug");

    let connection_settings = ConnectionSettings::new(&cfg.performance, &cfg.logging);
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run(listener, connection_settings, move |ctx| {
            let app = Arc::clone(&app);
            async move { app.handle(&ctx) }
        }))
        .await
}
