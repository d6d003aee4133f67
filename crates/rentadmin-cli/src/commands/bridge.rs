//! Bridge command - run the auth bridge server.

use anyhow::Result;

use rentadmin_bridge::BridgeServerConfig;

use super::load_config;
use crate::ui;

/// Start the auth bridge.
pub async fn run_bridge(port: Option<u16>, bind: Option<String>) -> Result<()> {
    let config = load_config()?;

    let mut server = BridgeServerConfig::from_config(&config);
    if let Some(port) = port {
        server.port = port;
    }
    if let Some(bind) = bind {
        server.bind_address = bind;
    }

    ui::header("Starting auth bridge");
    ui::kv("Address", &format!("{}:{}", server.bind_address, server.port));
    ui::kv("Environment", if server.cookie.secure { "production" } else { "development" });
    if server.allowed_origins.is_empty() {
        ui::kv("CORS", "same-origin only");
    } else {
        ui::kv("CORS", &server.allowed_origins.join(", "));
    }
    println!();
    ui::info("Press Ctrl+C to stop");

    rentadmin_bridge::start(server).await?;
    Ok(())
}
