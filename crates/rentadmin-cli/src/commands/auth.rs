//! Login, logout and session status.

use anyhow::Result;

use rentadmin_client::BridgeClient;
use rentadmin_client::models::LoginRequest;
use rentadmin_core::auth::{AuthBridge, AuthCheck};

use super::{adapter_context, credential_store, load_config};
use crate::ui;

/// Login command arguments.
#[derive(Debug, Clone, Default)]
pub struct LoginArgs {
    /// Admin email; prompted when absent.
    pub email: Option<String>,
    /// Password; prompted when absent.
    pub password: Option<String>,
}

/// Sign in and persist the session.
pub async fn run_login(args: LoginArgs) -> Result<bool> {
    let config = load_config()?;
    let email = match args.email {
        Some(email) => email,
        None => ui::prompts::email()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => ui::prompts::password()?,
    };

    let ctx = adapter_context(&config)?;
    let result = ctx.auth().login(&LoginRequest { email, password }).await;
    let success = result.success;

    if let Some(data) = ui::toast(result, "Logged in") {
        ui::kv("User", &data.user.name);
        ui::kv("Role", ui::or_dash(data.user.role.as_deref()));
    }
    Ok(success)
}

/// Forget the persisted session.
pub fn run_logout() -> Result<bool> {
    let config = load_config()?;
    let ctx = adapter_context(&config)?;
    Ok(ui::toast(ctx.auth().logout(), "Logged out").is_some())
}

/// Show whether a session exists, locally or through a running bridge.
pub async fn run_status(bridge: Option<String>) -> Result<bool> {
    let config = load_config()?;

    let store = credential_store(&config);
    let check = match &bridge {
        Some(url) => {
            // The bridge reads the session from the request cookie, so send ours.
            let client = BridgeClient::new(url.clone())?;
            if let Some(token) = store.get()? {
                client.seed_session(&config.session.cookie_name, &token)?;
            }
            client.check().await
        }
        None => AuthBridge::new(store).check(),
    };

    ui::header("Session");
    ui::kv("Backend", &config.api.base_url);
    ui::kv("Source", bridge.as_deref().unwrap_or("local credential store"));
    print_check(&check);
    Ok(check.authenticated)
}

fn print_check(check: &AuthCheck) {
    if check.authenticated {
        ui::success(&check.message);
    } else {
        ui::warning(&check.message);
        ui::info("Sign in with: rentadmin login");
    }
}
