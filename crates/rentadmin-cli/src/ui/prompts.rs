//! Interactive prompts.

use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

#[allow(clippy::ptr_arg)] // dialoguer validators take `&String`
fn validate_email(value: &String) -> Result<(), &'static str> {
    match value.trim().split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("Enter a valid email address"),
    }
}

fn delete_prompt(resource: &str, id: &str) -> String {
    format!("Delete {resource} {id}? This cannot be undone")
}

/// Prompt for the admin email.
pub fn email() -> Result<String, dialoguer::Error> {
    Input::with_theme(&theme())
        .with_prompt("Email")
        .validate_with(validate_email)
        .interact_text()
}

/// Prompt for a password (hidden input).
pub fn password() -> Result<String, dialoguer::Error> {
    Password::with_theme(&theme())
        .with_prompt("Password")
        .interact()
}

/// Ask before deleting a record. Defaults to no.
pub fn confirm_delete(resource: &str, id: &str) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(&theme())
        .with_prompt(delete_prompt(resource, id))
        .default(false)
        .interact()
}
