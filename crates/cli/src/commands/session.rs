//! Splash, login, profile and logout.

use std::io::{BufRead, Write};

use secrecy::SecretString;

use crate::output;
use crate::state::AppState;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Report the screen the app would open on.
pub async fn launch(state: &AppState) -> CommandResult {
    let route = state.session_controller().resume().await;
    output::print_route(route);
    Ok(())
}

pub async fn login(state: &AppState, email: &str, password: Option<String>) -> CommandResult {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    let route = state
        .session_controller()
        .login(email, &SecretString::from(password))
        .await?;
    tracing::info!(%route, "Login complete");
    Ok(())
}

pub async fn logout(state: &AppState) -> CommandResult {
    state.session_controller().logout().await?;
    Ok(())
}

pub async fn profile(state: &AppState) -> CommandResult {
    let profile = state.session_controller().profile().await?;
    output::print_profile(&profile);
    Ok(())
}

/// Read the password from stdin. Input is echoed; prefer
/// `ADMIN_PORTAL_PASSWORD` in scripts.
#[allow(clippy::print_stderr)]
fn prompt_password() -> std::io::Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
