use colored::Colorize;

use crate::app::AppState;
use crate::error::Result;

/// Sign in and report who is signed in
pub async fn login(app: &AppState, email: &str, password: &str) -> Result<()> {
    tracing::info!("Signing in as {}", email);
    app.auth.login(email, password).await?;
    print_signed_in(app);
    Ok(())
}

/// Create an account, sign in and report who is signed in
pub async fn register(
    app: &AppState,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    tracing::info!("Registering {}", email);
    app.auth
        .register(first_name, last_name, email, password)
        .await?;
    print_signed_in(app);
    Ok(())
}

pub fn logout(app: &AppState) {
    app.auth.logout();
    println!("{}", "Signed out.".green());
}

pub fn status(app: &AppState) {
    let state = app.auth.get();
    if !state.is_authenticated {
        println!("{}", "Not signed in.".yellow());
        return;
    }
    match state.user {
        Some(user) => println!("Signed in as {} <{}>", user.display_name().bold(), user.email),
        None => println!("Signed in (stored token, profile not loaded)"),
    }
    println!("API: {}", app.config.api.base_url.cyan());
}

fn print_signed_in(app: &AppState) {
    let name = app
        .auth
        .get()
        .user
        .map(|u| u.display_name())
        .unwrap_or_else(|| "unknown user".to_string());
    println!("{}", format!("Signed in as {}", name).green());
}
