/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint. Each one
drives a single store action on an [`AppState`] and prints the outcome.

- `account` - login, register, logout and status
- `sessions` - session list and history
- `research` - starting research and sending analyst feedback

A failed action is returned as an error so the process exits non-zero.
*/

use anyhow::bail;

use crate::app::AppState;
use crate::cli::Commands;
use crate::error::Result;

pub mod account;
pub mod research;
pub mod sessions;

/// Run `command` against `app`
pub async fn dispatch(app: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => account::login(app, &email, &password).await,
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
        } => account::register(app, &first_name, &last_name, &email, &password).await,
        Commands::Logout => {
            account::logout(app);
            Ok(())
        }
        Commands::Status => {
            account::status(app);
            Ok(())
        }
        Commands::Sessions => sessions::list_sessions(app).await,
        Commands::History { session_id } => sessions::show_history(app, &session_id).await,
        Commands::Research { topic, analysts } => {
            research::start_research(app, &topic, analysts).await
        }
        Commands::Feedback {
            session_id,
            feedback,
        } => research::send_feedback(app, &session_id, &feedback).await,
    }
}

/// Fail unless a bearer token is available
fn require_sign_in(app: &AppState) -> Result<()> {
    if !app.auth.get().is_authenticated {
        bail!("Not authenticated. Run `research-sync login` first.");
    }
    Ok(())
}

/// Fail with the error the chat store recorded for the last action
fn check_chat_error(app: &AppState) -> Result<()> {
    match app.chat.get().error {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}
