use colored::Colorize;
use prettytable::{format, Table};

use super::{check_chat_error, require_sign_in};
use crate::app::AppState;
use crate::error::Result;

/// Print the session list as a table
pub async fn list_sessions(app: &AppState) -> Result<()> {
    require_sign_in(app)?;
    app.chat.load_sessions().await;
    check_chat_error(app)?;

    let sessions = app.chat.get().sessions;
    if sessions.is_empty() {
        println!("{}", "No research sessions found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Created".bold()
    ]);
    for session in sessions {
        table.add_row(prettytable::row![
            session.session_id.cyan(),
            session.session_name,
            session.created_at
        ]);
    }

    println!("\nResearch Sessions:");
    table.printstd();
    println!();
    println!(
        "Use {} to view a session.",
        "research-sync history <ID>".cyan()
    );
    Ok(())
}

/// Print every message of a session
pub async fn show_history(app: &AppState, session_id: &str) -> Result<()> {
    require_sign_in(app)?;
    app.chat.load_session_history(session_id).await;
    check_chat_error(app)?;

    let messages = app.chat.get().current_messages;
    if messages.is_empty() {
        println!("{}", "Session has no messages.".yellow());
        return Ok(());
    }

    for message in messages {
        println!("{} {}", message.created_at.dimmed(), message.message.bold());
        println!("{}\n", message.response);
    }
    Ok(())
}
