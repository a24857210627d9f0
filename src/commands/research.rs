use colored::Colorize;

use super::require_sign_in;
use crate::api::FeedbackOutcome;
use crate::app::AppState;
use crate::error::Result;

pub async fn start_research(app: &AppState, topic: &str, analysts: u32) -> Result<()> {
    require_sign_in(app)?;
    tracing::info!("Starting research on {:?} with {} analysts", topic, analysts);

    let started = app.chat.start_new_research(topic, analysts).await?;

    println!(
        "{}",
        format!("Research session {} started", started.session_id).green()
    );
    println!("{}", serde_json::to_string_pretty(&started.analysts)?);
    println!();
    println!(
        "Reply with {} or describe changes to the analysts.",
        format!("research-sync feedback {} approve", started.session_id).cyan()
    );
    Ok(())
}

pub async fn send_feedback(app: &AppState, session_id: &str, feedback: &str) -> Result<()> {
    require_sign_in(app)?;

    let data = app.chat.submit_analyst_feedback(session_id, feedback).await?;
    let outcome = FeedbackOutcome::from_value(&data);

    match &outcome.result {
        serde_json::Value::String(report) => println!("{}", report),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    if let Some(usage) = &outcome.token_usage {
        tracing::debug!("Token usage: {}", usage);
    }
    Ok(())
}
