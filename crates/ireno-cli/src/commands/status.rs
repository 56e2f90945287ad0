use anyhow::Result;
use colored::Colorize;

use crate::bootstrap::App;

pub async fn run(app: &App) -> Result<()> {
    print_status(app).await;
    Ok(())
}

/// Prints backend health, system status and local session facts. Backend
/// failures are shown inline.
pub async fn print_status(app: &App) {
    println!("Backend: {}", app.config.backend.base_url);

    match app.service.health().await {
        Ok(health) if health.is_healthy() => println!("  health: {}", health.status.green()),
        Ok(health) => {
            println!("  health: {}", health.status.red());
            if !health.details.is_empty() {
                let details = serde_json::to_string(&health.details).unwrap_or_default();
                println!("  {}", details.bright_black());
            }
        }
        Err(e) => println!("  health: {}", format!("unreachable ({e})").red()),
    }

    match app.service.system_status().await {
        Ok(status) => {
            println!("  chat system: {}", status.chat_system);
            println!("  data source: {}", status.data_source);
            println!("  collectors: {}", status.total_collectors);
            println!("  zones: {}", status.zones_available);
        }
        Err(e) => println!("  system status: {}", format!("unavailable ({e})").red()),
    }

    let state = app.service.snapshot().await;
    println!("Session:");
    match &state.user {
        Some(user) => println!("  user: {} ({})", user.display_name, user.role),
        None => println!("  user: {}", "not logged in".bright_black()),
    }
    println!("  conversations: {}", state.conversations.len());
    println!("  theme: {}", state.theme);
    let persistence = if app.persistence_enabled() {
        "enabled".green()
    } else {
        "disabled".yellow()
    };
    println!("  persistence: {persistence}");
}
