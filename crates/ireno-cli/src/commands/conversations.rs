use colored::Colorize;

use crate::bootstrap::App;
use crate::render;

pub async fn list(app: &App) {
    render::print_conversation_list(&app.service.snapshot().await);
}

/// Deletes every conversation. The backend memory reset is best effort.
pub async fn reset(app: &App) {
    let count = app.service.snapshot().await.conversations.len();
    app.service.clear_all().await;
    println!(
        "{}",
        format!("Deleted {count} conversation(s).").bright_green()
    );
}
