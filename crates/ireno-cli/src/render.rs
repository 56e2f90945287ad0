//! Terminal rendering of messages, charts and lists.

use colored::Colorize;
use ireno_core::backend::{ChartPayload, SopSearchResponse};
use ireno_core::conversation::{Message, MessageRole};
use ireno_core::state::AppState;

const BAR_WIDTH: usize = 30;

pub fn print_message(message: &Message) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content).green()),
        MessageRole::Assistant => {
            for line in message.display_content().lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn print_transcript(state: &AppState) {
    let Some(conversation) = state.active_conversation() else {
        return;
    };
    println!("{}", format!("── {} ──", conversation.title).bright_magenta());
    for message in &conversation.messages {
        print_message(message);
    }
}

pub fn print_chart(chart: &ChartPayload) {
    let title = chart.title.as_deref().unwrap_or("Collector status");
    println!("{}", title.bold());

    let total = chart.total();
    let label_width = chart
        .chart_data
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0);
    for point in &chart.chart_data {
        let share = point
            .percentage
            .unwrap_or_else(|| percent(point.value, total));
        println!(
            "  {:<width$} {} {:>6} ({:.1}%)",
            point.name,
            bar(point.value, total, BAR_WIDTH).cyan(),
            point.value,
            share,
            width = label_width
        );
    }
    if let Some(uptime) = chart.uptime_percentage {
        println!("  {}", format!("Uptime: {uptime:.2}%").bright_black());
    }
}

/// Conversations in sidebar order, numbered from 1.
pub fn print_conversation_list(state: &AppState) {
    let conversations = state.sidebar_conversations();
    if conversations.is_empty() {
        println!("{}", "No conversations yet.".bright_black());
        return;
    }
    for (index, conversation) in conversations.iter().enumerate() {
        let active = state.active_conversation_id.as_deref() == Some(conversation.id.as_str());
        let marker = if active { ">" } else { " " };
        let pin = if conversation.pinned { "*" } else { " " };
        let line = format!(
            "{marker}{pin}{:>3}. {} ({} messages)",
            index + 1,
            conversation.title,
            conversation.messages.len()
        );
        if active {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }
}

pub fn print_search_results(response: &SopSearchResponse) {
    if let Some(message) = &response.message {
        println!("{}", message.bright_black());
    }
    for (index, result) in response.results.iter().enumerate() {
        let number = result.result_number.map(|n| n as usize).unwrap_or(index + 1);
        let source = result.file_source.as_deref().unwrap_or("");
        println!("{} {}", format!("[{number}]").yellow(), source.bright_black());
        println!("    {}", result.snippet);
    }
}

fn percent(value: f64, total: f64) -> f64 {
    if total <= 0.0 { 0.0 } else { value / total * 100.0 }
}

fn bar(value: f64, total: f64, width: usize) -> String {
    let filled = ((percent(value, total) / 100.0) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_is_proportional() {
        assert_eq!(bar(50.0, 100.0, 10).chars().count(), 5);
        assert_eq!(bar(100.0, 100.0, 10).chars().count(), 10);
        assert_eq!(bar(1.0, 0.0, 10), "");
    }

    #[test]
    fn test_percent_handles_empty_total() {
        assert_eq!(percent(3.0, 0.0), 0.0);
        assert_eq!(percent(1.0, 4.0), 25.0);
    }
}
