//! Interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use ireno_application::SubmitOutcome;
use ireno_core::backend::SopSearchRequest;
use ireno_infrastructure::ExportOutcome;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::export::default_export_dir;
use crate::bootstrap::App;
use crate::render;

const COMMANDS: &[(&str, &str)] = &[
    ("/help", "show this help"),
    ("/new", "start a new conversation"),
    ("/list", "list conversations"),
    ("/open", "<n> open conversation n from /list"),
    ("/rename", "<title> rename the active conversation"),
    ("/pin", "pin or unpin the active conversation"),
    ("/delete", "[n] delete conversation n, or the active one"),
    ("/clear", "delete every conversation"),
    ("/prompts", "list quick-start prompts"),
    ("/prompt", "<n|id> start a conversation from a quick prompt"),
    ("/search", "<query> search the SOP documents"),
    ("/status", "show backend status"),
    ("/export", "[dir] export conversations to JSON"),
    ("/theme", "toggle light/dark theme"),
    ("/sidebar", "toggle the conversation list"),
    ("/logout", "log out and drop all conversations"),
];

/// Completion and hints for slash commands.
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, _)| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|(cmd, _)| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|(cmd, _)| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

type ChatEditor = Editor<ChatHelper, DefaultHistory>;

/// Whether the REPL keeps going after a line.
enum Flow {
    Continue,
    Quit,
}

pub async fn run(app: &App) -> Result<()> {
    let mut rl: ChatEditor = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== IRENO Smart Assistant ===".bright_magenta().bold());
    if !app.persistence_enabled() {
        println!(
            "{}",
            "Storage is unavailable; this session will not be saved.".yellow()
        );
    }

    if !login(app, &mut rl).await? {
        return Ok(());
    }

    let state = app.service.snapshot().await;
    if state.sidebar_open {
        render::print_conversation_list(&state);
    }
    render::print_transcript(&state);
    println!(
        "{}",
        "Ask a question, type /help for commands, or 'quit' to exit.".bright_black()
    );

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let flow = if trimmed == "quit" || trimmed == "exit" {
                    Flow::Quit
                } else if trimmed.starts_with('/') {
                    handle_command(app, &mut rl, trimmed).await?
                } else {
                    submit(app, trimmed).await;
                    Flow::Continue
                };
                if let Flow::Quit = flow {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Asks for a role and a name until the user is logged in. Returns `false`
/// if the user quit instead.
async fn login(app: &App, rl: &mut ChatEditor) -> Result<bool> {
    let state = app.service.snapshot().await;
    if let Some(user) = &state.user {
        println!("{}", format!("Welcome back, {}.", user.display_name).bright_green());
        return Ok(true);
    }

    println!("Select your role:");
    for (index, role) in state.user_roles.iter().enumerate() {
        println!(
            "  {}. {} {}",
            index + 1,
            role.label.bold(),
            format!("- {}", role.description).bright_black()
        );
    }

    loop {
        let choice = match rl.readline("role> ") {
            Ok(choice) => choice,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        let choice = choice.trim();
        if choice == "quit" || choice == "exit" {
            return Ok(false);
        }

        let role_id = match choice.parse::<usize>() {
            Ok(n) if n >= 1 => state.user_roles.get(n - 1).map(|r| r.id.clone()),
            _ => state.role(choice).map(|r| r.id.clone()),
        };
        let Some(role_id) = role_id else {
            println!("{}", "Unknown role, pick a number from the list.".yellow());
            continue;
        };

        let name = match rl.readline("name> ") {
            Ok(name) => name,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        let user = app.service.login(&role_id, &name).await?;
        println!(
            "{}",
            format!("Logged in as {} ({}).", user.display_name, user.role).bright_green()
        );
        return Ok(true);
    }
}

async fn submit(app: &App, text: &str) {
    println!("{}", "assistant is typing...".bright_black());
    let outcome = app.service.submit(text).await;
    print_outcome(outcome);
}

fn print_outcome(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Empty => {}
        SubmitOutcome::Busy => {
            println!("{}", "Still waiting for the previous answer.".yellow());
        }
        SubmitOutcome::Replied(reply) => {
            render::print_message(&reply.message);
            if let Some(chart) = &reply.chart {
                render::print_chart(chart);
            }
        }
    }
}

async fn handle_command(app: &App, rl: &mut ChatEditor, line: &str) -> Result<Flow> {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    let service = &app.service;

    match command {
        "/help" => {
            for (cmd, help) in COMMANDS {
                println!("  {:<10} {}", cmd.bright_cyan(), help);
            }
        }
        "/new" => {
            service.new_chat().await;
            println!("{}", "Started a new conversation.".bright_green());
        }
        "/list" => render::print_conversation_list(&service.snapshot().await),
        "/open" => match conversation_at(app, arg).await {
            Some(id) => {
                service.select(Some(id.as_str())).await?;
                render::print_transcript(&service.snapshot().await);
            }
            None => println!("{}", "No such conversation; see /list.".yellow()),
        },
        "/rename" => match active_id(app).await {
            Some(id) if !arg.is_empty() => {
                service.rename(&id, arg).await?;
                println!("{}", format!("Renamed to \"{arg}\".").bright_green());
            }
            Some(_) => println!("{}", "Usage: /rename <title>".yellow()),
            None => println!("{}", "No active conversation.".yellow()),
        },
        "/pin" => match active_id(app).await {
            Some(id) => {
                let pinned = service.toggle_pin(&id).await?;
                let word = if pinned { "Pinned" } else { "Unpinned" };
                println!("{}", format!("{word}.").bright_green());
            }
            None => println!("{}", "No active conversation.".yellow()),
        },
        "/delete" => {
            let target = if arg.is_empty() {
                active_id(app).await
            } else {
                conversation_at(app, arg).await
            };
            match target {
                Some(id) => {
                    service.delete(&id).await;
                    println!("{}", "Conversation deleted.".bright_green());
                }
                None => println!("{}", "No such conversation; see /list.".yellow()),
            }
        }
        "/clear" => {
            if confirm(rl, "Delete every conversation? (yes/no) ")? {
                service.clear_all().await;
                println!("{}", "All conversations deleted.".bright_green());
            }
        }
        "/prompts" => {
            let state = service.snapshot().await;
            for (index, prompt) in state.quick_prompts.iter().enumerate() {
                println!(
                    "  {}. {} {}",
                    index + 1,
                    prompt.title.bold(),
                    format!("[{}]", prompt.category).bright_black()
                );
            }
        }
        "/prompt" => {
            let state = service.snapshot().await;
            let prompt_id = match arg.parse::<usize>() {
                Ok(n) if n >= 1 => state.quick_prompts.get(n - 1).map(|p| p.id.clone()),
                _ => state.quick_prompt(arg).map(|p| p.id.clone()),
            };
            match prompt_id {
                Some(prompt_id) => {
                    println!("{}", "assistant is typing...".bright_black());
                    print_outcome(service.start_from_prompt(&prompt_id).await?);
                }
                None => println!("{}", "No such prompt; see /prompts.".yellow()),
            }
        }
        "/search" => {
            if arg.is_empty() {
                println!("{}", "Usage: /search <query>".yellow());
            } else {
                match service.search_documents(&SopSearchRequest::new(arg)).await {
                    Ok(response) => render::print_search_results(&response),
                    Err(e) => println!("{}", format!("Search failed: {e}").red()),
                }
            }
        }
        "/status" => super::status::print_status(app).await,
        "/export" => {
            let dir = if arg.is_empty() {
                default_export_dir()?
            } else {
                PathBuf::from(arg)
            };
            match service.export(&dir).await? {
                ExportOutcome::Written(path) => {
                    println!("{}", format!("Exported to {}", path.display()).bright_green());
                }
                ExportOutcome::NothingToExport => {
                    println!("{}", "No conversations to export.".yellow());
                }
            }
        }
        "/theme" => {
            let theme = service.toggle_theme().await;
            println!("{}", format!("Theme: {theme}").bright_green());
        }
        "/sidebar" => {
            if service.toggle_sidebar().await {
                render::print_conversation_list(&service.snapshot().await);
            }
        }
        "/logout" => {
            service.logout().await;
            println!("{}", "Logged out.".bright_green());
            if !login(app, rl).await? {
                return Ok(Flow::Quit);
            }
        }
        _ => println!("{}", format!("Unknown command {command}; try /help.").yellow()),
    }

    Ok(Flow::Continue)
}

async fn active_id(app: &App) -> Option<String> {
    app.service.snapshot().await.active_conversation_id
}

/// Resolves a 1-based index from `/list` to a conversation id.
async fn conversation_at(app: &App, arg: &str) -> Option<String> {
    let index = arg.parse::<usize>().ok()?.checked_sub(1)?;
    let state = app.service.snapshot().await;
    state
        .sidebar_conversations()
        .get(index)
        .map(|c| c.id.clone())
}

fn confirm(rl: &mut ChatEditor, prompt: &str) -> Result<bool> {
    match rl.readline(prompt) {
        Ok(answer) => Ok(matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
