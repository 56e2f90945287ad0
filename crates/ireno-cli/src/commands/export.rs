use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use ireno_infrastructure::ExportOutcome;
use ireno_infrastructure::paths::IrenoPaths;

use crate::bootstrap::App;

pub fn default_export_dir() -> Result<PathBuf> {
    IrenoPaths::export_dir().context("Failed to resolve export directory")
}

pub async fn run(app: &App, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => default_export_dir()?,
    };

    match app.service.export(&dir).await? {
        ExportOutcome::Written(path) => println!("Exported to {}", path.display()),
        ExportOutcome::NothingToExport => {
            println!("{}", "No conversations to export.".yellow());
        }
    }
    Ok(())
}
