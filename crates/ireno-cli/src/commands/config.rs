use anyhow::{Context, Result};
use colored::Colorize;
use ireno_core::config::AppConfig;
use ireno_infrastructure::ConfigService;

/// Whether [`init`] wrote a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Written,
    AlreadyExists,
}

/// Writes the default settings to the config file. An existing file is left
/// alone unless `force` is set.
pub fn init(service: &ConfigService, force: bool) -> Result<InitOutcome> {
    if service.path().exists() && !force {
        return Ok(InitOutcome::AlreadyExists);
    }
    service
        .save(&AppConfig::default())
        .with_context(|| format!("Failed to write {}", service.path().display()))?;
    tracing::info!(path = %service.path().display(), "wrote default config");
    Ok(InitOutcome::Written)
}

pub fn run(service: &ConfigService, force: bool) -> Result<()> {
    match init(service, force)? {
        InitOutcome::Written => println!("Wrote {}", service.path().display()),
        InitOutcome::AlreadyExists => println!(
            "{}",
            format!(
                "{} already exists, use --force to overwrite it.",
                service.path().display()
            )
            .yellow()
        ),
    }
    Ok(())
}
