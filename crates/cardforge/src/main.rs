//! `cardforge` - build and share a digital business card.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use cardforge::card::PublicCard;
use cardforge::cli::{Cli, Command, ConfigCommand, EditCommand, QrCommand, SessionCommand};
use cardforge::clipboard::SystemClipboard;
use cardforge::dashboard::code_file_name;
use cardforge::render;
use cardforge::router::Navigation;
use cardforge::session::Session;
use cardforge::settings::SaveOutcome;
use cardforge::validate::issues;
use cardforge::{init_logging, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Session(cmd) => handle_session(&config, cmd).await,
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Card => handle_card(&config),
        Command::Edit(cmd) => handle_edit(&config, cmd),
        Command::Avatar(cmd) => {
            let mut app = App::open(&config)?;
            app.import_avatar(&cmd.path)
                .with_context(|| format!("importing {}", cmd.path.display()))?;
            println!("Photo updated.");
            Ok(())
        }
        Command::Qr(cmd) => handle_qr(&config, cmd).await,
        Command::CopyUrl => {
            let app = App::open(&config)?;
            let url = app.copy_url(&mut SystemClipboard)?;
            println!("Copied {url}");
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_session(config: &Config, cmd: SessionCommand) -> Result<()> {
    let app = App::open(config)?;
    let download_dir = match cmd.download_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mut session = Session::new(app, SystemClipboard, download_dir);
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let app = App::open(config)?;
    let problems = issues(app.record());

    if json {
        let status = serde_json::json!({
            "complete": problems.is_empty(),
            "issues": problems.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "initial_view": app.view().to_string(),
            "public_url": app.public_url(),
            "sync": app.sync_status().to_string(),
            "database_path": app.store().path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("cardforge status");
        println!("----------------");
        println!(
            "Complete:      {}",
            if problems.is_empty() { "yes" } else { "no" }
        );
        println!("Opens on:      {}", app.view());
        println!("Public link:   {}", app.public_url());
        println!("Sync:          {}", app.sync_status());
        println!("Database:      {}", app.store().path().display());
        for problem in &problems {
            println!("  - {problem}");
        }
    }
    Ok(())
}

fn handle_card(config: &Config) -> Result<()> {
    let app = App::open(config)?;
    match PublicCard::build(app.record()) {
        Some(card) => print!("{}", render::public_card(&card)),
        None => print!("{}", render::blocked(&issues(app.record()))),
    }
    Ok(())
}

fn handle_edit(config: &Config, cmd: EditCommand) -> Result<()> {
    let mut app = App::open(config)?;
    app.navigate(Navigation::GoSettings);
    for (field, value) in &cmd.assignments {
        app.settings_edit(*field, value);
    }
    if let Some(enabled) = cmd.sync {
        app.settings_set_sync(enabled);
    }

    match app.settings_save()? {
        SaveOutcome::Saved => {
            println!("Saved.");
            Ok(())
        }
        SaveOutcome::Rejected(problems) => {
            for problem in &problems {
                eprintln!("  - {problem}");
            }
            bail!("not saved: the card would be incomplete")
        }
    }
}

async fn handle_qr(config: &Config, cmd: QrCommand) -> Result<()> {
    let mut app = App::open(config)?;
    app.refresh_code();
    app.settle_code().await;

    let path = cmd
        .output
        .unwrap_or_else(|| code_file_name(&app.record().slug).into());
    app.write_code(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Card]");
                println!("  Base URL:       {}", config.card.base_url);
                println!();
                println!("[Code]");
                println!("  Size (px):      {}", config.code.size_px);
                println!("  Quiet zone:     {}", config.code.quiet_zone);
                println!();
                println!("[Sync]");
                println!("  Enabled:        {}", config.sync.enabled);
                println!(
                    "  Endpoint:       {}",
                    config.sync.endpoint.as_deref().unwrap_or("-")
                );
                println!(
                    "  API key:        {}",
                    if config.sync.api_key.is_some() { "set" } else { "-" }
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
