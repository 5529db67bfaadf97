// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;
mod output;

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands, ReplCommand};
use output::{render_message, render_modes, write_stderr, write_stdout};
use terrachat_config::{Config, Mode};
use terrachat_core::{
    Conversation, FixedLocation, LocationSource, SendError, TurnOutcome, UnavailableLocation,
};
use terrachat_model::{ModelProvider, MODE_PROFILES};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Subcommands that exit before any provider is built
    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Completions { shell } => {
                cli::print_completions(*shell);
                return Ok(());
            }
            Commands::ShowConfig => {
                let mut config = terrachat_config::load(cli.config.as_deref())?;
                if config.model.api_key.is_some() {
                    config.model.api_key = Some("<redacted>".into());
                }
                println!("{}", serde_yaml::to_string(&config)?);
                return Ok(());
            }
            Commands::Modes { json } => {
                return list_modes_cmd(*json);
            }
        }
    }

    let config = terrachat_config::load(cli.config.as_deref())?;
    let provider = terrachat_model::from_config(&config.model)
        .context("building model provider")?;

    let mut conv = Conversation::new(cli.mode.unwrap_or(config.chat.default_mode));
    let location = location_source(&cli, &config)?;
    let status = conv.request_location(location.as_ref()).await;
    debug!(provider = provider.name(), mode = %conv.mode(), location = status.label(), "session ready");

    match cli.prompt.as_deref() {
        Some(prompt) => run_once(&mut conv, provider.as_ref(), prompt).await,
        None => run_repl(&mut conv, provider.as_ref(), location.as_ref()).await,
    }
}

/// CLI coordinates win over `[chat.location]`; with neither the session runs
/// without a location.
fn location_source(cli: &Cli, config: &Config) -> anyhow::Result<Box<dyn LocationSource>> {
    let coords = cli
        .coordinates()
        .or_else(|| config.chat.location.map(|l| (l.latitude, l.longitude)));
    match coords {
        Some((lat, lon)) => {
            let src = FixedLocation::new(lat, lon).context("invalid location")?;
            Ok(Box::new(src))
        }
        None => Ok(Box::new(UnavailableLocation)),
    }
}

async fn run_once(
    conv: &mut Conversation,
    provider: &dyn ModelProvider,
    prompt: &str,
) -> anyhow::Result<()> {
    let outcome = conv.send(provider, prompt).await?;
    if let Some(msg) = conv.messages().last() {
        write_stdout(&render_message(msg));
    }
    if outcome == TurnOutcome::Failed {
        anyhow::bail!("request failed; run with -v for details");
    }
    Ok(())
}

async fn run_repl(
    conv: &mut Conversation,
    provider: &dyn ModelProvider,
    location: &dyn LocationSource,
) -> anyhow::Result<()> {
    let interactive = std::io::stdin().is_terminal();
    if interactive {
        write_stderr(&format!(
            "TerraChat [{}] {}. Type /quit to exit.",
            conv.mode(),
            conv.location().label()
        ));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            write_stdout("> ");
        }
        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };
        let line = line.trim();

        if let Some(command) = ReplCommand::parse(line) {
            match command {
                ReplCommand::Quit => break,
                ReplCommand::Reset => {
                    conv.reset();
                    write_stderr("Conversation cleared.");
                }
                ReplCommand::Mode(None) => write_stderr(&format!("Current mode: {}", conv.mode())),
                ReplCommand::Mode(Some(name)) => match name.parse::<Mode>() {
                    Ok(mode) => {
                        conv.set_mode(mode);
                        write_stderr(&format!("Mode: {mode}"));
                    }
                    Err(e) => write_stderr(&e),
                },
                ReplCommand::Location => {
                    let status = conv.request_location(location).await;
                    write_stderr(status.label());
                }
                ReplCommand::Help => write_stderr(ReplCommand::HELP),
            }
            continue;
        }

        match conv.send(provider, line).await {
            Ok(_) => {
                if let Some(msg) = conv.messages().last() {
                    write_stdout(&render_message(msg));
                }
            }
            Err(SendError::EmptyMessage) => {}
            Err(e) => write_stderr(&e.to_string()),
        }
    }
    Ok(())
}

fn list_modes_cmd(as_json: bool) -> anyhow::Result<()> {
    if as_json {
        #[derive(serde::Serialize)]
        struct ModeJson {
            id: Mode,
            label: &'static str,
            model: &'static str,
            description: &'static str,
            location_tools: bool,
        }
        let rows: Vec<ModeJson> = MODE_PROFILES
            .iter()
            .map(|p| ModeJson {
                id: p.mode,
                label: p.label,
                model: p.model,
                description: p.description,
                location_tools: p.location_tools,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    print!("{}", render_modes());
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
