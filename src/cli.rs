// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use terrachat_config::Mode;

#[derive(Parser, Debug)]
#[command(
    name = "terrachat",
    about = "Location-aware chat client with maps and search grounding",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single prompt and exit; omit to start an interactive session
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Conversation mode (defaults to `chat.default_mode` from config)
    #[arg(long, short = 'm', value_enum)]
    pub mode: Option<Mode>,

    /// Latitude of the current location
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the current location
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Path to config file (merged on top of auto-discovered files)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// List conversation modes
    Modes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Coordinates given on the command line, if both were supplied.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

/// Interactive-session command.  Lines that are not one of these are sent as
/// chat messages, including ones that merely start with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Reset,
    /// `/mode` with the requested mode name, if one was given
    Mode(Option<String>),
    Location,
    Help,
}

impl ReplCommand {
    pub const HELP: &'static str =
        "Commands: /mode [explorer|reasoning], /reset, /location, /help, /quit";

    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.trim().strip_prefix('/')?.split_whitespace();
        let cmd = match words.next()? {
            "quit" | "exit" => Self::Quit,
            "reset" => Self::Reset,
            "mode" => Self::Mode(words.next().map(str::to_string)),
            "location" => Self::Location,
            "help" => Self::Help,
            _ => return None,
        };
        Some(cmd)
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "terrachat", &mut std::io::stdout());
}
