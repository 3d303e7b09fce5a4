// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 wifi-password Contributors

// wifi-password - CLI
// Prints the name and saved password of the Wi-Fi network you are on

mod config;
mod output;

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wifi_password_common::error::EXIT_FAILURE;
use wifi_password_common::{Error, WifiPassword};

use config::Settings;
use output::Format;

#[derive(Parser, Debug)]
#[command(name = "wifi-password")]
#[command(about = "Show the password of the Wi-Fi network you are connected to", long_about = None)]
#[command(version)]
struct Cli {
    /// Look up this network instead of the current one
    ssid: Option<String>,

    /// Print only the password
    #[arg(short, long)]
    quiet: bool,

    /// Output as JSON for scripting
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// Wireless interface to query (default: en0 on macOS, any on Linux/Windows)
    #[arg(short, long)]
    interface: Option<String>,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else if self.quiet {
            Format::Quiet
        } else {
            Format::Plain
        }
    }
}

fn main() -> ExitCode {
    // --help and --version exit 0 here, usage errors exit 2
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let settings = match Settings::load(cli.interface.clone()) {
        Ok(settings) => settings,
        Err(e) => return report(&e, io::stderr().is_terminal()),
    };
    debug!("Effective settings: {:?}", settings);

    let result = WifiPassword::for_current_platform(settings.interface.clone())
        .map_err(anyhow::Error::from)
        .and_then(|service| {
            let color = settings.use_color(io::stdout().is_terminal());
            run(&service, &cli, color, &mut io::stdout().lock())
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, settings.use_color(io::stderr().is_terminal())),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "wifi_password=info,wifi_password_common=info",
        _ => "wifi_password=debug,wifi_password_common=debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Look up the credential and write it to `out`
///
/// A network without a stored key is still written (SSID only), then
/// reported as `Error::NotFound`.
fn run<W: Write>(service: &WifiPassword, cli: &Cli, color: bool, out: &mut W) -> Result<()> {
    let credential = service.lookup(cli.ssid.as_deref())?;

    let text = output::render(&credential, cli.format(), color)?;
    if !text.is_empty() {
        writeln!(out, "{}", text).context("Failed to write output")?;
    }

    if !credential.has_password() {
        return Err(Error::NotFound(credential.ssid.clone()).into());
    }

    Ok(())
}

fn report(error: &anyhow::Error, color: bool) -> ExitCode {
    let (line, code) = failure(error, color);
    eprintln!("{}", line);
    ExitCode::from(code)
}

/// stderr line and exit status for an error that reached `main`
fn failure(error: &anyhow::Error, color: bool) -> (String, u8) {
    (
        output::error_line(&format!("{:#}", error), color),
        exit_code_for(error),
    )
}

/// Exit status for an error that reached `main`
fn exit_code_for(error: &anyhow::Error) -> u8 {
    let code = error
        .downcast_ref::<Error>()
        .map(Error::exit_code)
        .unwrap_or(EXIT_FAILURE);
    u8::try_from(code).unwrap_or(1)
}
