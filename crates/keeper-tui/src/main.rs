//! Keeper entry point.
//!
//! # Usage
//!
//! ```bash
//! # Terminal UI, optionally starting at a share link
//! keeper
//! keeper ui --open https://share.example/secrets/abc123
//!
//! # Headless
//! echo "db password" | keeper create --ttl 24 --passphrase "open sesame"
//! keeper open https://share.example/secrets/abc123?withSecretPhrase=true --passphrase "open sesame"
//! keeper health
//! ```

use std::{
    io::{self, Read, Write},
    process::ExitCode,
    sync::Arc,
};

use clap::Parser;
use keeper_client::{SecretDraft, transport::HttpGateway};
use keeper_tui::{
    Runtime, TerminalDriver,
    cli::{Args, Command, Settings},
    headless, logging,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) =
        logging::init(&args.settings.log_level, args.settings.log_file.as_deref(), args.is_interactive())
    {
        let _ = writeln!(io::stderr(), "keeper: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }

    match run(&args.settings, args.command()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr(), "keeper: {err}");
            ExitCode::FAILURE
        },
    }
}

async fn run(settings: &Settings, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = HttpGateway::new(&settings.gateway_config())?;
    let mut stdout = io::stdout();

    match command {
        Command::Ui { open } => run_ui(settings, gateway, open).await,
        Command::Create { message, ttl, passphrase } => {
            let message = match message {
                Some(message) => message,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer.trim_end_matches(['\r', '\n']).to_string()
                },
            };
            let draft = SecretDraft { message, ttl_hours: ttl, passphrase };
            headless::create(&gateway, &settings.origin, draft, &mut stdout).await?;
            Ok(())
        },
        Command::Open { link, passphrase } => {
            headless::open(
                &gateway,
                &link,
                passphrase.as_deref(),
                settings.distinguish_failures,
                &mut stdout,
            )
            .await?;
            Ok(())
        },
        Command::Health => Ok(headless::health(&gateway, &mut stdout).await?),
    }
}

async fn run_ui(
    settings: &Settings,
    gateway: HttpGateway,
    open: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(api_url = %gateway.api_url(), "keeper starting");
    match gateway.health().await {
        Ok(body) if body.is_ok() => info!("backend healthy"),
        Ok(body) => warn!(status = %body.status, "backend reports unhealthy"),
        Err(err) => warn!(%err, "backend health probe failed"),
    }

    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(driver, Arc::new(gateway), settings.app_config());
    if let Some(location) = open
        && runtime.open(&location)?
    {
        return Ok(());
    }

    runtime.run().await?;
    Ok(())
}
