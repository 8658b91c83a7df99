use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;

use tapbots::config::{BotCommand, Cli, DropGameSettings, MemefiSettings};
use tapbots::drop_game::{self, blum::BlumClient, tomarket::TomarketClient};
use tapbots::memefi::{GraphqlClient, MemefiBot};
use tapbots::{BotError, ConfigError};

#[tokio::main]
async fn main() -> ExitCode {
    tapbots::init_tracing();

    let cli = Cli::parse();
    match run(cli.bot).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(bot: BotCommand) -> Result<(), BotError> {
    match bot {
        BotCommand::Memefi(args) => {
            let token = resolve_token(args.token.as_deref(), "Enter your JWT token: ")?;
            let settings = MemefiSettings::from_args(&args, &token)?;
            let client = GraphqlClient::new(&settings.url, &settings.token)?;
            MemefiBot::new(client, settings).run().await
        }
        BotCommand::Blum(args) => {
            let token = resolve_token(args.token.as_deref(), "Enter your access token: ")?;
            let settings = DropGameSettings::from_blum_args(&args, &token)?;
            let client = BlumClient::new(&settings.url, &settings.token)?;
            let rounds = drop_game::run(&client, &settings).await?;
            tracing::info!("Blum: played {rounds} rounds");
            Ok(())
        }
        BotCommand::Tomarket(args) => {
            let token = resolve_token(args.token.as_deref(), "Enter your access token: ")?;
            let settings = DropGameSettings::from_tomarket_args(&args, &token)?;
            let client = TomarketClient::new(&settings.url, &settings.token)?;
            if settings.claim_hidden_tasks {
                let claimed = client.claim_hidden_tasks().await?;
                tracing::info!("Tomarket: claimed {claimed} hidden tasks");
            }
            let rounds = drop_game::run(&client, &settings).await?;
            tracing::info!("Tomarket: played {rounds} rounds");
            Ok(())
        }
    }
}

/// Use the flag/env token, or ask for one on stdin.
fn resolve_token(flag: Option<&str>, prompt: &str) -> Result<String, ConfigError> {
    if let Some(token) = flag {
        return Ok(token.to_string());
    }
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|_| ConfigError::EmptyToken)?;
    Ok(line.trim().to_string())
}
