//! CLI for ChatCast
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `listen`: open an event stream and print every message (useful for smoke tests)
//! - `say`: submit one chat message

use std::process::ExitCode;

use chatcast::broker::Hub;
use chatcast::config::load_config;
use chatcast::transport::frame::FrameDecoder;
use chatcast::transport::start_http_server;
use chatcast::utils::{Result, logging};
use clap::Parser;
use futures_util::StreamExt;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chatcast")]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Open an event stream and print each message as it arrives
    Listen {
        /// Base URL of the server
        #[arg(long, env = "CHATCAST_URL", default_value = "http://127.0.0.1:3000")]
        url: String,
    },
    /// Submit one chat message
    Say {
        /// Base URL of the server
        #[arg(long, env = "CHATCAST_URL", default_value = "http://127.0.0.1:3000")]
        url: String,
        /// Message text; may be empty
        #[arg(default_value = "")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cmd = Command::parse();

    let result = match cmd {
        Command::Serve => run_server().await,
        Command::Listen { url } => {
            logging::init("info");
            run_listener(&url).await
        }
        Command::Say { url, message } => {
            logging::init("info");
            run_say(&url, &message).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server() -> Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            return Err(e.into());
        }
    };
    logging::init(&config.log.level);

    let hub = Hub::new();

    tokio::select! {
        res = start_http_server(hub, config) => {
            res?;
            error!("HTTP server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_listener(url: &str) -> Result<()> {
    let response = reqwest::get(format!("{}/sse", url.trim_end_matches('/')))
        .await?
        .error_for_status()?;
    info!("Connected to {url}, waiting for messages");

    let mut body = response.bytes_stream();
    let mut decoder = FrameDecoder::new();
    while let Some(chunk) = body.next().await {
        for message in decoder.push(&chunk?) {
            println!("{message}");
        }
    }

    info!("Server closed the stream");
    Ok(())
}

async fn run_say(url: &str, message: &str) -> Result<()> {
    reqwest::Client::new()
        .get(format!("{}/chat", url.trim_end_matches('/')))
        .query(&[("message", message)])
        .send()
        .await?
        .error_for_status()?;
    info!("Message sent");
    Ok(())
}
