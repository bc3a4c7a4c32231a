use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use chat_client::app::App;
use chat_client::client::ContractVersion;
use chat_client::config::Config;
use chat_client::tui::{self, EventHandler, Tui};
use chat_client::{handler, logging, ui};

#[derive(Parser)]
#[command(name = "chat")]
#[command(about = "Chat with a local inference endpoint from the terminal")]
#[command(version)]
struct Cli {
    /// Chat endpoint URL (overrides the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Which response field the endpoint uses
    #[arg(long, value_enum)]
    contract: Option<ContractVersion>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(contract) = self.contract {
            config.contract = contract;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    let config = cli.load_config()?;
    tracing::info!(endpoint = %config.endpoint, contract = ?config.contract, "starting chat");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &config).await;

    tui::restore()?;
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "chat exited with an error");
    }
    result
}

async fn run(terminal: &mut Tui, config: &Config) -> Result<()> {
    let mut events = EventHandler::new();
    let mut app = App::new(config, events.sender());

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;
        app.input.mount();

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event)?,
            None => break,
        }
    }

    Ok(())
}
