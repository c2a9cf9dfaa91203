use std::{io::Write as _, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, ActionOutcome, CatalogClient, CatalogController, MemorySurface, UiAction,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{parse_film_id, parse_line, PromptCommand, HELP};

type Controller = CatalogController<CatalogClient, MemorySurface>;

#[derive(Parser, Debug)]
#[command(name = "box_office", about = "Browse the film catalog and buy tickets")]
struct Args {
    /// Catalog server, e.g. http://localhost:3000
    #[arg(long)]
    base_url: Option<String>,
    /// TOML settings file (defaults to ./box_office.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and print the first film and the menu
    Show,
    /// Show one film's details
    Select { id: String },
    /// Buy one ticket for the given film, or the first one
    Buy { id: Option<String> },
    /// Delete a film from the catalog
    Delete { id: String },
    /// Read commands from stdin (default)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    init_tracing(&settings.log_filter);

    let api = CatalogClient::new(&settings.base_url).context("invalid catalog base url")?;
    info!(base_url = %api.base_url(), "box office starting");
    let controller = CatalogController::new(Arc::new(api), MemorySurface::new());

    report(controller.bootstrap().await);

    match args.command.unwrap_or(Command::Interactive) {
        Command::Show => {}
        Command::Select { id } => {
            let id = parse_film_id(&id).map_err(anyhow::Error::msg)?;
            report(controller.handle(UiAction::SelectFilm(id)).await);
        }
        Command::Buy { id } => {
            if let Some(id) = id {
                let id = parse_film_id(&id).map_err(anyhow::Error::msg)?;
                report(controller.handle(UiAction::SelectFilm(id)).await);
            }
            report(controller.handle(UiAction::BuyTicket).await);
        }
        Command::Delete { id } => {
            let id = parse_film_id(&id).map_err(anyhow::Error::msg)?;
            report(controller.handle(UiAction::DeleteFilm(id)).await);
        }
        Command::Interactive => return interactive(&controller).await,
    }

    print_surface(&controller).await;
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn interactive(controller: &Controller) -> Result<()> {
    print_surface(controller).await;
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line) {
            Ok(PromptCommand::Action(action)) => {
                report(controller.handle(action).await);
                print_surface(controller).await;
            }
            Ok(PromptCommand::List) => print_surface(controller).await,
            Ok(PromptCommand::Help) => println!("{HELP}"),
            Ok(PromptCommand::Quit) => break,
            Ok(PromptCommand::Empty) => {}
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}

// Failures were already logged by the controller.
fn report(outcome: ActionOutcome) {
    match outcome {
        ActionOutcome::Purchased(receipt) => println!(
            "Ticket purchased for film {} ({} left)",
            receipt.film_id, receipt.available
        ),
        ActionOutcome::Ignored(reason) => println!("Nothing to do: {reason}"),
        ActionOutcome::Loaded(_)
        | ActionOutcome::Selected(_)
        | ActionOutcome::Deleted(_)
        | ActionOutcome::Failed(_) => {}
    }
}

async fn print_surface(controller: &Controller) {
    let mut surface = controller.surface().lock().await;
    for notice in surface.take_notices() {
        println!("** {notice} **");
    }
    print!("{}", surface.render_text());
}
