//! Command-line front end for the short link management API.
//!
//! # Usage
//!
//! ```bash
//! export SLMS_TOKEN=...
//! slms list --page 0 --size 20
//! slms create https://rust-lang.org rust
//! slms modify 3 --root https://www.rust-lang.org
//! slms delete rust
//! slms copy rust
//! ```
//!
//! Every API command logs in first with `SLMS_TOKEN`; the session cookie
//! carries the rest of the call. Failures are published on the `main-error`
//! topic and printed to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use slms_core::{
    parse_link, ClientConfig, ClipboardHelper, Credentials, ErrorReporter, Event, EventBus,
    HttpResponse, LinkId, LinkRequests, LinkServiceClient, PageQuery, ReqwestTransport, RestError,
    SystemClipboard, MAIN_ERROR_TOPIC,
};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slms")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Api(ApiCommand),
    /// Copy the public URL of a short link to the clipboard
    Copy { short: String },
}

/// Commands that talk to the API.
#[derive(Subcommand)]
enum ApiCommand {
    /// List short links
    List {
        /// Page index; negative values leave it to the server
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        page: i64,
        /// Page size; zero or less leaves it to the server
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        size: i64,
    },
    /// Check that the token is accepted
    Login,
    /// Create a short link; the server picks an alias when SHORT is omitted
    Create { root: String, short: Option<String> },
    /// Change the root link or the alias of an existing short link
    Modify {
        id: String,
        /// New root link; left unchanged when omitted
        #[arg(long)]
        root: Option<String>,
        /// New alias; left unchanged when omitted
        #[arg(long)]
        short: Option<String>,
    },
    /// Delete a short link by id or alias
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("Failed to load client configuration")?;

    let command = match cli.command {
        Commands::Copy { short } => {
            let mut helper = ClipboardHelper::new(&config.page_origin(), SystemClipboard::new());
            let url = helper.copy_short_link(&short)?;
            println!("copied {url}");
            return Ok(());
        }
        Commands::Api(command) => command,
    };

    let credentials = config.credentials()?.clone();

    let bus = EventBus::new();
    let mut errors = bus.subscribe();
    let reporter = ErrorReporter::new(bus);

    let transport = ReqwestTransport::new(config.origin.clone())?;
    let client = LinkServiceClient::new(LinkRequests::new(&config.base_uri(), Vec::new()), transport);

    let outcome = run(&client, &credentials, command).await;
    if let Err(err) = &outcome {
        reporter.report(err);
    }
    print_errors(&mut errors);

    if outcome.is_err() {
        bail!("request failed");
    }
    Ok(())
}

async fn run(
    client: &LinkServiceClient<ReqwestTransport>,
    credentials: &Credentials,
    command: ApiCommand,
) -> Result<(), RestError> {
    client.login(credentials).await?;

    match command {
        ApiCommand::Login => println!("login ok"),
        ApiCommand::List { page, size } => {
            let response = client.list_links(PageQuery::from_raw(page, size)).await?;
            println!("{}", response.body);
        }
        ApiCommand::Create { root, short } => {
            let response = client
                .create_link(&root, short.as_deref().unwrap_or_default())
                .await?;
            print_link(&response);
        }
        ApiCommand::Modify { id, root, short } => {
            // An empty field tells the server to keep the current value.
            let response = client
                .modify_link(
                    &LinkId::from(id.as_str()),
                    root.as_deref().unwrap_or_default(),
                    short.as_deref().unwrap_or_default(),
                )
                .await?;
            print_link(&response);
        }
        ApiCommand::Delete { id } => {
            client.delete_link(&LinkId::from(id.as_str())).await?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn print_link(response: &HttpResponse) {
    match parse_link(response) {
        Ok(link) => println!("{} -> {} (id {})", link.short_link, link.root_link, link.id),
        Err(_) => println!("{}", response.body),
    }
}

fn print_errors(rx: &mut broadcast::Receiver<Event>) {
    while let Ok(event) = rx.try_recv() {
        if event.topic == MAIN_ERROR_TOPIC {
            eprintln!("error: {}", event.payload);
        }
    }
}
