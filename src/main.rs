//! Thinkstream command line
//!
//! `split` renders a model response piped on stdin and records it,
//! `history` replays the recorded conversation, `serve` runs the HTTP API.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;
use thinkstream::api::{create_router, AppState};
use thinkstream::config::Config;
use thinkstream::fragment::decode_utf8;
use thinkstream::history::{HistoryStore, Role};
use thinkstream::render::{TerminalRenderer, Transcript};
use thinkstream::turn::{drive_turn, Termination};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "thinkstream", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a response read from stdin and record the turn in history
    Split {
        /// User message the response answers. Without one, a pending user
        /// message is answered if there is one, otherwise nothing is recorded.
        message: Option<String>,
    },
    /// Replay the recorded conversation
    History,
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides THINKSTREAM_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays the rendered response
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thinkstream=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::from_env()?;

    match cli.command {
        Command::Split { message } => split(&config, message.as_deref()).await,
        Command::History => history(&config),
        Command::Serve { port } => serve(&config, port.unwrap_or(config.port)).await,
    }
}

async fn split(
    config: &Config,
    message: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let delimiters = config.delimiters()?;
    let store = HistoryStore::new(&config.history_path);
    let mut conversation = store.load()?;

    if let Some(text) = message {
        conversation.push_user(text)?;
        store.save(&conversation)?;
    }
    // Without a pending user message the response is only rendered
    let record = conversation.awaiting_reply();

    // Ctrl-C ends the turn early; whatever arrived is still finalized
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let fragments = decode_utf8(ReaderStream::new(tokio::io::stdin()));
    let mut renderer = TerminalRenderer::new(std::io::stdout());
    let outcome = drive_turn(fragments, &delimiters, &mut renderer, &cancel).await;

    if record {
        conversation.push_assistant(&outcome.message, &delimiters)?;
        store.save(&conversation)?;
    }

    match outcome.termination {
        Termination::Completed => {}
        Termination::Cancelled => tracing::info!("Response cancelled, partial output finalized"),
        Termination::Disconnected { reason } => {
            tracing::warn!(%reason, "Input ended with an error, partial output finalized");
        }
    }
    Ok(())
}

fn history(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let delimiters = config.delimiters()?;
    let conversation = HistoryStore::new(&config.history_path).load()?;

    let mut out = std::io::stdout().lock();
    for turn in conversation.turns(&delimiters) {
        match turn.role {
            Role::User => writeln!(out, "you: {}\n", turn.answer_text)?,
            Role::Assistant => writeln!(out, "{}\n", Transcript::from_message(&turn))?,
        }
    }
    Ok(())
}

async fn serve(config: &Config, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config.delimiters()?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Thinkstream server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
