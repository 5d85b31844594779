//! King's Board - interactive influence editor for the terminal.
//!
//! Reads editing commands from stdin, keeps the influence overlay in sync with
//! the remote service in the background and prints the session after every
//! command. Logs go to stderr; `RUST_LOG` controls the level.

mod command;
mod render;

use std::path::PathBuf;

use board_editor::{DropTarget, Editor, Input, SyncOutcome};
use clap::Parser;
use command::{Command, HELP};
use influence_client::{ClientConfig, HttpInfluenceService, InfluenceService, Session, SessionEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// King's Board - place pieces, see who controls which square.
#[derive(Parser)]
#[command(name = "kings-board")]
#[command(about = "Interactive chess influence editor")]
struct Args {
    /// Configuration file (defaults to kings-board.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the influence service
    #[arg(long)]
    api_url: Option<String>,

    /// Quiet period before a board change is sent, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Draw black at the bottom
    #[arg(long)]
    black_at_bottom: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load_from(path)?,
            None => ClientConfig::load()?,
        };
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
        if self.black_at_bottom {
            config.orientation = "black".to_string();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = args.config()?;
    tracing::info!("Influence service: {}", config.api_base_url);
    tracing::info!("Debounce: {}ms", config.debounce_ms);

    let service = HttpInfluenceService::new(&config.api_base_url, config.request_timeout())?;
    let editor = Editor::new(config.editor_settings()?, 0);
    let mut session = Session::new(editor, service);

    println!("{}", render::render(session.editor(), session.now()));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(command)) => {
                        apply(&mut session, command);
                        println!("{}", render::render(session.editor(), session.now()));
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Some(event) = session.step(), if session.is_busy() => {
                let refreshed = matches!(
                    event,
                    SessionEvent::Resolved(_, SyncOutcome::Applied | SyncOutcome::Cleared(_))
                );
                if refreshed {
                    println!("{}", render::render(session.editor(), session.now()));
                }
            }
        }
    }

    session.shutdown();
    tracing::info!("Session closed");
    Ok(())
}

fn apply<S: InfluenceService>(session: &mut Session<S>, command: Command) {
    let now = session.now();
    match command {
        Command::Tray(piece) => {
            session.handle(Input::TrayClick(piece));
        }
        Command::Click(square) => {
            session.handle(Input::SquareClick(square));
        }
        Command::DragTray(piece, target) => drag(session, Input::TrayDragStart(piece), target),
        Command::Drag(square, target) => drag(session, Input::BoardDragStart(square), target),
        Command::Key(key) => {
            session.handle(Input::Key(key));
        }
        Command::Hover(square) => session.editor_mut().hover_indicator(square),
        Command::Unhover => session.editor_mut().unhover_indicator(),
        Command::Indicator(square) => {
            if !session.editor_mut().click_indicator(square) {
                tracing::debug!(%square, "no indicator pinned");
            }
        }
        Command::Flip => session.editor_mut().flip(now),
        Command::View => session.editor_mut().toggle_view(now),
        Command::Toggle => session.editor_mut().toggle_influence(),
        Command::Reset => session.editor_mut().reset(now),
        Command::Show | Command::Help | Command::Quit => {}
    }
}

fn drag<S: InfluenceService>(session: &mut Session<S>, start: Input, target: DropTarget) {
    session.handle(start);
    // A drop without a drag in progress is ignored by the controller.
    session.handle(Input::Drop(target));
}
