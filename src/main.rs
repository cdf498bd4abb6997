use anyhow::Context;
use clap::Parser;
use netchess::core::{load_settings, save_settings};
use netchess::input::parse_line;
use netchess::networking::{ClientCommand, GameClient, HttpPeer, JoinStatus};
use netchess::rendering::TerminalView;
use std::io::BufRead;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Play a networked chess game from the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Game to join
    #[arg(long)]
    game_id: String,

    /// Server endpoint, overrides the saved setting
    #[arg(long)]
    server: Option<String>,

    /// Poll interval in milliseconds, overrides the saved setting
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server) = args.server {
        settings.server_url = server;
    }
    if let Some(ms) = args.poll_interval_ms {
        settings.poll_interval_ms = ms;
    }
    if args.save_settings {
        let path = save_settings(&settings).context("saving settings")?;
        info!("Settings written to {}", path.display());
    }

    let endpoint = settings.endpoint()?;
    info!("Connecting to {}", endpoint);
    let peer = HttpPeer::new(endpoint, settings.request_timeout())?;

    let mut client = GameClient::new(peer, TerminalView::stdout(), settings.poll_interval());

    let status = client
        .join(&args.game_id)
        .await
        .with_context(|| format!("joining game {}", args.game_id))?;
    if status == JoinStatus::Started {
        info!("Game {} started", args.game_id);
    }

    let (commands_tx, mut commands_rx) = mpsc::unbounded_channel();
    // Plain thread: a blocked stdin read must not hold up runtime shutdown.
    std::thread::spawn(move || read_commands(commands_tx));

    let outcome = client.run(&mut commands_rx).await;
    info!("Session over: {}", outcome);
    Ok(())
}

/// Forward typed commands until stdin closes or the client stops listening.
fn read_commands(commands: UnboundedSender<ClientCommand>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_line(&line) {
            Ok(parsed) => {
                for command in parsed {
                    if commands.send(command).is_err() {
                        return;
                    }
                }
            }
            Err(e) => eprintln!("{e} (try `e2 e4`, `4 6 4 4` or `quit`)"),
        }
    }
}
