use std::path::PathBuf;
use std::time::Duration;
use clap::{Parser, Subcommand};

use gomoku_common::config::{ConfigManager, FileContentConfigProvider};
use gomoku_common::games::gomoku::{BotInput, Difficulty, GomokuSession, SearchConfig, SessionSettings, compute_move};
use gomoku_common::{Participant, SessionId, log, logger};

use gomoku_server::archive::LogArchive;
use gomoku_server::cleanup_task::CleanupTask;
use gomoku_server::discovery::DiscoveryTask;
use gomoku_server::messages::RelayMessage;
use gomoku_server::server_config::{DEFAULT_CONFIG_PATH, ServerConfig};
use gomoku_server::{Broadcaster, RelayTransport, SessionRegistry};

#[derive(Parser)]
#[command(name = "gomoku_server")]
struct Args {
    #[arg(long)]
    use_log_prefix: bool,

    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Host sessions until Ctrl+C.
    Serve,
    /// Play two computer seats against each other and print the result.
    SelfPlay {
        #[arg(long, default_value_t = 15)]
        size: usize,
        #[arg(long, default_value = "medium")]
        first: Difficulty,
        #[arg(long, default_value = "medium")]
        second: Difficulty,
    },
    /// Write the effective configuration to the config path.
    WriteConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<FileContentConfigProvider, ServerConfig> =
        ConfigManager::from_yaml_file(&args.config);
    let config = config_manager.get_config()?;
    log!("Loaded configuration from {}", args.config.display());

    match args.command {
        Command::Serve => serve(config).await,
        Command::SelfPlay { size, first, second } => self_play(&config.search, size, first, second).await,
        Command::WriteConfig => {
            config_manager.set_config(&config)?;
            log!("Wrote configuration to {}", args.config.display());
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let broadcaster = Broadcaster::new(config.inbox_capacity);
    let registry = SessionRegistry::new(broadcaster.clone(), config.search.clone());

    let discovery = DiscoveryTask::new(registry.clone(), config.advertise_interval());
    let discovery_handle = tokio::spawn(async move { discovery.run().await });

    let cleanup = CleanupTask::new(
        registry.clone(),
        LogArchive,
        config.cleanup_interval(),
        config.inactivity_timeout(),
    );
    let cleanup_handle = tokio::spawn(async move { cleanup.run().await });

    log!(
        "Gomoku server ready (advertising every {:?}, expert budget {:?})",
        config.advertise_interval(),
        config.search.expert_budget()
    );

    tokio::signal::ctrl_c().await?;
    log!("Shutdown signal received, notifying participants...");

    discovery_handle.abort();
    cleanup_handle.abort();
    broadcaster
        .announce(RelayMessage::ServerShuttingDown {
            message: "Server is shutting down".to_string(),
        })
        .await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    log!("Server shut down gracefully ({} session(s) dropped)", registry.session_count().await);
    Ok(())
}

async fn self_play(
    search: &SearchConfig,
    size: usize,
    first: Difficulty,
    second: Difficulty,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = GomokuSession::open(
        SessionId::new("self_play"),
        Participant::new("first", format!("First ({})", first)),
        SessionSettings::new(size, 2),
    )?;
    session.join(Participant::new("second", format!("Second ({})", second)))?;

    while !session.status().is_terminal() {
        let Some(seat) = session.current_seat().cloned() else {
            break;
        };
        let difficulty = if seat.participant_id.as_str() == "first" { first } else { second };
        let input = BotInput::from_session(&session);
        let config = search.clone();
        let found = tokio::task::spawn_blocking(move || compute_move(&input, difficulty, &config)).await??;

        let applied = session.submit_move(&seat.participant_id, found.position.row, found.position.col)?;
        log!(
            "#{} {} ({}) -> ({}, {}) depth {} nodes {} in {:?}, eval {}",
            applied.sequence,
            applied.symbol,
            difficulty,
            applied.position.row,
            applied.position.col,
            found.depth_reached,
            found.nodes,
            found.elapsed,
            found.evaluation_score
        );
    }

    log!("Final board:\n{}", session.board().render());
    match session.winner() {
        Some(winner) => log!("Winner: {} after {} moves", winner, session.move_log().len()),
        None => log!("Draw after {} moves", session.move_log().len()),
    }
    Ok(())
}
