use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use weatherbot::connector::adapter::http_relay;
use weatherbot::connector::api::{Container, ContainerConfig, Router};
use weatherbot::{Commands, RelayState};

#[derive(Parser)]
#[command(name = "weatherbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file holding AI_STUDIO_API_KEY and WEATHER_API_KEY
    #[arg(short, long, global = true, default_value = "app-config.json")]
    config: PathBuf,

    /// Answer chat messages from the offline mock instead of Gemini
    #[arg(long, global = true)]
    mock_chat: bool,

    /// Quiet period before a location lookup is sent
    #[arg(long, global = true, default_value = "2000")]
    settle_ms: u64,

    #[arg(long, global = true, default_value = "10000")]
    lookup_timeout_ms: u64,

    /// Upper bound on the number of locations (0 for no limit)
    #[arg(long, global = true, default_value = "5")]
    max_locations: usize,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            config_path: self.config.clone(),
            mock_chat: self.mock_chat,
            settle_delay: Duration::from_millis(self.settle_ms),
            lookup_timeout: Duration::from_millis(self.lookup_timeout_ms),
            max_locations: (self.max_locations > 0).then_some(self.max_locations),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(cli.container_config())?;

    if let Commands::Serve { port, public } = cli.command {
        let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
        let addr = SocketAddr::from((host, port));
        info!("Starting HTTP relay on {}", addr);

        let state = RelayState::new(container.chat_client(), container.relay_checker());
        http_relay::serve(addr, http_relay::router(state)).await?;
        return Ok(());
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn zero_max_locations_disables_the_limit() {
        let cli = Cli::try_parse_from(["weatherbot", "--max-locations", "0", "interactive"])
            .unwrap();
        assert_eq!(cli.container_config().max_locations, None);
    }

    #[test]
    fn validate_accepts_repeated_locations() {
        let cli = Cli::try_parse_from([
            "weatherbot",
            "validate",
            "-l",
            "Paris,France",
            "--location",
            "Oslo,Norway",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate { locations, unit, .. } => {
                assert_eq!(locations, vec!["Paris,France", "Oslo,Norway"]);
                assert_eq!(unit, "celsius");
            }
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn defaults_match_the_engine_constants() {
        let cli = Cli::try_parse_from(["weatherbot", "chat", "hello"]).unwrap();
        let config = cli.container_config();
        assert_eq!(config.settle_delay, Duration::from_millis(2000));
        assert_eq!(config.lookup_timeout, Duration::from_secs(10));
        assert_eq!(config.max_locations, Some(5));
    }
}
