use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use travel_genie::{Commands, Container, ContainerConfig, ProviderKind, Router};

#[derive(Parser)]
#[command(name = "travel-genie")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Text generation backend: gemini, anthropic, or mock
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model name, overriding the provider's environment default
    #[arg(long, global = true)]
    model: Option<String>,

    /// Give up waiting for the provider after this many milliseconds
    #[arg(long, global = true, allow_negative_numbers = true)]
    timeout_ms: Option<i64>,

    /// Show the extended-wait hint after this many milliseconds
    #[arg(long, global = true)]
    long_wait_ms: Option<u64>,

    /// Simulated latency for the mock provider
    #[arg(long, global = true)]
    mock_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn container_config(&self) -> Result<ContainerConfig> {
        let mut config = ContainerConfig::from_env()?;
        if let Some(provider) = &self.provider {
            config.provider = provider.parse::<ProviderKind>()?;
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        if let Some(ms) = self.long_wait_ms {
            config.long_wait_hint_ms = ms;
        }
        if let Some(ms) = self.mock_delay_ms {
            config.mock_delay_ms = ms;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.container_config()?;
    debug!(
        "Provider {} (timeout {} ms, long-wait hint {} ms)",
        config.provider.as_str(),
        config.timeout_ms,
        config.long_wait_hint_ms
    );

    let container = Container::new(config);
    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn plan_accepts_repeated_interests() {
        let cli = Cli::try_parse_from([
            "travel-genie",
            "plan",
            "--from",
            "Delhi",
            "--to",
            "Lisbon",
            "--start",
            "2030-04-01",
            "--end",
            "2030-04-08",
            "--budget",
            "1500",
            "-i",
            "Food",
            "-i",
            "Art",
        ])
        .unwrap();

        match cli.command {
            Commands::Plan { request, .. } => {
                assert_eq!(request.interests, vec!["Food", "Art"]);
                assert_eq!(request.budget, Some(1500.0));
            }
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn negative_timeout_is_accepted() {
        let cli = Cli::try_parse_from(["travel-genie", "--timeout-ms", "-1", "currencies"]).unwrap();
        assert_eq!(cli.timeout_ms, Some(-1));
    }

    #[test]
    fn bad_date_is_rejected() {
        let res = Cli::try_parse_from(["travel-genie", "prompt", "--start", "01/04/2030"]);
        assert!(res.is_err());
    }
}
