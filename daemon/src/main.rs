//! VoteDAO daemon: entry point for running a campus election.

mod config;
mod election;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use config::ElectionConfig;
use votedao_rpc::{AppState, RpcLimits, RpcServer};
use votedao_types::Timestamp;
use votedao_utils::{format_age, LogFormat};

#[derive(Parser)]
#[command(name = "votedao", about = "VoteDAO campus election daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "VOTEDAO_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the vote store.
    #[arg(long, env = "VOTEDAO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOTEDAO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VOTEDAO_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve the election API until Ctrl-C.
    Serve {
        /// HTTP API port.
        #[arg(long, env = "VOTEDAO_RPC_PORT")]
        port: Option<u16>,
    },
    /// Print the leaderboard from the stored votes.
    Tally,
    /// Print the audit trail.
    Audit,
    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    fn effective_config(&self) -> anyhow::Result<ElectionConfig> {
        let mut config = match self.config {
            Some(ref path) => ElectionConfig::from_toml_file(path)?,
            None => ElectionConfig::default(),
        };
        if let Some(ref dir) = self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Command::Serve { port: Some(port) } = self.command {
            config.rpc_port = port;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.effective_config()?;
    votedao_utils::init_logging(config.log_format, &config.log_level)?;

    match cli.command {
        Command::Config => print!("{}", config.to_toml_string()?),
        Command::Tally => {
            let election = election::open_existing(&config)?;
            println!("{}", config.election_name);
            for s in election.ledger.standings() {
                println!(
                    "{:>2}. {:<20} {:<16} {:>6} votes  {:>6}",
                    s.rank,
                    s.candidate.name,
                    s.candidate.position,
                    s.votes,
                    s.share
                );
            }
            println!("total: {}", election.ledger.tally().total());
        }
        Command::Audit => {
            let election = election::open_existing(&config)?;
            let now = Timestamp::now();
            for entry in election.ledger.audit_trail() {
                println!(
                    "#{:<5} {}  {}  {:<12} {}",
                    entry.sequence,
                    entry.proof_token,
                    entry.voter,
                    entry.candidate_id,
                    format_age(entry.cast_at, now)
                );
            }
        }
        Command::Serve { .. } => {
            tracing::info!(
                election = %config.election_name,
                port = config.rpc_port,
                candidates = config.candidates.len(),
                "starting VoteDAO daemon"
            );
            let election = election::open(&config)?;
            let limits = RpcLimits {
                connect_timeout: config.connect_timeout(),
                proof_timeout: config.proof_timeout(),
                session_idle_ttl: config.session_idle_ttl(),
            };
            let state = Arc::new(AppState::new(
                config.election_name.clone(),
                election.gate,
                election.ledger,
                limits,
            ));
            RpcServer::new(config.rpc_port, state)
                .start(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!("cannot listen for Ctrl-C: {e}");
                    }
                    tracing::info!("shutdown signal received");
                })
                .await?;
            tracing::info!("VoteDAO daemon exited cleanly");
        }
    }

    Ok(())
}
