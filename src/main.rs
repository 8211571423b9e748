mod barber;
mod client;
mod config;
mod error;
mod event;
mod logging;
mod monitor;
mod pace;
mod salon;
mod sim;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::config::SalonConfig;
use crate::error::SalonError;

#[derive(Parser)]
#[command(
    name = "salon",
    version,
    about = "Sleeping-barber salon: one barber, many clients, a bounded waiting room"
)]
struct Cli {
    /// TOML file with run settings; flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log salon events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the demo and print a summary (default)
    Demo,
    /// Run once and print a CSV row
    Bench,
    /// Sweep client counts and waiting-room sizes, printing CSV
    Stress {
        /// Comma-separated client counts
        #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 4, 8, 12])]
        client_sets: Vec<usize>,
        /// Comma-separated waiting-room sizes
        #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 4])]
        chair_sets: Vec<usize>,
    },
}

#[derive(Args)]
struct Overrides {
    /// Number of client threads
    #[arg(long, global = true)]
    clients: Option<usize>,
    /// Waiting-room chairs (the work chair comes on top)
    #[arg(long, global = true)]
    chairs: Option<usize>,
    #[arg(long, global = true)]
    open_ms: Option<u64>,
    #[arg(long, global = true)]
    service_ms: Option<u64>,
    #[arg(long, global = true)]
    walk_ms: Option<u64>,
    #[arg(long, global = true)]
    regrow_ms: Option<u64>,
    #[arg(long, global = true)]
    jitter_ms: Option<u64>,
}

impl Overrides {
    fn apply(&self, config: &mut SalonConfig) {
        if let Some(v) = self.clients {
            config.clients = v;
        }
        if let Some(v) = self.chairs {
            config.waiting_chairs = v;
        }
        if let Some(v) = self.open_ms {
            config.open_ms = v;
        }
        if let Some(v) = self.service_ms {
            config.service_ms = v;
        }
        if let Some(v) = self.walk_ms {
            config.walk_ms = v;
        }
        if let Some(v) = self.regrow_ms {
            config.regrow_ms = v;
        }
        if let Some(v) = self.jitter_ms {
            config.jitter_ms = v;
        }
    }
}

fn run(cli: Cli) -> Result<(), SalonError> {
    let mut config = match &cli.config {
        Some(path) => SalonConfig::load(path)?,
        None => SalonConfig::default(),
    };
    cli.overrides.apply(&mut config);

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => sim::run_demo(&config),
        Command::Bench => sim::run_benchmark(&config),
        Command::Stress {
            client_sets,
            chair_sets,
        } => sim::run_stress(&client_sets, &chair_sets, &config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "run failed");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
