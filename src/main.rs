//! subwatch CLI
//!
//! Entry point for the `subwatch` command-line tool. Intended to run from
//! a scheduler; one invocation performs one sweep.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use subwatch::{JobConfig, JobDriver, SweepOptions};
use subwatch_azure::{ArmClient, GraphMailer, TokenClient};

#[derive(Parser)]
#[command(name = "subwatch")]
#[command(about = "Tag-driven expiration lane for cloud subscriptions", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one expiration sweep over all subscriptions
    Run {
        /// Path to config file (default: subwatch.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Decide without writing tags or sending email
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration and print the effective settings
    Verify {
        /// Path to config file (default: subwatch.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { config, dry_run } => run_sweep(config, dry_run),
        Commands::Verify { config } => run_verify(config),
    }
}

fn load_config(path: Option<PathBuf>) -> JobConfig {
    let path = path.unwrap_or_else(|| PathBuf::from("subwatch.toml"));
    let config = match JobConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config {}: {}", path.display(), e);
            process::exit(2);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(2);
    }
    config
}

fn run_sweep(config_path: Option<PathBuf>, dry_run: bool) {
    let config = load_config(config_path);

    // Management credential is fetched once; nothing can proceed without it.
    let tokens = TokenClient::new(&config.tenant_id, &config.client_id, &config.client_secret);
    let cloud = match ArmClient::connect(&tokens) {
        Ok(cloud) => cloud,
        Err(e) => {
            eprintln!("Authentication failed: {}", e);
            process::exit(1);
        }
    };
    // The mailer fetches its own messaging-scope token per notification.
    let mail_tokens =
        TokenClient::new(&config.tenant_id, &config.client_id, &config.client_secret);
    let mailer = GraphMailer::new(mail_tokens, config.sender.clone());

    let options = SweepOptions::from_config(&config, dry_run);
    let driver = JobDriver::new(cloud, mailer, options);

    match driver.run(chrono::Local::now().naive_local()) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("Sweep aborted: {}", e);
            process::exit(1);
        }
    }
}

fn run_verify(config_path: Option<PathBuf>) {
    let path = config_path.unwrap_or_else(|| PathBuf::from("subwatch.toml"));
    match JobConfig::from_file(&path).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => {
            println!("Configuration valid: {}", path.display());
            println!();
            println!("  Tenant: {}", config.tenant_id);
            println!("  Client: {}", config.client_id);
            println!("  Client secret: <redacted>");
            println!("  Sender: {}", config.sender);
            println!("  Default recipient: {}", config.default_recipient);
            if let Some(ref url) = config.ticket_url {
                println!("  Ticket URL: {}", url);
            }
            println!("  Team name: {}", config.team_name);
            println!("  Warn lead days: {}", config.warn_lead_days);
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(2);
        }
    }
}
