//! jrtest CLI - Drive the JRTestService from the command line
//!
//! Commands:
//! - `jrtest call` - Call one route against a fixture backend
//! - `jrtest routes` - List the route table
//! - `jrtest check` - Validate a service configuration file

use clap::{Parser, Subcommand};

mod call;
mod config;
mod routes;

#[derive(Parser)]
#[command(name = "jrtest")]
#[command(author, version, about = "Command line driver for the JRTestService", long_about = None)]
struct Cli {
    /// Log filter for console output (e.g. `info`, `jrtest_service=debug`)
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call one route against a fixture backend
    Call {
        /// Fixture file describing the backend (JSON or TOML)
        #[arg(short, long)]
        fixture: String,

        /// Route tag (`workspace.get`) or `"METHOD path"` (`"GET workspace/1003"`)
        #[arg(short, long)]
        route: String,

        /// JSON request body
        #[arg(short, long)]
        payload: Option<String>,

        /// Service configuration file (JSON or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// List the route table
    Routes,

    /// Validate a service configuration file
    Check {
        /// Path to the configuration (default: ./jrtest.toml)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    jrtest_logging::init_console_logging(&cli.log).map_err(anyhow::Error::msg)?;
    jrtest::install_panic_hook();

    match cli.command {
        Commands::Call {
            fixture,
            route,
            payload,
            config,
            pretty,
        } => {
            call::run(&fixture, &route, payload.as_deref(), config.as_deref(), pretty)?;
        }
        Commands::Routes => {
            routes::run();
        }
        Commands::Check { config } => {
            config::check(config)?;
        }
    }

    Ok(())
}
