use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use donelist_cli::repl;
use donelist_http::{ServiceConfigBuilder, TaskApi, serve};
use donelist_store::{InMemoryTaskStore, SqliteTaskStore};

#[derive(Parser, Debug)]
#[command(name = "donelist", version)]
#[command(about = "donelist - single-user task service and client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the task service
    Serve {
        /// Path to the sqlite database file; omit for a transient
        /// in-memory store
        #[arg(long)]
        db: Option<PathBuf>,
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Interactive client session against a running service
    Ui {
        /// Base URL of the task service
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging once.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter, // fallback to default if parsing fails
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { db, bind } => {
            let builder = match ServiceConfigBuilder::from_env() {
                Ok(builder) => builder,
                Err(e) => {
                    tracing::error!(error = %e, "Invalid environment configuration");
                    return ExitCode::FAILURE;
                }
            };
            let builder = match bind {
                Some(addr) => builder.bind_addr(addr),
                None => builder,
            };
            let config = match builder.build() {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Invalid configuration");
                    return ExitCode::FAILURE;
                }
            };

            let served = match db {
                Some(path) => match SqliteTaskStore::open(&path) {
                    Ok(store) => serve(TaskApi::new(store, config)).await,
                    Err(e) => {
                        tracing::error!(error = %e, path = %path.display(), "Failed to open task store");
                        return ExitCode::FAILURE;
                    }
                },
                None => {
                    tracing::warn!("No --db given, tasks will not survive a restart");
                    serve(TaskApi::new(InMemoryTaskStore::new(), config)).await
                }
            };

            match served {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "Service failed");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Ui { server } => match repl::run(server).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Client session failed");
                ExitCode::FAILURE
            }
        },
    }
}
