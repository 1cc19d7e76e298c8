use std::sync::Arc;

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};

use outlay::config::{CliArgs, Config, LoggingConfig};
use outlay_mcp::{CategoryCatalog, ExpenseService};
use outlay_sqlite::{location, SqliteLedger};

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();
    let config = Config::load(&cli);
    init_tracing(&config.logging);

    let location = location::resolve(config.storage.db_dir.as_deref());
    tracing::info!(path = %location.db_path().display(), "ledger storage resolved");

    // No schema means no operation can proceed, so this failure is fatal.
    let ledger = match SqliteLedger::open(location) {
        Ok(ledger) => ledger,
        Err(e) => {
            tracing::error!(error = %e, "cannot initialize ledger storage");
            std::process::exit(1);
        }
    };

    let catalog = CategoryCatalog::new(config.catalog.path.clone());
    let service = ExpenseService::new(Arc::new(ledger), catalog);

    tracing::info!("expense ledger serving on stdio");
    let server = match service.serve(stdio()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start MCP server");
            std::process::exit(1);
        }
    };
    if let Err(e) = server.waiting().await {
        tracing::error!(error = %e, "server terminated with error");
    }
}

fn init_tracing(cfg: &LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    // stdout carries the MCP protocol, so logs go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
