use std::io;

use anyhow::Context;
use clap::Parser;

use stockctl_cli::{Config, Menu, interrupt};
use stockctl_infra::SqliteProductStore;
use stockctl_products::ProductService;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    stockctl_observability::init(config.log_format, "warn");

    if let Err(err) = interrupt::install() {
        tracing::warn!("ctrl-c handler not installed: {err}");
    }

    let store = SqliteProductStore::open(&config.database)
        .with_context(|| format!("failed to open database {:?}", config.database))?
        .with_busy_timeout(config.busy_timeout());
    let service = ProductService::new(store);
    service
        .initialize()
        .with_context(|| format!("failed to initialize database {:?}", config.database))?;
    tracing::info!(database = %config.database.display(), "products table ready");

    let stdin = io::stdin();
    let mut menu = Menu::new(service, stdin.lock(), io::stdout());
    menu.run().context("console I/O failed")?;

    Ok(())
}
