//! Scaleplan CLI Application
//!
//! Command-line host for the scaling plan store: edits plans stored in a
//! local SQLite database and prints their dependency graphs.

mod args;
mod cli;
mod handlers;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handlers::Cli;
use log::{debug, info};
use renderer::TerminalRenderer;
use scaleplan_core::{PlanStoreBuilder, SqliteRepository};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let builder = PlanStoreBuilder::new().with_database_path(database_file);
    let db_path = builder
        .database_path()
        .context("Failed to resolve database path")?;
    let sqlite = Arc::new(
        SqliteRepository::open(&db_path)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?,
    );
    debug!("Using database {}", sqlite.path().display());
    let store = builder
        .with_repository(sqlite.clone())
        .with_metric_registry(sqlite.clone())
        .with_component_registry(sqlite.clone())
        .build()
        .await
        .context("Failed to initialize plan store")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(store, sqlite, renderer);

    info!("Scaleplan started");

    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Item { command }) => cli.handle_item_command(command).await,
        Some(Metric { command }) => cli.handle_metric_command(command).await,
        Some(Component { command }) => cli.handle_component_command(command).await,
        Some(Analyze(args)) => cli.analyze(&args),
        None => cli.list_plans().await,
    }
}
