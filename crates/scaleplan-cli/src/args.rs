use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{AnalyzeArgs, ComponentCommands, ItemCommands, MetricCommands, PlanCommands};

/// Edit scaling plans and inspect what they depend on
///
/// A scaling plan is a YAML document of prioritized items. Each item watches
/// metrics through an expression (or fires on a cron schedule) and configures
/// scaling components. Every mutating command loads the plan, applies the
/// change and pushes it back to the database in one invocation.
#[derive(Parser)]
#[command(version, about, name = "scaleplan")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/scaleplan/scaleplan.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without a command, the stored plans are listed.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage scaling plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage the items of a plan
    #[command(alias = "i")]
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Manage the metric registry
    #[command(alias = "m")]
    Metric {
        #[command(subcommand)]
        command: MetricCommands,
    },
    /// Manage the scaling component registry
    #[command(alias = "c")]
    Component {
        #[command(subcommand)]
        command: ComponentCommands,
    },
    /// Print the metric references found in an expression
    Analyze(AnalyzeArgs),
}
