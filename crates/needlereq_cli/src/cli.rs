//! CLI argument parsing for NeedleReq

use clap::{Parser, Subcommand, ValueEnum};
use needlereq_core::Granularity;
use std::path::PathBuf;

/// Chart bucketing accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    /// One bar per year (default)
    Yearly,
    /// One bar per year-month
    Monthly,
}

impl From<GranularityArg> for Granularity {
    fn from(value: GranularityArg) -> Self {
        match value {
            GranularityArg::Yearly => Granularity::Yearly,
            GranularityArg::Monthly => Granularity::Monthly,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "needlereq")]
#[command(version)]
#[command(about = "Record needle requisitions and chart totals per period", long_about = None)]
pub struct Cli {
    /// TOML config file; env overrides still apply on top
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database path (overrides config and NEEDLEREQ_DB_PATH)
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print core ping and version
    Ping,

    /// Record one requisition
    Add {
        #[arg(long)]
        quantity: String,
        /// Groz-Beckert or Neetex
        #[arg(long)]
        category: String,
        /// Alto or Baixo
        #[arg(long)]
        subcategory: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// List the newest requisitions for deletion (needs the deletion secret)
    List {
        #[arg(long)]
        secret: String,
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Delete one requisition, gated by the deletion secret
    Delete {
        #[arg(long)]
        secret: String,
        #[arg(long)]
        id: i64,
    },

    /// Render one category chart into the chart directory
    Chart {
        #[arg(long)]
        category: String,
        #[arg(long, value_enum, default_value = "yearly")]
        granularity: GranularityArg,
    },

    /// Re-render every category chart
    Refresh,

    /// Insert random sample requisitions
    Seed {
        #[arg(long)]
        count: usize,
        /// RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },
}
