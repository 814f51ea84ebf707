//! Command-line front end for the requisition desk.
//!
//! # Responsibility
//! - Map subcommands onto `RequisitionDesk` calls.
//! - Render charts as SVG files under the configured chart directory.
//!
//! # Invariants
//! - Every failure surfaces as a non-zero exit with a message on stderr.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use log::info;
use needlereq_core::{
    init_logging_from_config, seed_random, AppConfig, Category, RequisitionDesk, RequisitionForm,
    SeedPlan, SvgDirSurface, DATE_FORMAT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Cli::parse();

    let config = resolve_config(args.config.as_deref(), args.db)?;
    init_logging_from_config(&config).context("failed to start logging")?;

    let surface = SvgDirSurface::new(config.chart_dir.clone());
    let mut desk = RequisitionDesk::from_config(&config, surface);

    match args.command {
        Command::Ping => {
            println!("needlereq_core ping={}", needlereq_core::ping());
            println!("needlereq_core version={}", needlereq_core::core_version());
        }
        Command::Add {
            quantity,
            category,
            subcategory,
            date,
        } => {
            let date = date.unwrap_or_else(|| {
                chrono::Local::now()
                    .date_naive()
                    .format(DATE_FORMAT)
                    .to_string()
            });
            let form = RequisitionForm {
                quantity,
                category,
                subcategory,
                date,
            };
            let id = desk.submit(&form)?;
            println!("saved requisition id={id}");
        }
        Command::List { secret, limit } => {
            let rows = desk.open_deletion(&secret, limit)?;
            desk.close_deletion();
            if rows.is_empty() {
                println!("no requisitions");
            }
            for row in rows {
                println!(
                    "{:>6}  {:>6}  {:<13} {:<6} {}",
                    row.id,
                    row.quantity,
                    row.category,
                    row.subcategory,
                    row.occurred_on.format(DATE_FORMAT)
                );
            }
        }
        Command::Delete { secret, id } => {
            desk.delete_with_secret(&secret, Some(id))?;
            println!("deleted requisition id={id}");
        }
        Command::Chart {
            category,
            granularity,
        } => {
            let category = Category::parse(&category)?;
            desk.set_granularity(category, granularity.into())?;
            let series = desk.series(category)?;
            println!(
                "{} ({})",
                category,
                desk.surface().chart_path(category).display()
            );
            for (label, value) in series.labels.iter().zip(&series.values) {
                println!("{label}\t{value}");
            }
        }
        Command::Refresh => {
            desk.refresh_all()?;
            for category in Category::ALL {
                println!("{}", desk.surface().chart_path(category).display());
            }
        }
        Command::Seed { count, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let written = seed_random(desk.store(), &SeedPlan::new(count), &mut rng)?;
            info!("event=seed module=cli status=ok rows={written}");
            desk.refresh_all()?;
            println!("inserted {written} requisition(s)");
        }
    }

    Ok(())
}

/// Loads config, applies the `--db` override and validates the result.
fn resolve_config(config_path: Option<&Path>, db: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = AppConfig::load(config_path).context("failed to load config")?;
    if let Some(db) = db {
        config.db_path = db;
    }
    if let Some(log_dir) = config.log_dir.take() {
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            std::env::current_dir()?.join(log_dir)
        };
        config.log_dir = Some(log_dir);
    }
    config.validate().context("invalid --db override")?;
    Ok(config)
}
