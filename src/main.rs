mod app;
mod dom;
mod extract;
mod fetch;
mod logger;
mod midweek;
mod models;
mod weekend;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{ArgGroup, Parser};

#[derive(Parser)]
#[command(name = "wol-meetings")]
#[command(about = "Scrape weekly congregation meeting schedules from wol.jw.org")]
#[command(group(ArgGroup::new("target").required(true).args(["year_week", "year"])))]
struct Cli {
    /// Year and week in one argument, e.g. 2024/23
    #[arg(long, value_name = "YYYY/WW")]
    year_week: Option<String>,

    /// Year of the first week to scrape
    #[arg(long, requires = "week")]
    year: Option<i32>,

    /// Week number (required together with --year)
    #[arg(long)]
    week: Option<u32>,

    /// Number of consecutive weeks to scrape
    #[arg(long, default_value_t = 1)]
    weeks: u32,

    /// Output file; defaults to a timestamped file in the temp directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log debug output to the console
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn target(&self) -> Result<(i32, u32)> {
        if let Some(combined) = &self.year_week {
            return parse_year_week(combined);
        }
        match (self.year, self.week) {
            (Some(year), Some(week)) => Ok((year, week)),
            _ => bail!("--week is required when --year is used"),
        }
    }
}

fn parse_year_week(combined: &str) -> Result<(i32, u32)> {
    let Some((year, week)) = combined.split_once('/') else {
        bail!("Expected YYYY/WW, got {combined:?}");
    };
    let year = year
        .trim()
        .parse()
        .with_context(|| format!("Invalid year in {combined:?}"))?;
    let week = week
        .trim()
        .parse()
        .with_context(|| format!("Invalid week in {combined:?}"))?;
    Ok((year, week))
}

fn default_output_path() -> PathBuf {
    std::env::temp_dir().join(format!("meeting_data_{}.json", Utc::now().timestamp_millis()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let (year, week) = cli.target()?;
    let output = cli.output.clone().unwrap_or_else(default_output_path);

    app::run(year, week, cli.weeks, Some(&output)).await
}
