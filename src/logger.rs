use std::env;
use std::fs;

use anyhow::{Result, anyhow};
use ftail::Ftail;
use log::LevelFilter;

const LOGS_DIR: &str = ".logs";
const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Console shows info (debug with --verbose); the log file keeps the
/// full debug stream of selector hits and misses, which is the only way
/// to diagnose layout drift on the scraped site after the fact.
pub fn init(verbose: bool) -> Result<()> {
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let home = match env::home_dir() {
        Some(h) => h,
        None => return Err(anyhow!("Could not determine $HOME")),
    };

    let logs_path = home.join(LOGS_DIR).join(PKG_NAME);
    let logs_file = logs_path.join(format!("{PKG_NAME}.log"));

    fs::create_dir_all(&logs_path)
        .map_err(|e| anyhow!("Could not create logs dir at {:?}: {}", &logs_path, e))?;

    Ftail::new()
        .console(console_level)
        .single_file(&logs_file, true, LevelFilter::Debug)
        .init()
        .map_err(|e| anyhow!("Could not initialize logger: {}", e))?;

    Ok(())
}
