//! Log backend setup for the CLI.

use anyhow::Result;
use log::LevelFilter;

/// Level for a count of `-v` flags, starting from warnings.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger at the level for `verbosity`.
pub fn init_logger(verbosity: u8) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level_for(verbosity))
        .try_init()?;
    Ok(())
}
