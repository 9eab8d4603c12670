//! [`Args`] definitions.

use clap::Parser;

/// Server of the car rental system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses [`Args`] from the command line.
    ///
    /// # Errors
    ///
    /// If the provided command line arguments are malformed.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
