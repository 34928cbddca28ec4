mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{dispatch, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    ggh::logging::init(cli.verbose);
    dispatch(cli)
}
