use std::io;

use anyhow::Error;
use clap::ArgMatches;
use clap_complete::{generate, Shell};

use crate::cli;

pub fn execute(matches: &ArgMatches) -> Result<(), Error> {
    let generator = matches
        .get_one::<Shell>("generator")
        .ok_or_else(|| Error::msg("Invalid completions shell"))?;

    let mut cmd = cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {generator}...");
    generate(*generator, &mut cmd, name, &mut io::stdout());
    Ok(())
}
