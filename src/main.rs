extern crate clap;

mod cli;
mod cloud;
mod command;
mod completions;
mod logging;
mod models;
mod operation;
mod parse;

use anyhow::Error;
use clap::ArgMatches;
use cli::KcloudEnvironment;
use command::SystemRunner;
use log::error;
use operation::Provider;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = cli::command().get_matches();
    if let Err(e) = logging::init(&matches) {
        eprintln!("{}", e);
    }

    let result = match matches.subcommand() {
        Some(("completions", subargs)) => completions::execute(subargs),
        Some((provider, subargs)) => run_provider(provider, subargs).await,
        None => Err(Error::msg("No command given")),
    };

    if let Err(e) = result {
        error!(
            "{}",
            e.chain()
                .map(|e| e.to_string())
                .collect::<Vec<String>>()
                .join(": ")
        );
        process::exit(1);
    }
}

async fn run_provider(name: &str, matches: &ArgMatches) -> Result<(), Error> {
    let provider = Provider::parse(name)?;
    let environment = KcloudEnvironment::init()?;
    operation::execute(&environment, Arc::new(SystemRunner), provider, matches).await
}
