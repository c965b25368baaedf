use anyhow::Error;
use clap::ArgMatches;

pub fn init(matches: &ArgMatches) -> Result<(), Error> {
    loggerv::Logger::new()
        .verbosity(matches.get_count("verbosity") as u64)
        .level(true)
        .no_module_path()
        .add_module_path_filter(env!("CARGO_CRATE_NAME"))
        .base_level(log::Level::Info)
        .init()
        .map_err(|err| Error::msg(format!("unable to initialize logging: {}", err)))
}
