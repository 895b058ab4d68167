use c64tidy::cli::{Cli, RunConfig, run};
use c64tidy::config::CategoryConfig;
use c64tidy::output::OutputFormatter;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let table = match CategoryConfig::load(cli.config.as_deref()) {
        Ok(table) => table,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            std::process::exit(2);
        }
    };

    let config = RunConfig::from(&cli);
    if let Err(e) = run(&config, &table) {
        OutputFormatter::error(&e.to_string());
        std::process::exit(1);
    }
}
