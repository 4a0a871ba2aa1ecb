use std::process;

use eomap_tool::cli;
use eomap_tool::{commands, config, ToolError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let invocation = match cli::parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", cli::USAGE);
            process::exit(2);
        }
    };

    if let Err(e) = run(&invocation) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run(invocation: &cli::Invocation) -> Result<(), ToolError> {
    let config = config::load_config(invocation.config.as_deref())?;
    let stdout = std::io::stdout();
    commands::run(&invocation.command, &config, &mut stdout.lock())
}
