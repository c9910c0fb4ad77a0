use std::process::ExitCode;

use cad_fx_convert::{Cli, Config, ConvertError, ValetClient, convert};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::debug;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            print_usage_error(&e);
            return ExitCode::from(1);
        }
    };

    match run(args) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(ConvertError::Usage(message)) => {
            print_usage_error(&Cli::command().error(ErrorKind::ValueValidation, message));
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Cli) -> cad_fx_convert::Result<String> {
    let config = Config::from_env()?;
    let request = args.into_request()?;
    debug!("{request:?} using {}", config.base_url);

    let result = convert(&request, &ValetClient::new(&config))?;
    result.to_json()
}

fn print_usage_error(e: &clap::Error) {
    let _ = e.print();
    eprintln!("\n{}", Cli::command().render_long_help());
}
