use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = podcopy_cli::Cli::parse();
    podcopy_cli::init_tracing(cli.verbose);

    let result = match podcopy_cli::run(cli).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to encode result: {e}");
            ExitCode::FAILURE
        }
    }
}
