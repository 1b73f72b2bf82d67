use clap::Parser;
use std::process::ExitCode;

use folio::FolioError;
use folio::cli::Cli;
use folio::display::format_field_errors;

#[tokio::main]
async fn main() -> ExitCode {
    folio::logging::init();
    let cli = Cli::parse();

    match cli.command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(FolioError::Validation(errors)) => {
            eprintln!("Invalid task:");
            eprintln!("{}", format_field_errors(&errors));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            if matches!(e, FolioError::NotAuthenticated | FolioError::SessionExpired) {
                eprintln!("Run `folio login` to sign in.");
            }
            ExitCode::FAILURE
        }
    }
}
